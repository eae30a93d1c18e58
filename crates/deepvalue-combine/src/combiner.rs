//! Core trait definition for factor combiners.

use deepvalue_traits::{Result, ScreenError};
use ndarray::Array1;

/// z-scores of a single factor over the candidate set.
#[derive(Debug, Clone)]
pub struct FactorScore {
    /// Factor name (for diagnostics)
    pub name: String,

    /// z-scores, one per candidate, in candidate order
    pub scores: Array1<f64>,
}

impl FactorScore {
    /// Creates a factor score vector.
    pub fn new(name: impl Into<String>, scores: Array1<f64>) -> Self {
        Self {
            name: name.into(),
            scores,
        }
    }
}

/// Combines several factor z-score vectors into a composite index.
///
/// All implementations must be thread-safe (Send + Sync).
pub trait Combiner: Send + Sync {
    /// Combine factor scores into one composite value per candidate.
    ///
    /// An empty candidate set (all vectors of length zero) yields an empty
    /// composite.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No factors are provided
    /// - Factor vectors have mismatched lengths
    /// - Combination produces non-finite values
    fn combine(&self, factors: &[FactorScore]) -> Result<Array1<f64>>;

    /// Name of this combination convention.
    fn name(&self) -> &str;
}

/// Validates the inputs shared by every combiner and returns the candidate count.
pub(crate) fn candidate_count(factors: &[FactorScore]) -> Result<usize> {
    let Some(first) = factors.first() else {
        return Err(ScreenError::InvalidData(
            "Cannot combine zero factors".to_string(),
        ));
    };
    let n = first.scores.len();

    for factor in factors {
        if factor.scores.len() != n {
            return Err(ScreenError::InvalidData(format!(
                "Factor '{}' has {} candidates, expected {}",
                factor.name,
                factor.scores.len(),
                n
            )));
        }
    }

    Ok(n)
}

/// Rejects composites containing NaN or infinite values.
pub(crate) fn ensure_finite(composite: Array1<f64>) -> Result<Array1<f64>> {
    if composite.iter().any(|x| !x.is_finite()) {
        return Err(ScreenError::InvalidData(
            "Combination produced non-finite values".to_string(),
        ));
    }
    Ok(composite)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_score_creation() {
        let score = FactorScore::new("earnings_yield", Array1::from_vec(vec![0.5, -0.2, 1.0]));
        assert_eq!(score.name, "earnings_yield");
        assert_eq!(score.scores.len(), 3);
    }

    #[test]
    fn test_candidate_count_mismatch() {
        let factors = vec![
            FactorScore::new("a", Array1::from_vec(vec![1.0, 2.0])),
            FactorScore::new("b", Array1::from_vec(vec![1.0])),
        ];
        assert!(candidate_count(&factors).is_err());
        assert!(candidate_count(&[]).is_err());
        assert_eq!(candidate_count(&factors[..1]).unwrap(), 2);
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite(Array1::from_vec(vec![1.0, f64::NAN])).is_err());
        assert!(ensure_finite(Array1::from_vec(vec![1.0, 2.0])).is_ok());
    }
}
