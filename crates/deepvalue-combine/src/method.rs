//! Selection of the composite convention for a run.

use deepvalue_traits::Result;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::{Combiner, EqualWeightCombiner, FactorScore, SumCombiner};

/// How factor z-scores fold into the composite index.
///
/// A run uses exactly one method for every candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeMethod {
    /// Sum of the factor z-scores.
    #[default]
    Sum,
    /// Arithmetic mean of the factor z-scores.
    Mean,
}

impl CompositeMethod {
    /// Returns the combiner implementing this method.
    #[must_use]
    pub fn combiner(&self) -> &'static dyn Combiner {
        match self {
            Self::Sum => &SumCombiner,
            Self::Mean => &EqualWeightCombiner,
        }
    }

    /// Combines factor scores with this method.
    ///
    /// # Errors
    ///
    /// See [`Combiner::combine`].
    pub fn combine(&self, factors: &[FactorScore]) -> Result<Array1<f64>> {
        self.combiner().combine(factors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factors() -> Vec<FactorScore> {
        vec![
            FactorScore::new("ey", Array1::from_vec(vec![1.0, -1.0])),
            FactorScore::new("btm", Array1::from_vec(vec![3.0, -3.0])),
        ]
    }

    #[test]
    fn test_default_is_sum() {
        assert_eq!(CompositeMethod::default(), CompositeMethod::Sum);
    }

    #[test]
    fn test_sum_and_mean_differ_by_factor_count() {
        let sum = CompositeMethod::Sum.combine(&factors()).unwrap();
        let mean = CompositeMethod::Mean.combine(&factors()).unwrap();
        assert_eq!(sum.to_vec(), vec![4.0, -4.0]);
        assert_eq!(mean.to_vec(), vec![2.0, -2.0]);
    }

    #[test]
    fn test_combiner_names() {
        assert_eq!(CompositeMethod::Sum.combiner().name(), "sum");
        assert_eq!(CompositeMethod::Mean.combiner().name(), "equal_weight");
    }

    #[test]
    fn test_serde_round_names() {
        let method: CompositeMethod = serde_json::from_str("\"mean\"").unwrap();
        assert_eq!(method, CompositeMethod::Mean);
        assert!(serde_json::from_str::<CompositeMethod>("\"median\"").is_err());
    }
}
