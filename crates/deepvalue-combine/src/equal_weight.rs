//! Equal-weighted factor combination.

use deepvalue_traits::Result;
use ndarray::Array1;

use crate::combiner::{Combiner, FactorScore, candidate_count, ensure_finite};

/// Combiner whose composite is the arithmetic mean of the factor z-scores.
///
/// # Examples
///
/// ```rust
/// use deepvalue_combine::{Combiner, EqualWeightCombiner, FactorScore};
/// use ndarray::Array1;
///
/// let factors = vec![
///     FactorScore::new("earnings_yield", Array1::from_vec(vec![2.0, 4.0, 6.0])),
///     FactorScore::new("book_to_market", Array1::from_vec(vec![0.0, 2.0, 4.0])),
/// ];
///
/// let composite = EqualWeightCombiner.combine(&factors).unwrap();
/// assert_eq!(composite.to_vec(), vec![1.0, 3.0, 5.0]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualWeightCombiner;

impl Combiner for EqualWeightCombiner {
    fn combine(&self, factors: &[FactorScore]) -> Result<Array1<f64>> {
        let n = candidate_count(factors)?;

        let mut composite = Array1::zeros(n);
        for factor in factors {
            composite += &factor.scores;
        }
        composite /= factors.len() as f64;

        ensure_finite(composite)
    }

    fn name(&self) -> &str {
        "equal_weight"
    }
}
