//! Summed factor combination.

use deepvalue_traits::Result;
use ndarray::Array1;

use crate::combiner::{Combiner, FactorScore, candidate_count, ensure_finite};

/// Combiner whose composite is the plain sum of the factor z-scores.
///
/// With two standardized factors the composite ranges roughly twice as wide
/// as a single z-score; ranks are identical to the equal-weight average.
#[derive(Debug, Clone, Copy, Default)]
pub struct SumCombiner;

impl Combiner for SumCombiner {
    fn combine(&self, factors: &[FactorScore]) -> Result<Array1<f64>> {
        let n = candidate_count(factors)?;

        let mut composite = Array1::zeros(n);
        for factor in factors {
            composite += &factor.scores;
        }

        ensure_finite(composite)
    }

    fn name(&self) -> &str {
        "sum"
    }
}
