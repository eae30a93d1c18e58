//! Trait shared by the row-wise valuation factors.

use deepvalue_traits::{Result, ScreenError, Universe};

use crate::FactorKind;

/// A valuation factor computed row by row from canonical fundamentals.
///
/// Implementations never fail on degenerate rows: a row whose multiples make
/// the factor undefined yields `0.0`.
pub trait ValueFactor: Send + Sync {
    /// Which registered factor this is.
    fn kind(&self) -> FactorKind;

    /// Canonical columns the factor reads.
    fn required_columns(&self) -> &[&str];

    /// Computes the raw factor value of every candidate, in candidate order.
    ///
    /// # Errors
    ///
    /// Returns an error if a required column is missing.
    fn compute(&self, universe: &Universe) -> Result<Vec<f64>>;

    /// Checks that every required column is present.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::MissingColumn`] naming the first absent column.
    fn validate(&self, universe: &Universe) -> Result<()> {
        for col in self.required_columns() {
            if !universe.has_column(col) {
                return Err(ScreenError::MissingColumn((*col).to_string()));
            }
        }
        Ok(())
    }
}
