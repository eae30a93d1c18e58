//! Book-to-market value factor.

use deepvalue_traits::{Result, Universe, columns};

use crate::{FactorKind, ValueFactor};

/// Book-to-market of a single issuer: `1 / price_to_book`, or `0.0` when
/// price-to-book is not positive.
#[must_use]
pub fn book_to_market(price_to_book: f64) -> f64 {
    if price_to_book > 0.0 {
        1.0 / price_to_book
    } else {
        0.0
    }
}

/// Book-to-market factor over the candidate set.
///
/// Higher values indicate issuers trading closer to (or below) their book
/// value of equity.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookToMarket;

impl ValueFactor for BookToMarket {
    fn kind(&self) -> FactorKind {
        FactorKind::BookToMarket
    }

    fn required_columns(&self) -> &[&str] {
        &[columns::PRICE_TO_BOOK]
    }

    fn compute(&self, universe: &Universe) -> Result<Vec<f64>> {
        self.validate(universe)?;
        Ok(universe
            .f64_values(columns::PRICE_TO_BOOK)?
            .into_iter()
            .map(book_to_market)
            .collect())
    }
}
