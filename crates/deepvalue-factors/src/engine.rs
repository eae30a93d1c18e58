//! Factor engine: raw factors to composite index.
//!
//! Given the surviving candidates, the engine adds the factor table columns:
//!
//! | column | content |
//! |---|---|
//! | `market_cap` | book value × price-to-book |
//! | `earnings_yield`, `book_to_market` | raw factors |
//! | `cash_flow_yield` | null (unavailable) |
//! | `earnings_yield_w`, `book_to_market_w` | winsorized factors |
//! | `z_earnings_yield`, `z_book_to_market` | z-scores over the candidate set |
//! | `composite` | sum or mean of the z-scores |
//!
//! A z-score is defined as 0 for every candidate when the set has fewer than
//! two members or the winsorized factor has zero variance.

use deepvalue_combine::{CompositeMethod, FactorScore};
use deepvalue_traits::{Result, Universe, columns, stats};
use ndarray::Array1;
use tracing::debug;

use crate::{
    FactorKind, ValueFactor, WinsorMode,
    value::{BookToMarket, EarningsYield},
};

/// Derives, winsorizes, standardizes and combines the valuation factors.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactorEngine {
    winsorization: WinsorMode,
    composite: CompositeMethod,
}

impl FactorEngine {
    /// Creates an engine with the given winsorization mode and composite convention.
    #[must_use]
    pub const fn new(winsorization: WinsorMode, composite: CompositeMethod) -> Self {
        Self {
            winsorization,
            composite,
        }
    }

    /// The winsorization mode of this engine.
    #[must_use]
    pub const fn winsorization(&self) -> &WinsorMode {
        &self.winsorization
    }

    /// The composite convention of this engine.
    #[must_use]
    pub const fn composite(&self) -> CompositeMethod {
        self.composite
    }

    /// Adds the factor table columns to `universe`.
    ///
    /// # Errors
    ///
    /// Returns an error if a canonical fundamentals column is missing.
    pub fn apply(&self, mut universe: Universe) -> Result<Universe> {
        let book_value = universe.f64_values(columns::BOOK_VALUE)?;
        let price_to_book = universe.f64_values(columns::PRICE_TO_BOOK)?;
        let market_cap: Vec<f64> = book_value
            .iter()
            .zip(&price_to_book)
            .map(|(bv, pb)| bv * pb)
            .collect();

        let earnings_yield = EarningsYield.compute(&universe)?;
        let book_to_market = BookToMarket.compute(&universe)?;

        let ey_w = self
            .winsorization
            .apply(FactorKind::EarningsYield, &earnings_yield);
        let btm_w = self
            .winsorization
            .apply(FactorKind::BookToMarket, &book_to_market);

        let (z_ey, ey_stats) = stats::standardize(&ey_w);
        let (z_btm, btm_stats) = stats::standardize(&btm_w);
        debug!(
            candidates = universe.len(),
            ey_mean = ey_stats.mean,
            ey_std = ey_stats.std,
            btm_mean = btm_stats.mean,
            btm_std = btm_stats.std,
            "standardized factors"
        );

        let composite = self.composite.combine(&[
            FactorScore::new(FactorKind::EarningsYield.name(), Array1::from_vec(z_ey.clone())),
            FactorScore::new(FactorKind::BookToMarket.name(), Array1::from_vec(z_btm.clone())),
        ])?;

        let n = universe.len();
        universe.set_f64_column(columns::MARKET_CAP, market_cap)?;
        universe.set_f64_column(columns::EARNINGS_YIELD, earnings_yield)?;
        universe.set_f64_column(columns::BOOK_TO_MARKET, book_to_market)?;
        universe.set_optional_f64_column(columns::CASH_FLOW_YIELD, vec![None; n])?;
        universe.set_f64_column(columns::EARNINGS_YIELD_W, ey_w)?;
        universe.set_f64_column(columns::BOOK_TO_MARKET_W, btm_w)?;
        universe.set_f64_column(columns::Z_EARNINGS_YIELD, z_ey)?;
        universe.set_f64_column(columns::Z_BOOK_TO_MARKET, z_btm)?;
        universe.set_f64_column(columns::COMPOSITE, composite.to_vec())?;

        Ok(universe)
    }
}
