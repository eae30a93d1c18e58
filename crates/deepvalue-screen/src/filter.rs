//! Screening cuts.
//!
//! The cuts run in a fixed order, each on the set left by the previous one:
//!
//! 1. liquidity strictly above the configured minimum
//! 2. positive P/E
//! 3. sector predicate (optional)
//! 4. risk cut: volatility strictly below the `1 - fraction` quantile of the
//!    current set, once volatility is known
//!
//! Every cut only removes rows. An empty set passes through every cut.

use deepvalue_traits::{Result, Universe, columns, stats};
use tracing::debug;

use crate::config::{ScreenConfig, SectorExclusion};

/// The cuts of a run, built from its configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreeningFilter {
    min_liquidity: f64,
    require_positive_pe: bool,
    sector_exclusion: SectorExclusion,
    volatility_cut: Option<f64>,
}

impl ScreeningFilter {
    /// Creates the cuts described by `config`.
    #[must_use]
    pub const fn from_config(config: &ScreenConfig) -> Self {
        Self {
            min_liquidity: config.min_liquidity,
            require_positive_pe: config.require_positive_pe,
            sector_exclusion: config.sector_exclusion,
            volatility_cut: config.volatility_cut,
        }
    }

    /// Whether the profitability cut runs.
    #[must_use]
    pub const fn requires_positive_pe(&self) -> bool {
        self.require_positive_pe
    }

    /// The sector predicate.
    #[must_use]
    pub const fn sector_exclusion(&self) -> SectorExclusion {
        self.sector_exclusion
    }

    /// The fraction dropped by the risk cut, if enabled.
    #[must_use]
    pub const fn volatility_cut(&self) -> Option<f64> {
        self.volatility_cut
    }

    /// Keeps candidates with liquidity strictly above the minimum.
    ///
    /// # Errors
    ///
    /// Returns an error if the liquidity column is missing.
    pub fn liquidity(&self, universe: &Universe) -> Result<Universe> {
        let mask: Vec<bool> = universe
            .f64_values(columns::LIQUIDITY)?
            .into_iter()
            .map(|liq| liq > self.min_liquidity)
            .collect();
        universe.retain(&mask)
    }

    /// Keeps candidates with a positive P/E.
    ///
    /// # Errors
    ///
    /// Returns an error if the P/E column is missing.
    pub fn profitability(&self, universe: &Universe) -> Result<Universe> {
        let mask: Vec<bool> = universe
            .f64_values(columns::PRICE_TO_EARNINGS)?
            .into_iter()
            .map(|pe| pe > 0.0)
            .collect();
        universe.retain(&mask)
    }

    /// Applies the sector predicate.
    ///
    /// # Errors
    ///
    /// Returns an error if a column the predicate reads is missing.
    pub fn sector(&self, universe: &Universe) -> Result<Universe> {
        universe.retain(&self.sector_exclusion.keep_mask(universe)?)
    }

    /// Drops the most volatile fraction of the candidates.
    ///
    /// The cutoff is the `1 - fraction` quantile (linear interpolation) of
    /// the current volatility column and survivors are strictly below it.
    /// Disabled cuts and empty sets pass through unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the volatility column is missing.
    pub fn risk(&self, universe: &Universe) -> Result<Universe> {
        let Some(fraction) = self.volatility_cut else {
            return Ok(universe.clone());
        };
        let volatility = universe.f64_values(columns::VOLATILITY)?;
        let Some(cutoff) = stats::quantile(&volatility, 1.0 - fraction) else {
            return Ok(universe.clone());
        };
        debug!(fraction, cutoff, "risk cut");

        let mask: Vec<bool> = volatility.iter().map(|&v| v < cutoff).collect();
        universe.retain(&mask)
    }
}

impl Default for ScreeningFilter {
    fn default() -> Self {
        Self::from_config(&ScreenConfig::default())
    }
}
