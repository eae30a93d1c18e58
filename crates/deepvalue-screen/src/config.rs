//! Screening run configuration.
//!
//! Every threshold of a run lives in one [`ScreenConfig`] value that is
//! validated before the first fetch. Two presets reproduce the rankings the
//! screener has historically produced.

use deepvalue_combine::CompositeMethod;
use deepvalue_factors::WinsorMode;
use deepvalue_traits::{Result, ScreenError, Universe, columns};
use serde::{Deserialize, Serialize};

/// Largest annualized volatility treated as plausible (1000%).
///
/// The sentinel volatility must lie above it so that a ticker without usable
/// history is never preferred over one with a measured volatility.
pub const MAX_PLAUSIBLE_VOLATILITY: f64 = 10.0;

/// Predicate that excludes issuers outside the screened sectors.
///
/// The data carries no sector field, so financial-sector issuers are
/// recognized by an EV/EBIT that is not positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorExclusion {
    /// Keep every issuer.
    None,
    /// Drop issuers whose EV/EBIT is zero or negative.
    #[default]
    NonPositiveEvEbit,
}

impl SectorExclusion {
    /// Whether this predicate removes anything.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Keep-mask of the candidates that pass the predicate.
    ///
    /// # Errors
    ///
    /// Returns an error if the EV/EBIT column is missing.
    pub fn keep_mask(self, universe: &Universe) -> Result<Vec<bool>> {
        match self {
            Self::None => Ok(vec![true; universe.len()]),
            Self::NonPositiveEvEbit => Ok(universe
                .f64_values(columns::EV_TO_EBIT)?
                .into_iter()
                .map(|ev_ebit| ev_ebit > 0.0)
                .collect()),
        }
    }
}

/// Settings of the volatility estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VolatilityConfig {
    /// Calendar days of price history requested
    pub lookback_days: u32,
    /// Fewest valid daily returns needed for a measured volatility
    pub min_returns: usize,
    /// Trading days per year for annualization
    pub trading_days: f64,
    /// Volatility assigned when history is insufficient
    pub sentinel: f64,
    /// Tickers per price-history request
    pub batch_size: usize,
    /// Seconds to wait for one price-history request
    pub fetch_timeout_secs: u64,
}

impl Default for VolatilityConfig {
    fn default() -> Self {
        Self {
            lookback_days: 365,
            min_returns: 100,
            trading_days: 252.0,
            sentinel: 999.0,
            batch_size: 200,
            fetch_timeout_secs: 60,
        }
    }
}

impl VolatilityConfig {
    /// Checks the estimator settings.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.lookback_days == 0 {
            return Err(invalid("volatility.lookback_days must be positive"));
        }
        if self.min_returns < 2 {
            return Err(invalid(format!(
                "volatility.min_returns must be at least 2, got {}",
                self.min_returns
            )));
        }
        if !self.trading_days.is_finite() || self.trading_days <= 0.0 {
            return Err(invalid(format!(
                "volatility.trading_days must be positive, got {}",
                self.trading_days
            )));
        }
        if !self.sentinel.is_finite() || self.sentinel <= MAX_PLAUSIBLE_VOLATILITY {
            return Err(invalid(format!(
                "volatility.sentinel must be finite and above {MAX_PLAUSIBLE_VOLATILITY}, got {}",
                self.sentinel
            )));
        }
        if self.batch_size == 0 {
            return Err(invalid("volatility.batch_size must be positive"));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(invalid("volatility.fetch_timeout_secs must be positive"));
        }
        Ok(())
    }
}

/// Configuration of one screening run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenConfig {
    /// Candidates need liquidity strictly above this value
    pub min_liquidity: f64,
    /// Drop candidates with a non-positive P/E
    pub require_positive_pe: bool,
    /// Sector predicate
    pub sector_exclusion: SectorExclusion,
    /// Fraction of the most volatile candidates to drop, if any
    ///
    /// Written as a plain number in configuration files, where `0` disables
    /// the cut.
    #[serde(with = "cut_fraction")]
    pub volatility_cut: Option<f64>,
    /// Volatility estimator settings
    pub volatility: VolatilityConfig,
    /// Winsorization mode for every factor
    pub winsorization: WinsorMode,
    /// How z-scores form the composite index
    pub composite: CompositeMethod,
    /// Length of the shortlist
    pub top_n: usize,
    /// Resolve issuer names for the shortlist
    pub lookup_names: bool,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self::zscore_ranking()
    }
}

impl ScreenConfig {
    /// Z-score ranking: 3M liquidity floor, 10% risk cut, dynamic
    /// winsorization, summed z-scores, top 100.
    #[must_use]
    pub fn zscore_ranking() -> Self {
        Self {
            min_liquidity: 3_000_000.0,
            require_positive_pe: true,
            sector_exclusion: SectorExclusion::NonPositiveEvEbit,
            volatility_cut: Some(0.10),
            volatility: VolatilityConfig::default(),
            winsorization: WinsorMode::default(),
            composite: CompositeMethod::Sum,
            top_n: 100,
            lookup_names: false,
        }
    }

    /// Portfolio ranking: 6M liquidity floor, 8% risk cut, no sector
    /// exclusion, fixed winsorization bounds, averaged z-scores, top 60
    /// with issuer names.
    #[must_use]
    pub fn portfolio_ranking() -> Self {
        Self {
            min_liquidity: 6_000_000.0,
            require_positive_pe: true,
            sector_exclusion: SectorExclusion::None,
            volatility_cut: Some(0.08),
            volatility: VolatilityConfig::default(),
            winsorization: WinsorMode::portfolio_bounds(),
            composite: CompositeMethod::Mean,
            top_n: 60,
            lookup_names: true,
        }
    }

    /// Checks every setting.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if !self.min_liquidity.is_finite() || self.min_liquidity < 0.0 {
            return Err(invalid(format!(
                "min_liquidity must be finite and non-negative, got {}",
                self.min_liquidity
            )));
        }
        if let Some(cut) = self.volatility_cut
            && !(cut > 0.0 && cut < 1.0)
        {
            return Err(invalid(format!(
                "volatility_cut must lie strictly between 0 and 1, got {cut}"
            )));
        }
        if self.top_n == 0 {
            return Err(invalid("top_n must be positive"));
        }
        self.volatility.validate()?;
        self.winsorization.validate()
    }
}

fn invalid(msg: impl Into<String>) -> ScreenError {
    ScreenError::InvalidConfig(msg.into())
}

/// `Option<f64>` as a bare number, zero standing for `None`.
mod cut_fraction {
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        value: &Option<f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.unwrap_or(0.0))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        let fraction = f64::deserialize(deserializer)?;
        Ok((fraction != 0.0).then_some(fraction))
    }
}
