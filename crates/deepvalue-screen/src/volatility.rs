//! Realized volatility of each candidate.
//!
//! Daily closes over a trailing window are turned into simple returns and
//! annualized as `sample_std(returns) * sqrt(trading_days)`. A ticker with
//! fewer valid returns than the configured minimum gets the sentinel value,
//! which lies above any plausible volatility, so it can never be preferred
//! over a ticker with measured risk.
//!
//! Prices are requested in batches. A batch that fails or times out leaves
//! its tickers without history, which again means the sentinel. Fetch
//! failures never abort the run.

use deepvalue_traits::{
    Date, HistoryWindow, PriceHistory, PriceHistoryProvider, Result, Ticker, Universe, columns,
    stats,
};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::VolatilityConfig;

/// Simple daily returns between consecutive closes.
///
/// A return is valid only when both closes are present, the earlier one is
/// non-zero and the result is finite. A missing close therefore invalidates
/// the returns on both sides of it.
pub fn daily_returns(closes: &[Option<f64>]) -> Vec<f64> {
    closes
        .windows(2)
        .filter_map(|pair| match (pair[0], pair[1]) {
            (Some(prev), Some(curr)) if prev != 0.0 => {
                Some(curr / prev - 1.0).filter(|r| r.is_finite())
            }
            _ => None,
        })
        .collect()
}

/// Annualized volatility of a close series, or the sentinel.
///
/// ```
/// use deepvalue_screen::{VolatilityConfig, volatility::realized_volatility};
///
/// let config = VolatilityConfig::default();
/// let short = vec![Some(10.0); 60];
/// assert_eq!(realized_volatility(&short, &config), config.sentinel);
/// ```
pub fn realized_volatility(closes: &[Option<f64>], config: &VolatilityConfig) -> f64 {
    let returns = daily_returns(closes);
    if returns.len() < config.min_returns {
        return config.sentinel;
    }
    match stats::sample_std(&returns) {
        Some(std) if std.is_finite() => std * config.trading_days.sqrt(),
        _ => config.sentinel,
    }
}

/// Fetches price histories and assigns a volatility to every ticker.
#[derive(Debug)]
pub struct VolatilityEstimator<'a, P> {
    provider: &'a P,
    config: &'a VolatilityConfig,
}

impl<'a, P: PriceHistoryProvider> VolatilityEstimator<'a, P> {
    /// Creates an estimator reading closes from `provider`.
    pub const fn new(provider: &'a P, config: &'a VolatilityConfig) -> Self {
        Self { provider, config }
    }

    /// Fetches the closes of `tickers` in batches.
    ///
    /// Batches run one after another. Failed or timed-out batches are logged
    /// and contribute nothing.
    pub async fn fetch(&self, tickers: &[Ticker], as_of: Date) -> PriceHistory {
        let window = HistoryWindow::new(as_of, self.config.lookback_days);
        let limit = Duration::from_secs(self.config.fetch_timeout_secs);
        let mut history = PriceHistory::new();

        for batch in tickers.chunks(self.config.batch_size.max(1)) {
            match timeout(limit, self.provider.fetch_closes(batch, window)).await {
                Ok(Ok(closes)) => {
                    debug!(
                        provider = self.provider.name(),
                        requested = batch.len(),
                        returned = closes.len(),
                        "fetched price batch"
                    );
                    history.merge(closes);
                }
                Ok(Err(e)) => {
                    warn!(
                        provider = self.provider.name(),
                        tickers = batch.len(),
                        error = %e,
                        "price batch failed, assigning sentinel"
                    );
                }
                Err(_) => {
                    warn!(
                        provider = self.provider.name(),
                        tickers = batch.len(),
                        timeout_secs = self.config.fetch_timeout_secs,
                        "price batch timed out, assigning sentinel"
                    );
                }
            }
        }
        history
    }

    /// Volatility of every ticker, in input order.
    pub async fn estimate(&self, tickers: &[Ticker], as_of: Date) -> Vec<f64> {
        let history = self.fetch(tickers, as_of).await;
        let volatility: Vec<f64> = tickers
            .iter()
            .map(|t| {
                history
                    .closes(t)
                    .map_or(self.config.sentinel, |closes| {
                        realized_volatility(closes, self.config)
                    })
            })
            .collect();

        let sentinels = volatility
            .iter()
            .filter(|&&v| v == self.config.sentinel)
            .count();
        debug!(tickers = tickers.len(), sentinels, "estimated volatility");
        volatility
    }

    /// Adds the volatility column to `universe`.
    ///
    /// Every candidate gets a value before the column is written, so later
    /// stages never see a partial column.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticker column is missing.
    pub async fn attach(&self, mut universe: Universe, as_of: Date) -> Result<Universe> {
        let tickers = universe.tickers()?;
        let volatility = self.estimate(&tickers, as_of).await;
        universe.set_f64_column(columns::VOLATILITY, volatility)?;
        Ok(universe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use deepvalue_traits::ScreenError;
    use polars::df;
    use std::collections::HashMap;

    /// Closes following a deterministic zig-zag.
    fn zigzag(days: usize) -> Vec<Option<f64>> {
        (0..days)
            .map(|i| {
                let step = [1.01, 0.985, 1.02, 0.99, 1.005][i % 5];
                Some(20.0 * step + i as f64 * 0.01)
            })
            .collect()
    }

    fn as_of() -> Date {
        Date::from_ymd_opt(2024, 6, 28).unwrap()
    }

    struct MapPrices {
        series: HashMap<Ticker, Vec<Option<f64>>>,
        fail_on: Option<Ticker>,
    }

    impl PriceHistoryProvider for MapPrices {
        fn name(&self) -> &str {
            "map"
        }

        async fn fetch_closes(
            &self,
            tickers: &[Ticker],
            _window: HistoryWindow,
        ) -> Result<PriceHistory> {
            if let Some(bad) = &self.fail_on
                && tickers.contains(bad)
            {
                return Err(ScreenError::Provider("batch rejected".into()));
            }
            Ok(tickers
                .iter()
                .filter_map(|t| self.series.get(t).map(|s| (t.clone(), s.clone())))
                .collect())
        }
    }

    struct StalledPrices;

    impl PriceHistoryProvider for StalledPrices {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn fetch_closes(
            &self,
            _tickers: &[Ticker],
            _window: HistoryWindow,
        ) -> Result<PriceHistory> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(PriceHistory::new())
        }
    }

    #[test]
    fn test_daily_returns_skip_missing() {
        let closes = [Some(10.0), Some(11.0), None, Some(12.0), Some(12.0), Some(0.0), Some(5.0)];
        let returns = daily_returns(&closes);
        // 10->11, 12->12, 12->0 ; around the gap and after the zero close nothing
        assert_eq!(returns.len(), 3);
        assert_relative_eq!(returns[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(returns[1], 0.0);
        assert_relative_eq!(returns[2], -1.0);
    }

    #[test]
    fn test_sixty_days_is_sentinel() {
        let config = VolatilityConfig::default();
        assert_eq!(realized_volatility(&zigzag(60), &config), 999.0);
    }

    #[test]
    fn test_sentinel_boundary() {
        let config = VolatilityConfig::default();
        // 100 closes give 99 returns, 101 closes give 100
        assert_eq!(realized_volatility(&zigzag(100), &config), 999.0);
        assert!(realized_volatility(&zigzag(101), &config) < 999.0);
    }

    #[test]
    fn test_two_hundred_returns_match_formula() {
        let config = VolatilityConfig::default();
        let closes = zigzag(201);
        let returns = daily_returns(&closes);
        assert_eq!(returns.len(), 200);

        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let expected = var.sqrt() * 252.0_f64.sqrt();

        assert_relative_eq!(
            realized_volatility(&closes, &config),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_gaps_count_against_minimum() {
        let config = VolatilityConfig::default();
        let mut closes = zigzag(150);
        // every fifth close missing: each gap removes two returns
        for (i, close) in closes.iter_mut().enumerate() {
            if i % 5 == 2 {
                *close = None;
            }
        }
        assert!(daily_returns(&closes).len() < 100);
        assert_eq!(realized_volatility(&closes, &config), 999.0);
    }

    #[tokio::test]
    async fn test_estimate_partial_failure() {
        let series: HashMap<Ticker, Vec<Option<f64>>> = [
            ("PETR4".to_string(), zigzag(250)),
            ("VALE3".to_string(), zigzag(250)),
            ("ITUB4".to_string(), zigzag(250)),
        ]
        .into_iter()
        .collect();
        let provider = MapPrices {
            series,
            fail_on: Some("ITUB4".to_string()),
        };
        let config = VolatilityConfig {
            batch_size: 2,
            ..VolatilityConfig::default()
        };
        let estimator = VolatilityEstimator::new(&provider, &config);

        let tickers: Vec<Ticker> = ["PETR4", "VALE3", "ITUB4", "DEAD3"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let vol = estimator.estimate(&tickers, as_of()).await;

        assert_eq!(vol.len(), 4);
        assert!(vol[0] < 999.0);
        assert!(vol[1] < 999.0);
        // failed batch and unknown ticker
        assert_eq!(vol[2], 999.0);
        assert_eq!(vol[3], 999.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_gives_sentinel() {
        let config = VolatilityConfig {
            fetch_timeout_secs: 5,
            ..VolatilityConfig::default()
        };
        let estimator = VolatilityEstimator::new(&StalledPrices, &config);
        let vol = estimator.estimate(&["PETR4".to_string()], as_of()).await;
        assert_eq!(vol, vec![999.0]);
    }

    #[tokio::test]
    async fn test_attach_adds_column() {
        let provider = MapPrices {
            series: [("WEGE3".to_string(), zigzag(250))].into_iter().collect(),
            fail_on: None,
        };
        let config = VolatilityConfig::default();
        let universe = Universe::new(df! { "ticker" => &["WEGE3", "MGLU3"] }.unwrap());

        let with_vol = VolatilityEstimator::new(&provider, &config)
            .attach(universe, as_of())
            .await
            .unwrap();
        let vol = with_vol.f64_values(columns::VOLATILITY).unwrap();
        assert!(vol[0] > 0.0 && vol[0] < 999.0);
        assert_eq!(vol[1], 999.0);
    }
}
