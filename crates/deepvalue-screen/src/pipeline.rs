//! The screening run.
//!
//! One run processes one fundamentals snapshot end to end:
//!
//! ```text
//! fetch snapshot -> normalize -> deduplicate -> liquidity -> profitability
//!   -> sector -> volatility -> risk cut -> factors -> rank -> names
//! ```
//!
//! Configuration errors are the only fatal class and are reported by
//! [`ScreenPipeline::new`], before any fetch. Provider failures degrade to
//! missing data (an empty snapshot, sentinel volatilities, tickers as
//! names) and the run still produces a report.

use deepvalue_factors::FactorEngine;
use deepvalue_traits::{
    Date, FundamentalsProvider, NameLookup, NoNames, PriceHistoryProvider, Result, Ticker,
    columns,
};
use polars::prelude::DataFrame;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::{
    config::ScreenConfig,
    dedup::deduplicate,
    filter::ScreeningFilter,
    normalize::{AliasTable, Normalizer},
    rank::Ranker,
    report::{ScreenReport, Stage, StageLog},
    volatility::VolatilityEstimator,
};

/// A configured screening pipeline and its collaborators.
#[derive(Debug)]
pub struct ScreenPipeline<F, P, N = NoNames> {
    config: ScreenConfig,
    normalizer: Normalizer,
    fundamentals: F,
    prices: P,
    names: N,
}

impl<F, P> ScreenPipeline<F, P> {
    /// Creates a pipeline without name lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::InvalidConfig`](deepvalue_traits::ScreenError::InvalidConfig)
    /// if `config` does not validate.
    pub fn new(config: ScreenConfig, fundamentals: F, prices: P) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            normalizer: Normalizer::default(),
            fundamentals,
            prices,
            names: NoNames,
        })
    }
}

impl<F, P, N> ScreenPipeline<F, P, N> {
    /// Uses `names` to resolve issuer names of the shortlist.
    ///
    /// Lookups only happen when the configuration enables them.
    pub fn with_names<M>(self, names: M) -> ScreenPipeline<F, P, M> {
        ScreenPipeline {
            config: self.config,
            normalizer: self.normalizer,
            fundamentals: self.fundamentals,
            prices: self.prices,
            names,
        }
    }

    /// Uses a custom alias table for the snapshot's field names.
    #[must_use]
    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.normalizer = Normalizer::new(aliases);
        self
    }

    /// The run configuration.
    pub const fn config(&self) -> &ScreenConfig {
        &self.config
    }
}

impl<F, P, N> ScreenPipeline<F, P, N>
where
    F: FundamentalsProvider,
    P: PriceHistoryProvider,
    N: NameLookup,
{
    /// Fetches the fundamentals snapshot and screens it.
    ///
    /// Price windows end on `as_of`. A failed snapshot fetch is logged and
    /// screened as an empty snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot has rows but no ticker column.
    pub async fn run(&self, as_of: Date) -> Result<ScreenReport> {
        let raw = match self.fundamentals.fetch_fundamentals().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    provider = self.fundamentals.name(),
                    error = %e,
                    "fundamentals unavailable, screening an empty snapshot"
                );
                DataFrame::empty()
            }
        };
        self.screen(&raw, as_of).await
    }

    /// Screens an already fetched snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot has rows but no ticker column.
    pub async fn screen(&self, raw: &DataFrame, as_of: Date) -> Result<ScreenReport> {
        let filter = ScreeningFilter::from_config(&self.config);
        let mut log = StageLog::default();

        let universe = self.normalizer.normalize(raw)?;
        log.record(Stage::Normalized, universe.len());

        let universe = deduplicate(&universe)?;
        log.record(Stage::Deduplicated, universe.len());

        let mut universe = filter.liquidity(&universe)?;
        log.record(Stage::Liquidity, universe.len());

        if filter.requires_positive_pe() {
            universe = filter.profitability(&universe)?;
            log.record(Stage::Profitability, universe.len());
        }

        if filter.sector_exclusion().is_active() {
            universe = filter.sector(&universe)?;
            log.record(Stage::Sector, universe.len());
        }

        let estimator = VolatilityEstimator::new(&self.prices, &self.config.volatility);
        let mut universe = estimator.attach(universe, as_of).await?;
        let sentinel_count = universe
            .f64_values(columns::VOLATILITY)?
            .iter()
            .filter(|&&v| v == self.config.volatility.sentinel)
            .count();
        log.record(Stage::Volatility, universe.len());
        if sentinel_count > 0 {
            info!(sentinel_count, "candidates without usable price history");
        }

        if filter.volatility_cut().is_some() {
            universe = filter.risk(&universe)?;
            log.record(Stage::RiskCut, universe.len());
        }

        let table =
            FactorEngine::new(self.config.winsorization, self.config.composite).apply(universe)?;
        let mut ranking = Ranker::new(self.config.top_n).rank(&table)?;
        log.record(Stage::Ranked, ranking.len());

        if self.config.lookup_names && !ranking.is_empty() {
            let names = self.resolve_names(&ranking.tickers()).await;
            ranking = ranking.with_names(&names);
        }

        Ok(ScreenReport {
            as_of,
            stages: log.into_stages(),
            sentinel_count,
            ranking,
        })
    }

    async fn resolve_names(&self, tickers: &[Ticker]) -> HashMap<Ticker, String> {
        let mut names = HashMap::with_capacity(tickers.len());
        for ticker in tickers {
            match self.names.issuer_name(ticker).await {
                Ok(name) if !name.trim().is_empty() => {
                    names.insert(ticker.clone(), name.trim().to_string());
                }
                Ok(_) => debug!(ticker = %ticker, "empty issuer name, using ticker"),
                Err(e) => debug!(ticker = %ticker, error = %e, "issuer name unavailable, using ticker"),
            }
        }
        info!(
            resolved = names.len(),
            requested = tickers.len(),
            "resolved issuer names"
        );
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepvalue_traits::{HistoryWindow, PriceHistory, ScreenError};
    use polars::df;

    struct Snapshot(DataFrame);

    impl FundamentalsProvider for Snapshot {
        fn name(&self) -> &str {
            "snapshot"
        }

        async fn fetch_fundamentals(&self) -> Result<DataFrame> {
            Ok(self.0.clone())
        }
    }

    struct Offline;

    impl FundamentalsProvider for Offline {
        fn name(&self) -> &str {
            "offline"
        }

        async fn fetch_fundamentals(&self) -> Result<DataFrame> {
            Err(ScreenError::Provider("connection refused".into()))
        }
    }

    impl PriceHistoryProvider for Offline {
        fn name(&self) -> &str {
            "offline"
        }

        async fn fetch_closes(
            &self,
            _tickers: &[Ticker],
            _window: HistoryWindow,
        ) -> Result<PriceHistory> {
            Err(ScreenError::Provider("connection refused".into()))
        }
    }

    fn as_of() -> Date {
        Date::from_ymd_opt(2024, 6, 28).unwrap()
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let config = ScreenConfig {
            top_n: 0,
            ..ScreenConfig::default()
        };
        let result = ScreenPipeline::new(config, Offline, Offline);
        assert!(matches!(result, Err(ScreenError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_fundamentals_outage_gives_empty_report() {
        let pipeline = ScreenPipeline::new(ScreenConfig::default(), Offline, Offline).unwrap();
        let report = pipeline.run(as_of()).await.unwrap();
        assert!(report.ranking.is_empty());
        assert_eq!(report.remaining_after(Stage::Normalized), Some(0));
        assert_eq!(report.remaining_after(Stage::Ranked), Some(0));
    }

    #[tokio::test]
    async fn test_price_outage_with_risk_cut_empties_set() {
        let snapshot = df! {
            "papel" => &["PETR4", "VALE3"],
            "liq2m" => &[5.0e7, 6.0e7],
            "pl" => &[4.0, 6.0],
            "evebit" => &[3.0, 5.0],
            "pvp" => &[1.0, 1.4],
        }
        .unwrap();
        let pipeline =
            ScreenPipeline::new(ScreenConfig::default(), Snapshot(snapshot), Offline).unwrap();
        let report = pipeline.run(as_of()).await.unwrap();

        // every candidate holds the sentinel, so nobody is strictly below the cutoff
        assert_eq!(report.sentinel_count, 2);
        assert_eq!(report.remaining_after(Stage::Volatility), Some(2));
        assert_eq!(report.remaining_after(Stage::RiskCut), Some(0));
        assert!(report.ranking.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_stages_are_not_reported() {
        let snapshot = df! {
            "papel" => &["PETR4"],
            "liq2m" => &[5.0e7],
            "pl" => &[-4.0],
            "evebit" => &[0.0],
            "pvp" => &[1.0],
        }
        .unwrap();
        let config = ScreenConfig {
            require_positive_pe: false,
            sector_exclusion: crate::SectorExclusion::None,
            volatility_cut: None,
            ..ScreenConfig::default()
        };
        let pipeline = ScreenPipeline::new(config, Snapshot(snapshot), Offline).unwrap();
        let report = pipeline.run(as_of()).await.unwrap();

        assert_eq!(report.remaining_after(Stage::Profitability), None);
        assert_eq!(report.remaining_after(Stage::Sector), None);
        assert_eq!(report.remaining_after(Stage::RiskCut), None);
        assert_eq!(report.ranking.len(), 1);
    }
}
