//! Outcome of a screening run.

use deepvalue_traits::Date;
use serde::Serialize;
use std::fmt;
use tracing::info;

use crate::rank::Ranking;

/// A stage of the screening pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Raw snapshot folded into the canonical schema
    Normalized,
    /// One listing per issuer
    Deduplicated,
    /// Liquidity cut
    Liquidity,
    /// Positive P/E cut
    Profitability,
    /// Sector predicate
    Sector,
    /// Volatility attached to every candidate
    Volatility,
    /// Most volatile fraction dropped
    RiskCut,
    /// Shortlist
    Ranked,
}

impl Stage {
    /// Stage name as used in logs and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normalized => "normalized",
            Self::Deduplicated => "deduplicated",
            Self::Liquidity => "liquidity",
            Self::Profitability => "profitability",
            Self::Sector => "sector",
            Self::Volatility => "volatility",
            Self::RiskCut => "risk_cut",
            Self::Ranked => "ranked",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Candidates left after a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageCount {
    /// The stage
    pub stage: Stage,
    /// Candidates remaining after it
    pub remaining: usize,
}

/// Result of a screening run: per-stage survivor counts and the shortlist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenReport {
    /// Date the price windows end on
    pub as_of: Date,
    /// Survivors per stage, in pipeline order
    pub stages: Vec<StageCount>,
    /// Candidates that received the volatility sentinel
    pub sentinel_count: usize,
    /// The shortlist
    pub ranking: Ranking,
}

impl ScreenReport {
    /// Survivors after `stage`, if that stage ran.
    #[must_use]
    pub fn remaining_after(&self, stage: Stage) -> Option<usize> {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| s.remaining)
    }
}

/// Collects stage counts while a run progresses.
#[derive(Debug, Default)]
pub(crate) struct StageLog {
    stages: Vec<StageCount>,
}

impl StageLog {
    pub(crate) fn record(&mut self, stage: Stage, remaining: usize) {
        info!(stage = stage.name(), remaining, "stage complete");
        self.stages.push(StageCount { stage, remaining });
    }

    pub(crate) fn into_stages(self) -> Vec<StageCount> {
        self.stages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_after() {
        let mut log = StageLog::default();
        log.record(Stage::Normalized, 10);
        log.record(Stage::Deduplicated, 8);
        let report = ScreenReport {
            as_of: Date::from_ymd_opt(2024, 6, 28).unwrap(),
            stages: log.into_stages(),
            sentinel_count: 0,
            ranking: Ranking::default(),
        };

        assert_eq!(report.remaining_after(Stage::Deduplicated), Some(8));
        assert_eq!(report.remaining_after(Stage::RiskCut), None);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::RiskCut.to_string(), "risk_cut");
        assert_eq!(
            serde_json::to_value(Stage::RiskCut).unwrap(),
            serde_json::json!("risk_cut")
        );
    }
}
