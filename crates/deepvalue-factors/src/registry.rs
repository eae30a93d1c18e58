//! Factor registry.
//!
//! Lists every valuation factor the screener knows about, including the ones
//! it cannot compute. An unavailable factor is carried through the factor
//! table as null and never contributes to the composite index.

use deepvalue_traits::columns;
use serde::{Deserialize, Serialize};

/// Valuation factors known to the screener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    /// Inverse EV/EBIT with P/E fallback.
    EarningsYield,
    /// Inverse price-to-book.
    BookToMarket,
    /// Operating cash flow relative to market value.
    CashFlowYield,
}

impl FactorKind {
    /// Short identifier, as used in logs and configuration.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::EarningsYield => "earnings_yield",
            Self::BookToMarket => "book_to_market",
            Self::CashFlowYield => "cash_flow_yield",
        }
    }
}

/// Metadata about a factor.
#[derive(Debug, Clone, Serialize)]
pub struct FactorInfo {
    /// Factor identity
    pub kind: FactorKind,

    /// Column holding the raw factor value in the factor table
    pub column: &'static str,

    /// Human-readable description
    pub description: &'static str,

    /// Whether the factor can be computed from the fundamentals snapshot
    pub available: bool,
}

/// Get information about every registered factor.
#[must_use]
pub fn available_factors() -> Vec<FactorInfo> {
    vec![
        FactorInfo {
            kind: FactorKind::EarningsYield,
            column: columns::EARNINGS_YIELD,
            description: "EBIT relative to enterprise value (inverse EV/EBIT, P/E fallback)",
            available: true,
        },
        FactorInfo {
            kind: FactorKind::BookToMarket,
            column: columns::BOOK_TO_MARKET,
            description: "Book value of equity relative to market value (inverse P/B)",
            available: true,
        },
        FactorInfo {
            kind: FactorKind::CashFlowYield,
            column: columns::CASH_FLOW_YIELD,
            description: "Cash flow relative to market value (no public source)",
            available: false,
        },
    ]
}

/// Factors that feed the composite index.
#[must_use]
pub fn composite_factors() -> Vec<FactorKind> {
    available_factors()
        .into_iter()
        .filter(|info| info.available)
        .map(|info| info.kind)
        .collect()
}
