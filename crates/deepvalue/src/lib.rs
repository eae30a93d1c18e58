#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # deepvalue
//!
//! Deep value equity screener.
//!
//! deepvalue is an umbrella crate that re-exports all deepvalue sub-crates for
//! convenience. A screening run takes a fundamentals snapshot, keeps one
//! listing per issuer, applies liquidity, profitability, sector and risk
//! cuts, and ranks the survivors by a composite of earnings yield and
//! book-to-market z-scores.
//!
//! ## Quick Start
//!
//! ```ignore
//! use deepvalue::prelude::*;
//!
//! # async fn run() -> deepvalue::Result<()> {
//! let fundamentals = CsvFundamentals::new("data/fundamentus.csv").with_separator(b';');
//! let prices = CsvPriceDirectory::new("data/prices");
//!
//! let pipeline = ScreenPipeline::new(ScreenConfig::zscore_ranking(), fundamentals, prices)?;
//! let report = pipeline.run(Date::from_ymd_opt(2024, 6, 28).unwrap()).await?;
//!
//! for entry in &report.ranking {
//!     println!("{} {} {:.3}", entry.rank, entry.ticker, entry.composite);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Shared types, statistics and collaborator traits
//! - [`factors`] - Value factors, winsorization and the factor engine
//! - [`combine`] - Composite conventions (sum, mean)
//! - [`screen`] - Configuration, screening stages and the pipeline
//! - [`data`] - File-backed providers

/// The version of the deepvalue crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Core Traits and Types
// ============================================================================

/// Shared types, statistics and collaborator traits.
///
/// - [`FundamentalsProvider`] - Source of the raw fundamentals snapshot
/// - [`PriceHistoryProvider`] - Source of daily closes
/// - [`NameLookup`] - Issuer names for the shortlist
pub mod traits {
    pub use deepvalue_traits::*;
}

pub use deepvalue_traits::{
    Date, FundamentalsProvider, NameLookup, PriceHistoryProvider, Result, ScreenError, Ticker,
    Universe,
};

// ============================================================================
// Factors
// ============================================================================

/// Valuation factors.
///
/// Earnings yield (inverse EV/EBIT with an inverse P/E fallback) and
/// book-to-market (inverse P/VP), winsorized with a fixed or quantile
/// [`WinsorMode`](deepvalue_factors::WinsorMode) and standardized over the
/// candidate set.
pub mod factors {
    pub use deepvalue_factors::*;
}

// ============================================================================
// Combination
// ============================================================================

/// Composite conventions.
pub mod combine {
    pub use deepvalue_combine::*;
}

// ============================================================================
// Screening
// ============================================================================

/// Configuration, screening stages and the pipeline.
pub mod screen {
    pub use deepvalue_screen::*;
}

pub use deepvalue_screen::{Ranking, RankingEntry, ScreenConfig, ScreenPipeline, ScreenReport};

// ============================================================================
// Providers
// ============================================================================

/// File-backed providers.
pub mod data {
    pub use deepvalue_data::*;
}

/// Prelude module for convenient imports.
///
/// ```ignore
/// use deepvalue::prelude::*;
/// ```
pub mod prelude {
    pub use deepvalue_combine::CompositeMethod;
    pub use deepvalue_data::{CsvFundamentals, CsvPriceDirectory, load_names};
    pub use deepvalue_factors::{Bounds, FactorEngine, WinsorMode};
    pub use deepvalue_screen::{
        AliasTable, Ranking, RankingEntry, ScreenConfig, ScreenPipeline, ScreenReport,
        SectorExclusion, Stage, VolatilityConfig,
    };
    pub use deepvalue_traits::{
        Date, FundamentalsProvider, NameLookup, PriceHistoryProvider, Result, ScreenError, Ticker,
        Universe,
    };
}
