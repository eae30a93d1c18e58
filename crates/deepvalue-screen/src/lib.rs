//! Deep value screening pipeline.
//!
//! Takes a fundamentals snapshot of a listed-equity universe and produces a
//! ranked shortlist of cheap, liquid, profitable and not excessively
//! volatile issuers:
//!
//! 1. [`Normalizer`]: provider field names and number formats to the
//!    canonical schema
//! 2. [`deduplicate`]: most liquid listing per issuer
//! 3. [`ScreeningFilter`]: liquidity, profitability and sector cuts
//! 4. [`VolatilityEstimator`]: realized volatility or the sentinel
//! 5. [`ScreeningFilter::risk`]: drop the most volatile fraction
//! 6. [`FactorEngine`](deepvalue_factors::FactorEngine): earnings yield and
//!    book-to-market, winsorized, standardized and combined
//! 7. [`Ranker`]: stable descending sort, top N
//!
//! [`ScreenPipeline`] runs all of it against the collaborator traits of
//! `deepvalue-traits` and returns a [`ScreenReport`].
//!
//! # Example
//!
//! ```ignore
//! use deepvalue_screen::{ScreenConfig, ScreenPipeline};
//!
//! let pipeline = ScreenPipeline::new(ScreenConfig::zscore_ranking(), fundamentals, prices)?;
//! let report = pipeline.run(as_of).await?;
//! for entry in report.ranking.iter() {
//!     println!("{:>3} {:<8} {:+.3}", entry.rank, entry.ticker, entry.composite);
//! }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod dedup;
pub mod filter;
pub mod normalize;
pub mod pipeline;
pub mod rank;
pub mod report;
pub mod volatility;

pub use config::{MAX_PLAUSIBLE_VOLATILITY, ScreenConfig, SectorExclusion, VolatilityConfig};
pub use dedup::deduplicate;
pub use filter::ScreeningFilter;
pub use normalize::{AliasTable, CanonicalField, Normalizer};
pub use pipeline::ScreenPipeline;
pub use rank::{Ranker, Ranking, RankingEntry};
pub use report::{ScreenReport, Stage, StageCount};
pub use volatility::VolatilityEstimator;
