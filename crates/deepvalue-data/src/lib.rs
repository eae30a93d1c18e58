//! File-backed collaborators for the deepvalue screener.
//!
//! This crate provides providers that read local files instead of remote
//! services:
//!
//! - [`CsvFundamentals`]: a fundamentals snapshot, one row per ticker, read
//!   as raw text so the screener's normalizer handles field names and
//!   number formats
//! - [`CsvPriceDirectory`]: one `<TICKER>.csv` file of daily closes per
//!   ticker
//! - [`load_names`]: a `ticker,name` table usable as a name lookup
//!
//! # Usage
//!
//! ```rust,ignore
//! use deepvalue_data::{CsvFundamentals, CsvPriceDirectory};
//! use deepvalue_screen::{ScreenConfig, ScreenPipeline};
//!
//! let fundamentals = CsvFundamentals::new("data/fundamentus.csv").with_separator(b';');
//! let prices = CsvPriceDirectory::new("data/prices");
//! let pipeline = ScreenPipeline::new(ScreenConfig::default(), fundamentals, prices)?;
//! let report = pipeline.run(as_of).await?;
//! ```

mod error;
mod fundamentals;
mod names;
mod prices;
mod table;

pub use error::DataError;
pub use fundamentals::CsvFundamentals;
pub use names::load_names;
pub use prices::CsvPriceDirectory;

/// Result type for file provider operations.
pub type Result<T> = std::result::Result<T, DataError>;
