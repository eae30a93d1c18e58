#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types, statistics and collaborator traits for the deepvalue screener.
//!
//! This crate holds everything the screening stages share: the candidate-set
//! wrapper, the error type, the statistical estimators every stage agrees on,
//! and the traits that external data providers implement.

/// The version of the deepvalue-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod provider;
pub mod stats;
pub mod types;

// Re-exports
pub use error::{Result, ScreenError};
pub use provider::{FundamentalsProvider, NameLookup, NoNames, PriceHistoryProvider};
pub use types::{
    Date, HistoryWindow, ISSUER_PREFIX_LEN, PriceHistory, Ticker, Universe, columns,
    issuer_prefix,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
