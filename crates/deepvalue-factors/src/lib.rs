//! Valuation factors for the deepvalue screener.
//!
//! This crate derives the cheapness factors of each candidate and turns them
//! into a composite index:
//! - Earnings yield: inverse EV/EBIT, falling back to inverse P/E
//! - Book-to-market: inverse price-to-book
//! - Cash-flow yield: registered but unavailable, always carried as null
//!
//! Factors are winsorized with a [`WinsorMode`], standardized to z-scores
//! over the candidate set and summed or averaged by the configured
//! [`CompositeMethod`](deepvalue_combine::CompositeMethod).
//!
//! # Example
//!
//! ```ignore
//! use deepvalue_factors::{FactorEngine, WinsorMode};
//! use deepvalue_combine::CompositeMethod;
//!
//! let engine = FactorEngine::new(WinsorMode::default(), CompositeMethod::Sum);
//! let factor_table = engine.apply(universe)?;
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod engine;
pub mod factor;
pub mod registry;
pub mod value;
pub mod winsorize;

// Re-export key types
pub use engine::FactorEngine;
pub use factor::ValueFactor;
pub use registry::{FactorInfo, FactorKind, available_factors, composite_factors};
pub use winsorize::{Bounds, WinsorMode};
