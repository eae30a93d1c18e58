//! Composite index construction for the deepvalue screener.
//!
//! Each factor contributes a vector of z-scores over the candidate set. A
//! [`Combiner`] folds them into one composite index per candidate. Two
//! conventions are available and one is chosen per run through
//! [`CompositeMethod`]:
//!
//! - [`SumCombiner`]: sum of the factor z-scores
//! - [`EqualWeightCombiner`]: arithmetic mean of the factor z-scores
//!
//! # Examples
//!
//! ```rust
//! use deepvalue_combine::{CompositeMethod, FactorScore};
//! use ndarray::Array1;
//!
//! let scores = vec![
//!     FactorScore::new("earnings_yield", Array1::from_vec(vec![0.5, -0.5])),
//!     FactorScore::new("book_to_market", Array1::from_vec(vec![1.0, -1.0])),
//! ];
//!
//! let composite = CompositeMethod::Sum.combine(&scores).unwrap();
//! assert_eq!(composite.to_vec(), vec![1.5, -1.5]);
//! ```

mod combiner;
mod equal_weight;
mod method;
mod sum;

// Re-export main types
pub use combiner::{Combiner, FactorScore};
pub use equal_weight::EqualWeightCombiner;
pub use method::CompositeMethod;
pub use sum::SumCombiner;
