//! Error types for the deepvalue screener.
//!
//! Data-quality problems and collaborator failures are recovered locally by
//! the pipeline stages, so most of these variants only surface from the
//! collaborators themselves or from configuration validation.

use thiserror::Error;

/// The main error type for screening operations.
#[derive(Debug, Error)]
pub enum ScreenError {
    /// The screen configuration is invalid. Always fatal, raised before any fetch.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error when a required column is missing from the data.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Error raised by an external collaborator (fundamentals, prices, names).
    #[error("Provider error: {0}")]
    Provider(String),
}

/// A specialized Result type for screening operations.
pub type Result<T> = std::result::Result<T, ScreenError>;
