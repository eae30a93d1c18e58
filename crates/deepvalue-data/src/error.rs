//! Error types for the file-backed providers.

use deepvalue_traits::ScreenError;
use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading provider files.
#[derive(Debug, Error)]
pub enum DataError {
    /// File or directory does not exist.
    #[error("Not found: {0}")]
    NotFound(PathBuf),

    /// CSV parsing failed.
    #[error("Failed to parse table: {0}")]
    Polars(#[from] PolarsError),

    /// A required column is absent.
    #[error("Column '{column}' not found in {path}")]
    MissingColumn {
        /// Expected column name
        column: String,
        /// File being read
        path: PathBuf,
    },
}

impl From<DataError> for ScreenError {
    fn from(err: DataError) -> Self {
        Self::Provider(err.to_string())
    }
}
