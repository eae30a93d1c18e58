//! Fundamentals snapshot stored as a CSV file.

use deepvalue_traits::FundamentalsProvider;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::{Result, table::read_text_table};

/// A fundamentals snapshot read from one CSV file.
///
/// Columns are kept as text with their original names, so a Fundamentus
/// export (`;`-separated, decimal commas) can be screened as is.
#[derive(Debug, Clone)]
pub struct CsvFundamentals {
    path: PathBuf,
    separator: u8,
}

impl CsvFundamentals {
    /// Creates a provider reading `path` with a `,` separator.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            separator: b',',
        }
    }

    /// Sets the field separator.
    #[must_use]
    pub const fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    /// The snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the raw snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or is not valid CSV.
    pub fn read(&self) -> Result<DataFrame> {
        let frame = read_text_table(&self.path, self.separator)?;
        info!(
            path = %self.path.display(),
            rows = frame.height(),
            columns = frame.width(),
            "loaded fundamentals snapshot"
        );
        Ok(frame)
    }
}

impl FundamentalsProvider for CsvFundamentals {
    fn name(&self) -> &str {
        "csv"
    }

    async fn fetch_fundamentals(&self) -> deepvalue_traits::Result<DataFrame> {
        Ok(self.read()?)
    }
}
