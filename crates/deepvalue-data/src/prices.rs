//! Daily closes stored as one CSV file per ticker.
//!
//! The directory holds `<TICKER>.csv` files with at least a `date`
//! (`YYYY-MM-DD`) and a `close` column. Rows may come in any order; they are
//! sorted by date and restricted to the requested window. Empty or
//! unparsable closes are kept as gaps.

use deepvalue_traits::{Date, HistoryWindow, PriceHistory, PriceHistoryProvider, Ticker};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{
    DataError, Result,
    table::{read_text_table, text_values},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Price histories read from a directory of per-ticker CSV files.
#[derive(Debug, Clone)]
pub struct CsvPriceDirectory {
    dir: PathBuf,
}

impl CsvPriceDirectory {
    /// Creates a provider reading from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The price directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, ticker: &str) -> Option<PathBuf> {
        if ticker.is_empty() || ticker.contains(['/', '\\', '.']) {
            return None;
        }
        Some(self.dir.join(format!("{ticker}.csv")))
    }

    /// Reads the closes of one ticker inside `window`, oldest first.
    ///
    /// Returns `Ok(None)` when the directory has no file for the ticker.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, or lacks a
    /// `date` or `close` column.
    pub fn read_closes(
        &self,
        ticker: &str,
        window: HistoryWindow,
    ) -> Result<Option<Vec<Option<f64>>>> {
        let Some(path) = self.file_for(ticker) else {
            return Ok(None);
        };
        if !path.is_file() {
            return Ok(None);
        }

        let frame = read_text_table(&path, b',')?;
        let dates = text_values(&frame, "date", &path)?;
        let closes = text_values(&frame, "close", &path)?;

        let mut rows: Vec<(Date, Option<f64>)> = dates
            .into_iter()
            .zip(closes)
            .filter_map(|(date, close)| {
                let date = Date::parse_from_str(date.as_deref()?, DATE_FORMAT).ok()?;
                let close = close
                    .and_then(|c| c.parse::<f64>().ok())
                    .filter(|c| c.is_finite() && *c > 0.0);
                Some((date, close))
            })
            .filter(|(date, _)| window.contains(*date))
            .collect();
        rows.sort_by_key(|(date, _)| *date);

        Ok(Some(rows.into_iter().map(|(_, close)| close).collect()))
    }
}

impl PriceHistoryProvider for CsvPriceDirectory {
    fn name(&self) -> &str {
        "csv-dir"
    }

    async fn fetch_closes(
        &self,
        tickers: &[Ticker],
        window: HistoryWindow,
    ) -> deepvalue_traits::Result<PriceHistory> {
        if !self.dir.is_dir() {
            return Err(DataError::NotFound(self.dir.clone()).into());
        }

        let mut history = PriceHistory::new();
        for ticker in tickers {
            match self.read_closes(ticker, window) {
                Ok(Some(closes)) => history.insert(ticker.clone(), closes),
                Ok(None) => debug!(ticker = %ticker, "no price file"),
                Err(e) => warn!(ticker = %ticker, error = %e, "skipping unreadable price file"),
            }
        }
        Ok(history)
    }
}
