//! Common types used throughout the screener.
//!
//! The candidate set is a Polars DataFrame wrapped by [`Universe`]. Every
//! stage of a screening run receives the current universe, adds columns or
//! removes rows, and hands it to the next stage. Rows are never added.

use crate::{Result, ScreenError};
use chrono::Duration;
use polars::prelude::*;
use std::collections::HashMap;

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A ticker symbol such as `"PETR4"`.
pub type Ticker = String;

/// Number of leading characters of a ticker that identify its issuer.
pub const ISSUER_PREFIX_LEN: usize = 4;

/// Canonical column names of the candidate set.
pub mod columns {
    /// Ticker symbol (display identity).
    pub const TICKER: &str = "ticker";
    /// Issuer prefix of the ticker.
    pub const ISSUER: &str = "issuer";
    /// Last traded price.
    pub const PRICE: &str = "price";
    /// Mean traded value over the provider's trading window.
    pub const LIQUIDITY: &str = "liquidity";
    /// Book value of equity.
    pub const BOOK_VALUE: &str = "book_value";
    /// Price-to-book multiple.
    pub const PRICE_TO_BOOK: &str = "price_to_book";
    /// Enterprise-value-to-EBIT multiple.
    pub const EV_TO_EBIT: &str = "ev_to_ebit";
    /// Price-to-earnings multiple.
    pub const PRICE_TO_EARNINGS: &str = "price_to_earnings";
    /// Price-to-EBIT multiple.
    pub const PRICE_TO_EBIT: &str = "price_to_ebit";

    /// Annualized realized volatility (or the sentinel).
    pub const VOLATILITY: &str = "volatility";

    /// Market capitalization (book value times price-to-book).
    pub const MARKET_CAP: &str = "market_cap";
    /// Earnings yield.
    pub const EARNINGS_YIELD: &str = "earnings_yield";
    /// Book-to-market.
    pub const BOOK_TO_MARKET: &str = "book_to_market";
    /// Cash-flow yield. Always null: no reliable source exists.
    pub const CASH_FLOW_YIELD: &str = "cash_flow_yield";
    /// Winsorized earnings yield.
    pub const EARNINGS_YIELD_W: &str = "earnings_yield_w";
    /// Winsorized book-to-market.
    pub const BOOK_TO_MARKET_W: &str = "book_to_market_w";
    /// z-score of the winsorized earnings yield.
    pub const Z_EARNINGS_YIELD: &str = "z_earnings_yield";
    /// z-score of the winsorized book-to-market.
    pub const Z_BOOK_TO_MARKET: &str = "z_book_to_market";
    /// Composite ranking index.
    pub const COMPOSITE: &str = "composite";
}

/// Returns the issuer prefix of a ticker: its first four characters.
///
/// Tickers shorter than the prefix length are their own prefix.
///
/// ```
/// use deepvalue_traits::issuer_prefix;
///
/// assert_eq!(issuer_prefix("PETR4"), "PETR");
/// assert_eq!(issuer_prefix("B3"), "B3");
/// ```
pub fn issuer_prefix(ticker: &str) -> &str {
    ticker
        .char_indices()
        .nth(ISSUER_PREFIX_LEN)
        .map_or(ticker, |(idx, _)| &ticker[..idx])
}

/// The candidate set of a screening run.
///
/// Wraps a DataFrame keyed by the [`columns::TICKER`] column. Accessors
/// return plain vectors so that stage logic stays ordinary Rust.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    data: DataFrame,
}

impl Universe {
    /// Creates a universe from a DataFrame.
    pub const fn new(data: DataFrame) -> Self {
        Self { data }
    }

    /// Returns a reference to the underlying DataFrame.
    pub const fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Consumes self and returns the underlying DataFrame.
    pub fn into_inner(self) -> DataFrame {
        self.data
    }

    /// Returns the number of candidates.
    pub fn len(&self) -> usize {
        self.data.height()
    }

    /// Returns whether there are no candidates left.
    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }

    /// Returns the column names.
    pub fn columns(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Checks if a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.data
            .get_column_names()
            .iter()
            .any(|s| s.as_str() == name)
    }

    /// Returns the ticker column as owned strings.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticker column is missing or not a string column.
    pub fn tickers(&self) -> Result<Vec<Ticker>> {
        let column = self
            .data
            .column(columns::TICKER)
            .map_err(|_| ScreenError::MissingColumn(columns::TICKER.to_string()))?;
        Ok(column
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|s: Option<&str>| s.unwrap_or_default().to_string())
            .collect())
    }

    /// Returns a float column, with nulls as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is missing or not a Float64 column.
    pub fn optional_f64_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let column = self
            .data
            .column(name)
            .map_err(|_| ScreenError::MissingColumn(name.to_string()))?;
        Ok(column.as_materialized_series().f64()?.into_iter().collect())
    }

    /// Returns a float column, with nulls as NaN.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is missing or not a Float64 column.
    pub fn f64_values(&self, name: &str) -> Result<Vec<f64>> {
        Ok(self
            .optional_f64_values(name)?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect())
    }

    /// Adds or replaces a float column.
    ///
    /// # Errors
    ///
    /// Returns an error if `values` does not have one entry per row.
    pub fn set_f64_column(&mut self, name: &str, values: Vec<f64>) -> Result<()> {
        self.check_height(name, values.len())?;
        self.data.with_column(Series::new(name.into(), values))?;
        Ok(())
    }

    /// Adds or replaces a float column that may contain nulls.
    ///
    /// # Errors
    ///
    /// Returns an error if `values` does not have one entry per row.
    pub fn set_optional_f64_column(&mut self, name: &str, values: Vec<Option<f64>>) -> Result<()> {
        self.check_height(name, values.len())?;
        self.data.with_column(Series::new(name.into(), values))?;
        Ok(())
    }

    /// Keeps the rows whose mask entry is `true`, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns an error if the mask length differs from the row count.
    pub fn retain(&self, mask: &[bool]) -> Result<Self> {
        self.check_height("mask", mask.len())?;
        let mask: BooleanChunked = mask.iter().copied().collect();
        Ok(Self::new(self.data.filter(&mask)?))
    }

    fn check_height(&self, what: &str, len: usize) -> Result<()> {
        if len == self.len() {
            Ok(())
        } else {
            Err(ScreenError::InvalidData(format!(
                "{what} has {len} entries, universe has {} rows",
                self.len()
            )))
        }
    }
}

impl From<DataFrame> for Universe {
    fn from(data: DataFrame) -> Self {
        Self::new(data)
    }
}

impl AsRef<DataFrame> for Universe {
    fn as_ref(&self) -> &DataFrame {
        &self.data
    }
}

/// The trailing window of daily prices requested from a price provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    /// Last date of the window (inclusive).
    pub end: Date,
    /// Calendar days covered by the window.
    pub lookback_days: u32,
}

impl HistoryWindow {
    /// Creates a window ending at `end` and covering `lookback_days` calendar days.
    pub const fn new(end: Date, lookback_days: u32) -> Self {
        Self { end, lookback_days }
    }

    /// First date of the window (inclusive).
    pub fn start(&self) -> Date {
        self.end - Duration::days(i64::from(self.lookback_days))
    }

    /// Whether `date` falls inside the window.
    pub fn contains(&self, date: Date) -> bool {
        date >= self.start() && date <= self.end
    }
}

/// Daily closing prices per ticker, oldest first.
///
/// A `None` close marks a day the ticker did not trade or the provider had
/// no value. Tickers the provider does not know are simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceHistory {
    closes: HashMap<Ticker, Vec<Option<f64>>>,
}

impl PriceHistory {
    /// Creates an empty price history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) the closes of one ticker.
    pub fn insert(&mut self, ticker: impl Into<Ticker>, closes: Vec<Option<f64>>) {
        self.closes.insert(ticker.into(), closes);
    }

    /// Returns the closes of a ticker, if the provider returned any.
    pub fn closes(&self, ticker: &str) -> Option<&[Option<f64>]> {
        self.closes.get(ticker).map(Vec::as_slice)
    }

    /// Moves every series of `other` into this history.
    pub fn merge(&mut self, other: Self) {
        self.closes.extend(other.closes);
    }

    /// Number of tickers with a series.
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    /// Whether no series are present.
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }
}

impl FromIterator<(Ticker, Vec<Option<f64>>)> for PriceHistory {
    fn from_iter<I: IntoIterator<Item = (Ticker, Vec<Option<f64>>)>>(iter: I) -> Self {
        Self {
            closes: iter.into_iter().collect(),
        }
    }
}
