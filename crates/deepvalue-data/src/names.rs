//! Issuer names stored as a CSV file.

use deepvalue_traits::Ticker;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::{
    Result,
    table::{read_text_table, text_values},
};

/// Loads a `ticker,name` table into a name lookup.
///
/// Rows with an empty ticker or name are skipped. The returned map
/// implements [`NameLookup`](deepvalue_traits::NameLookup).
///
/// # Errors
///
/// Returns an error if the file is missing, is not valid CSV, or lacks a
/// `ticker` or `name` column.
pub fn load_names(path: &Path, separator: u8) -> Result<HashMap<Ticker, String>> {
    let frame = read_text_table(path, separator)?;
    let tickers = text_values(&frame, "ticker", path)?;
    let names = text_values(&frame, "name", path)?;

    let lookup: HashMap<Ticker, String> = tickers
        .into_iter()
        .zip(names)
        .filter_map(|(ticker, name)| match (ticker, name) {
            (Some(t), Some(n)) if !t.is_empty() && !n.is_empty() => Some((t, n)),
            _ => None,
        })
        .collect();
    info!(path = %path.display(), names = lookup.len(), "loaded issuer names");
    Ok(lookup)
}
