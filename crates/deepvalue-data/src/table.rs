//! CSV table reading shared by the providers.

use polars::prelude::*;
use std::path::Path;

use crate::{DataError, Result};

/// Reads a CSV file with a header row, every column as strings.
///
/// Keeping the raw text lets the screener apply its own number parsing,
/// which understands locale formats the CSV reader does not.
pub(crate) fn read_text_table(path: &Path, separator: u8) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(DataError::NotFound(path.to_path_buf()));
    }
    let frame = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_separator(separator)
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()?;
    Ok(frame)
}

/// Finds a column by name, ignoring case and surrounding whitespace.
pub(crate) fn find_column<'a>(frame: &'a DataFrame, name: &str) -> Option<&'a Column> {
    frame
        .get_columns()
        .iter()
        .find(|c| c.name().trim().eq_ignore_ascii_case(name))
}

/// String values of a column, with nulls as `None`.
pub(crate) fn text_values(
    frame: &DataFrame,
    name: &str,
    path: &Path,
) -> Result<Vec<Option<String>>> {
    let column = find_column(frame, name).ok_or_else(|| DataError::MissingColumn {
        column: name.to_string(),
        path: path.to_path_buf(),
    })?;
    let series = column.as_materialized_series().cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.trim().to_string()))
        .collect())
}
