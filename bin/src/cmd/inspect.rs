//! Raw table inspection command implementation.

use anyhow::{Context, Result};
use deepvalue_data::CsvFundamentals;
use deepvalue_screen::AliasTable;
use polars::prelude::*;
use std::{fs::File, path::Path};
use tracing::info;

/// Print the columns of a raw fundamentals table, the canonical field each
/// one maps to and its first value.
///
/// With `output`, the table is also written back out as read, before any
/// normalization.
pub(crate) fn run(path: &Path, separator: u8, output: Option<&Path>) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Raw Table Inspection                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let mut frame = CsvFundamentals::new(path)
        .with_separator(separator)
        .read()
        .with_context(|| format!("reading {}", path.display()))?;

    println!("File:     {}", path.display());
    println!("Rows:     {}", frame.height());
    println!("Columns:  {}", frame.width());
    println!();

    let aliases = AliasTable::default();
    let rows = describe(&frame, &aliases)?;
    let unmapped = rows.iter().filter(|row| row.canonical.is_none()).count();

    println!(
        "{:<24} {:<8} {:<18} {}",
        "Column", "Type", "Canonical", "First value"
    );
    println!("{}", "━".repeat(72));
    for row in &rows {
        println!(
            "{:<24} {:<8} {:<18} {}",
            row.name,
            row.dtype,
            row.canonical.unwrap_or("-"),
            row.first.as_deref().unwrap_or("")
        );
    }
    println!();
    if unmapped > 0 {
        println!("{unmapped} column(s) have no canonical field and are ignored by the screen.\n");
    }

    if let Some(output) = output {
        write_raw(&mut frame, output)?;
        info!(path = %output.display(), rows = frame.height(), "raw table written");
    }

    Ok(())
}

fn write_raw(frame: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(frame)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

struct ColumnSummary {
    name: String,
    dtype: String,
    canonical: Option<&'static str>,
    first: Option<String>,
}

fn describe(frame: &DataFrame, aliases: &AliasTable) -> Result<Vec<ColumnSummary>> {
    frame
        .get_columns()
        .iter()
        .map(|column| {
            let first = if column.is_empty() {
                None
            } else {
                let value = column.get(0)?;
                match value {
                    AnyValue::Null => None,
                    AnyValue::String(s) => Some(s.trim().to_string()),
                    other => Some(other.to_string()),
                }
            };
            Ok(ColumnSummary {
                name: column.name().to_string(),
                dtype: column.dtype().to_string(),
                canonical: aliases.resolve(column.name()).map(|field| field.column()),
                first,
            })
        })
        .collect()
}
