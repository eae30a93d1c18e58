//! Fundamentals normalization.
//!
//! Providers name their fields differently and often ship numbers as
//! locale-formatted strings (`"1.234.567,89"`, `"12,5%"`). The
//! [`Normalizer`] folds a raw snapshot into the canonical schema:
//!
//! - column names are trimmed, lower-cased and resolved through an
//!   [`AliasTable`]
//! - every canonical numeric field is present, as a finite `f64`
//! - absent fields and unparsable values become `0.0`
//! - liquidity is never negative
//!
//! No row is dropped here. The only failure is a snapshot with rows but no
//! ticker column, since such records cannot be keyed.

use deepvalue_traits::{Result, ScreenError, Universe, columns, issuer_prefix};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// A field of the canonical fundamentals schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    /// Ticker symbol
    Ticker,
    /// Last price
    Price,
    /// Mean traded value
    Liquidity,
    /// Book value of equity
    BookValue,
    /// Price-to-book
    PriceToBook,
    /// EV/EBIT
    EvToEbit,
    /// Price-to-earnings
    PriceToEarnings,
    /// Price-to-EBIT
    PriceToEbit,
}

impl CanonicalField {
    /// Numeric fields, in output column order.
    pub const NUMERIC: [Self; 7] = [
        Self::Price,
        Self::Liquidity,
        Self::BookValue,
        Self::PriceToBook,
        Self::EvToEbit,
        Self::PriceToEarnings,
        Self::PriceToEbit,
    ];

    /// Canonical column name.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Ticker => columns::TICKER,
            Self::Price => columns::PRICE,
            Self::Liquidity => columns::LIQUIDITY,
            Self::BookValue => columns::BOOK_VALUE,
            Self::PriceToBook => columns::PRICE_TO_BOOK,
            Self::EvToEbit => columns::EV_TO_EBIT,
            Self::PriceToEarnings => columns::PRICE_TO_EARNINGS,
            Self::PriceToEbit => columns::PRICE_TO_EBIT,
        }
    }
}

/// Mapping from provider field names to canonical fields.
///
/// Keys are matched after trimming and lower-casing. The default table
/// covers Fundamentus field names (`papel`, `cotacao`, `liq2m`, ...), the
/// site's display headers (`Cotação`, `P/L`, `P/VP`, `EV/EBIT`, ...) and the
/// canonical English names themselves.
#[derive(Debug, Clone)]
pub struct AliasTable {
    aliases: HashMap<String, CanonicalField>,
}

impl Default for AliasTable {
    fn default() -> Self {
        use CanonicalField::*;

        let entries = [
            ("papel", Ticker),
            ("ticker", Ticker),
            ("symbol", Ticker),
            ("cotacao", Price),
            ("cotação", Price),
            ("price", Price),
            ("liq2m", Liquidity),
            ("liquidez", Liquidity),
            ("liquidity", Liquidity),
            ("liq.2meses", Liquidity),
            ("patrliq", BookValue),
            ("patrim_liq", BookValue),
            ("book_value", BookValue),
            ("patrim. líq", BookValue),
            ("pvp", PriceToBook),
            ("p_vp", PriceToBook),
            ("p/vp", PriceToBook),
            ("price_to_book", PriceToBook),
            ("evebit", EvToEbit),
            ("ev_ebit", EvToEbit),
            ("ev/ebit", EvToEbit),
            ("ev_to_ebit", EvToEbit),
            ("pl", PriceToEarnings),
            ("p_l", PriceToEarnings),
            ("p/l", PriceToEarnings),
            ("price_to_earnings", PriceToEarnings),
            ("pebit", PriceToEbit),
            ("p_ebit", PriceToEbit),
            ("p/ebit", PriceToEbit),
            ("price_to_ebit", PriceToEbit),
        ];
        Self {
            aliases: entries
                .into_iter()
                .map(|(name, field)| (name.to_string(), field))
                .collect(),
        }
    }
}

impl AliasTable {
    /// An empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    /// Adds (or redirects) an alias.
    #[must_use]
    pub fn with_alias(mut self, name: &str, field: CanonicalField) -> Self {
        self.aliases.insert(fold_name(name), field);
        self
    }

    /// Resolves a provider field name.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<CanonicalField> {
        self.aliases.get(&fold_name(name)).copied()
    }
}

fn fold_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Parses a possibly locale-formatted number.
///
/// Returns `None` for anything that does not parse to a finite value.
/// A trailing `%` divides by 100. When both `.` and `,` appear, the one
/// that comes last is the decimal separator; a separator that repeats is a
/// thousands separator; a single one is decimal. A lone `.` is therefore
/// never read as a thousands separator: `"1.500"` parses as 1.5, not 1500.
///
/// ```
/// use deepvalue_screen::normalize::parse_number;
///
/// assert_eq!(parse_number("1.234.567,89"), Some(1_234_567.89));
/// assert_eq!(parse_number("1,234,567.89"), Some(1_234_567.89));
/// assert_eq!(parse_number("12,5%"), Some(0.125));
/// assert_eq!(parse_number("-"), None);
/// ```
pub fn parse_number(raw: &str) -> Option<f64> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let mut text = compact
        .strip_prefix("R$")
        .or_else(|| compact.strip_prefix('$'))
        .unwrap_or(&compact)
        .to_string();

    let percent = text.ends_with('%');
    if percent {
        text.pop();
    }

    let last_dot = text.rfind('.');
    let last_comma = text.rfind(',');
    let text = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) if comma > dot => text.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => text.replace(',', ""),
        (None, Some(_)) if text.matches(',').count() > 1 => text.replace(',', ""),
        (None, Some(_)) => text.replace(',', "."),
        (Some(_), None) if text.matches('.').count() > 1 => text.replace('.', ""),
        _ => text,
    };

    let value = text.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(if percent { value / 100.0 } else { value })
}

/// Folds raw snapshots into the canonical schema.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    aliases: AliasTable,
}

impl Normalizer {
    /// Creates a normalizer with the given alias table.
    #[must_use]
    pub const fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    /// The alias table in use.
    #[must_use]
    pub const fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Normalizes a raw snapshot.
    ///
    /// The output has the columns `ticker`, `issuer` and every canonical
    /// numeric field, one row per input row in input order. When two raw
    /// columns map to the same field, the first one wins.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::MissingColumn`] if the snapshot has rows but no
    /// column resolving to the ticker.
    pub fn normalize(&self, raw: &DataFrame) -> Result<Universe> {
        let height = raw.height();

        let mut sources: HashMap<CanonicalField, &Column> = HashMap::new();
        for column in raw.get_columns() {
            match self.aliases.resolve(column.name()) {
                Some(field) if sources.contains_key(&field) => {
                    debug!(column = %column.name(), field = field.column(), "duplicate alias ignored");
                }
                Some(field) => {
                    sources.insert(field, column);
                }
                None => debug!(column = %column.name(), "unrecognized column dropped"),
            }
        }

        let tickers = match sources.get(&CanonicalField::Ticker) {
            Some(column) => ticker_values(column)?,
            None if height == 0 => Vec::new(),
            None => return Err(ScreenError::MissingColumn(columns::TICKER.to_string())),
        };
        let issuers: Vec<String> = tickers
            .iter()
            .map(|t| issuer_prefix(t).to_string())
            .collect();

        let mut output: Vec<Column> = Vec::with_capacity(CanonicalField::NUMERIC.len() + 2);
        output.push(Series::new(columns::TICKER.into(), tickers).into());
        output.push(Series::new(columns::ISSUER.into(), issuers).into());

        for field in CanonicalField::NUMERIC {
            let mut values = match sources.get(&field) {
                Some(column) => numeric_values(column),
                None => {
                    debug!(field = field.column(), "field absent, filled with zeros");
                    vec![0.0; height]
                }
            };
            if field == CanonicalField::Liquidity {
                for v in &mut values {
                    *v = v.max(0.0);
                }
            }
            output.push(Series::new(field.column().into(), values).into());
        }

        Ok(Universe::new(DataFrame::new(output)?))
    }
}

fn ticker_values(column: &Column) -> Result<Vec<String>> {
    let series = column.as_materialized_series().cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|t| t.map(str::trim).unwrap_or_default().to_string())
        .collect())
}

fn numeric_values(column: &Column) -> Vec<f64> {
    let series = column.as_materialized_series();
    let finite_or_zero = |v: Option<f64>| v.filter(|x| x.is_finite()).unwrap_or(0.0);

    if let Ok(strings) = series.str() {
        return strings
            .into_iter()
            .map(|s| finite_or_zero(s.and_then(parse_number)))
            .collect();
    }

    match series.cast(&DataType::Float64) {
        Ok(cast) => match cast.f64() {
            Ok(values) => values.into_iter().map(finite_or_zero).collect(),
            Err(_) => vec![0.0; series.len()],
        },
        Err(_) => vec![0.0; series.len()],
    }
}
