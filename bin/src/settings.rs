//! Run configuration from presets, TOML files and command-line flags.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::ValueEnum;
use deepvalue_combine::CompositeMethod;
use deepvalue_screen::ScreenConfig;
use std::{fs, path::Path};

/// Named starting points for a run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Preset {
    /// Summed z-scores, dynamic winsorization, top 100
    Zscore,
    /// Averaged z-scores, fixed bounds, top 60 with names
    Portfolio,
}

impl Preset {
    pub(crate) fn config(self) -> ScreenConfig {
        match self {
            Self::Zscore => ScreenConfig::zscore_ranking(),
            Self::Portfolio => ScreenConfig::portfolio_ranking(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Composite {
    Sum,
    Mean,
}

impl From<Composite> for CompositeMethod {
    fn from(value: Composite) -> Self {
        match value {
            Composite::Sum => Self::Sum,
            Composite::Mean => Self::Mean,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Loads the preset, with the settings of `path` laid over it.
///
/// Tables in the file merge key by key into the preset, except tables with a
/// `mode` tag, which replace the preset's table whole.
pub(crate) fn load(preset: Preset, path: Option<&Path>) -> Result<ScreenConfig> {
    let Some(path) = path else {
        return Ok(preset.config());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    overlay(preset, &text).with_context(|| format!("loading {}", path.display()))
}

fn overlay(preset: Preset, text: &str) -> Result<ScreenConfig> {
    let file: toml::Table = toml::from_str(text)?;
    let toml::Value::Table(mut base) = toml::Value::try_from(preset.config())? else {
        bail!("preset did not serialize to a table");
    };
    merge(&mut base, file);
    Ok(toml::Value::Table(base).try_into()?)
}

fn merge(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(inner)), toml::Value::Table(table))
                if !table.contains_key("mode") =>
            {
                merge(inner, table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Field separator as a single byte.
pub(crate) fn separator(c: char) -> Result<u8> {
    if !c.is_ascii() {
        bail!("separator must be a single ASCII character, got {c:?}");
    }
    Ok(c as u8)
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date {s:?}, expected YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepvalue_factors::WinsorMode;

    #[test]
    fn test_overlay_keeps_preset_values() {
        let config = overlay(
            Preset::Portfolio,
            r#"
            top_n = 30

            [volatility]
            batch_size = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.top_n, 30);
        assert_eq!(config.volatility.batch_size, 50);
        assert_eq!(config.volatility.min_returns, 100);
        assert_eq!(config.min_liquidity, 6_000_000.0);
        assert_eq!(config.composite, CompositeMethod::Mean);
        assert_eq!(config.volatility_cut, Some(0.08));
        assert!(config.lookup_names);
    }

    #[test]
    fn test_tagged_table_replaces_preset() {
        let config = overlay(
            Preset::Portfolio,
            r#"
            [winsorization]
            mode = "quantile"
            lower = 0.05
            upper = 0.95
            "#,
        )
        .unwrap();
        assert_eq!(
            config.winsorization,
            WinsorMode::Quantile {
                lower: 0.05,
                upper: 0.95
            }
        );
    }

    #[test]
    fn test_zero_cut_disables() {
        let config = overlay(Preset::Zscore, "volatility_cut = 0.0").unwrap();
        assert_eq!(config.volatility_cut, None);
    }

    #[test]
    fn test_unknown_keys_fail() {
        assert!(overlay(Preset::Zscore, "top = 10").is_err());
        assert!(overlay(Preset::Zscore, "[winsorization]\nmode = \"median\"").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screen.toml");
        fs::write(&path, "min_liquidity = 1000000.0\n").unwrap();

        let config = load(Preset::Zscore, Some(&path)).unwrap();
        assert_eq!(config.min_liquidity, 1_000_000.0);
        assert!(load(Preset::Zscore, Some(&dir.path().join("missing.toml"))).is_err());
        assert_eq!(load(Preset::Zscore, None).unwrap(), ScreenConfig::zscore_ranking());
    }

    #[test]
    fn test_separator_and_date() {
        assert_eq!(separator(';').unwrap(), b';');
        assert!(separator('§').is_err());
        assert_eq!(
            parse_date("2024-06-28").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
        );
        assert!(parse_date("28/06/2024").is_err());
    }
}
