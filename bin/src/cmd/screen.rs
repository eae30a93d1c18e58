//! Screening command implementation.

use anyhow::{Context, Result, ensure};
use chrono::Utc;
use clap::Args;
use deepvalue_data::{CsvFundamentals, CsvPriceDirectory, load_names};
use deepvalue_factors::WinsorMode;
use deepvalue_screen::{Ranking, ScreenConfig, ScreenPipeline, ScreenReport};
use polars::prelude::{CsvWriter, SerWriter};
use std::{
    collections::HashMap,
    fs::File,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::settings::{self, Composite, OutputFormat, Preset};

#[derive(Debug, Args)]
pub(crate) struct ScreenArgs {
    /// Fundamentals snapshot (CSV, one row per ticker)
    #[arg(short, long)]
    fundamentals: PathBuf,

    /// Directory of daily closes, one <TICKER>.csv per ticker
    #[arg(short, long)]
    prices: PathBuf,

    /// Ticker to issuer name table (CSV)
    #[arg(short, long)]
    names: Option<PathBuf>,

    /// Field separator of the fundamentals and names tables
    #[arg(short, long, default_value = ";")]
    separator: char,

    /// Preset to start from
    #[arg(long, value_enum, default_value_t = Preset::Zscore)]
    preset: Preset,

    /// Configuration file (TOML) laid over the preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum liquidity (exclusive)
    #[arg(long)]
    min_liquidity: Option<f64>,

    /// Fraction of the most volatile candidates to drop (0 disables)
    #[arg(long)]
    volatility_cut: Option<f64>,

    /// Length of the shortlist
    #[arg(short, long)]
    top: Option<usize>,

    /// How z-scores form the composite index
    #[arg(long, value_enum)]
    composite: Option<Composite>,

    /// Date the price windows end on (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    as_of: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also write the ranking to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ScreenArgs {
    fn screen_config(&self) -> Result<ScreenConfig> {
        let mut config = settings::load(self.preset, self.config.as_deref())?;
        if let Some(min_liquidity) = self.min_liquidity {
            config.min_liquidity = min_liquidity;
        }
        if let Some(cut) = self.volatility_cut {
            config.volatility_cut = (cut != 0.0).then_some(cut);
        }
        if let Some(top) = self.top {
            config.top_n = top;
        }
        if let Some(composite) = self.composite {
            config.composite = composite.into();
        }
        if self.names.is_some() {
            config.lookup_names = true;
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

/// Run the screen and print the report.
pub(crate) async fn run(args: ScreenArgs) -> Result<()> {
    let config = args.screen_config()?;
    let separator = settings::separator(args.separator)?;
    let as_of = match &args.as_of {
        Some(s) => settings::parse_date(s)?,
        None => Utc::now().date_naive(),
    };

    ensure!(
        args.fundamentals.is_file(),
        "fundamentals file not found: {}",
        args.fundamentals.display()
    );
    ensure!(
        args.prices.is_dir(),
        "price directory not found: {}",
        args.prices.display()
    );

    let names = match &args.names {
        Some(path) => load_names(path, separator)
            .with_context(|| format!("loading names from {}", path.display()))?,
        None => HashMap::new(),
    };

    let fundamentals = CsvFundamentals::new(args.fundamentals.clone()).with_separator(separator);
    let prices = CsvPriceDirectory::new(args.prices.clone());
    let pipeline = ScreenPipeline::new(config, fundamentals, prices)?.with_names(names);
    let report = pipeline.run(as_of).await?;

    match args.format {
        OutputFormat::Text => print_report(&report, pipeline.config()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if let Some(path) = &args.output {
        write_csv(&report.ranking, path)?;
        info!(path = %path.display(), rows = report.ranking.len(), "ranking written");
    }

    Ok(())
}

fn print_report(report: &ScreenReport, config: &ScreenConfig) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                     Deep Value Screen                        ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("As of:          {}", report.as_of);
    println!("Min liquidity:  {:.0}", config.min_liquidity);
    match config.volatility_cut {
        Some(cut) => println!("Risk cut:       {:.0}% most volatile", cut * 100.0),
        None => println!("Risk cut:       off"),
    }
    match config.winsorization {
        WinsorMode::Fixed { .. } => println!("Winsorization:  fixed bounds"),
        WinsorMode::Quantile { lower, upper } => {
            println!("Winsorization:  quantiles {lower} / {upper}");
        }
    }
    println!("Composite:      {:?}", config.composite);
    println!();

    println!("Stage survivors");
    println!("{}", "━".repeat(28));
    for count in &report.stages {
        println!("{:<16} {:>11}", count.stage.name(), count.remaining);
    }
    if report.sentinel_count > 0 {
        println!(
            "\n{} candidate(s) without usable price history",
            report.sentinel_count
        );
    }
    println!();

    if report.ranking.is_empty() {
        println!("No candidates survived the screen.\n");
        return;
    }

    println!("Ranking");
    println!("{}", "━".repeat(96));
    println!(
        "{:>4}  {:<8} {:<24} {:>9} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "Rank", "Ticker", "Name", "Index", "EY", "BtM", "z(EY)", "z(BtM)", "Vol"
    );
    println!("{}", "─".repeat(96));
    for entry in &report.ranking {
        let name: String = entry.name.chars().take(24).collect();
        println!(
            "{:>4}  {:<8} {:<24} {:>+9.3} {:>8.4} {:>8.4} {:>+8.3} {:>+8.3} {:>8.3}",
            entry.rank,
            entry.ticker,
            name,
            entry.composite,
            entry.earnings_yield,
            entry.book_to_market,
            entry.z_earnings_yield,
            entry.z_book_to_market,
            entry.volatility,
        );
    }
    println!();
}

fn write_csv(ranking: &Ranking, path: &Path) -> Result<()> {
    let mut frame = ranking.to_frame()?;
    let mut file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: ScreenArgs,
    }

    fn parse(extra: &[&str]) -> ScreenArgs {
        let mut argv = vec!["screen", "-f", "fundamentals.csv", "-p", "prices"];
        argv.extend_from_slice(extra);
        Harness::parse_from(argv).args
    }

    #[test]
    fn test_defaults_to_zscore_preset() {
        let config = parse(&[]).screen_config().unwrap();
        assert_eq!(config, ScreenConfig::zscore_ranking());
    }

    #[test]
    fn test_flags_override_preset() {
        let config = parse(&[
            "--preset",
            "portfolio",
            "--min-liquidity",
            "1000000",
            "--volatility-cut",
            "0",
            "--top",
            "10",
            "--composite",
            "sum",
        ])
        .screen_config()
        .unwrap();

        assert_eq!(config.min_liquidity, 1_000_000.0);
        assert_eq!(config.volatility_cut, None);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.composite, deepvalue_combine::CompositeMethod::Sum);
        assert!(matches!(config.winsorization, WinsorMode::Fixed { .. }));
    }

    #[test]
    fn test_names_enable_lookup() {
        let config = parse(&["--names", "names.csv"]).screen_config().unwrap();
        assert!(config.lookup_names);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        assert!(parse(&["--top", "0"]).screen_config().is_err());
        assert!(parse(&["--volatility-cut", "1.5"]).screen_config().is_err());
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranking.csv");
        write_csv(&Ranking::default(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("rank,ticker,name,composite"));
    }
}
