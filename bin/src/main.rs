//! deepvalue CLI binary.
//!
//! Screens a fundamentals snapshot for cheap, liquid, profitable and not
//! excessively volatile equities.

mod cmd;
mod settings;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::{path::PathBuf, process};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use settings::Preset;

#[derive(Parser)]
#[command(name = "deepvalue")]
#[command(about = "Deep value equity screener", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen a fundamentals snapshot and print the ranking
    Screen(cmd::screen::ScreenArgs),

    /// Show the columns of a raw fundamentals table
    Inspect {
        /// Fundamentals table (CSV)
        path: PathBuf,

        /// Field separator
        #[arg(short, long, default_value = ";")]
        separator: char,

        /// Also write the table, as read, to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the valuation factors
    Factors,

    /// Print the resolved run configuration as TOML
    Config {
        /// Preset to start from
        #[arg(long, value_enum, default_value_t = Preset::Zscore)]
        preset: Preset,

        /// Configuration file laid over the preset
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Screen(args) => cmd::screen::run(args).await?,
        Commands::Inspect {
            path,
            separator,
            output,
        } => {
            cmd::inspect::run(&path, settings::separator(separator)?, output.as_deref())?;
        }
        Commands::Factors => cmd::factors::run(),
        Commands::Config { preset, config } => cmd::config::run(preset, config.as_deref())?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
