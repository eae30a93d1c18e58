//! Configuration printing command implementation.

use anyhow::{Context, Result};
use std::path::Path;

use crate::settings::{self, Preset};

/// Print the configuration a screen would run with, as TOML.
pub(crate) fn run(preset: Preset, path: Option<&Path>) -> Result<()> {
    let config = settings::load(preset, path)?;
    config.validate().context("invalid configuration")?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
