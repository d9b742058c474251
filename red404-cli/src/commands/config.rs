use std::fs;

use anyhow::{Context, Result};
use clap::ValueEnum;
use shared::config::Config;

/// Output formats for `red404 config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Toml => "toml",
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }
}

/// Generates a configuration file in the specified format.
///
/// # Arguments
/// * `format` - The format of the configuration file.
///
/// # Errors
/// Returns an error if serializing or writing the file fails.
pub fn generate_config(format: ConfigFormat) -> Result<()> {
    let config = Config::with_defaults();
    let file_name = format!("config.{}", format.extension());
    let serialized = config
        .render(format.extension())
        .context("failed to render configuration")?;

    fs::write(&file_name, serialized).with_context(|| format!("failed to write {file_name}"))?;

    println!("Configuration file '{file_name}' generated successfully.");
    Ok(())
}
