//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use healthdash_core::config::{parse_delimiter, parse_encoding, CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Configuration file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "healthdash.toml";

/// Load layered configuration: defaults, file, environment, then CLI flags
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_file(cli.config.as_deref()) {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(cli_overrides(cli)?);
    Ok(config)
}

/// Explicit file, or the default file when it exists
fn config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        }
    }
}

fn cli_overrides(cli: &Cli) -> Result<CliConfigOverrides> {
    let delimiter = cli
        .delimiter
        .as_deref()
        .map(parse_delimiter)
        .transpose()
        .context("Invalid --delimiter")?;

    let encoding = cli
        .encoding
        .as_deref()
        .map(parse_encoding)
        .transpose()
        .context("Invalid --encoding")?;

    Ok(CliConfigOverrides {
        source_path: cli.source.clone(),
        delimiter,
        encoding,
        seed: cli.seed,
        cache_path: cli.cache.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use healthdash_core::config::ConfigSource;
    use healthdash_core::formats::SourceEncoding;

    #[test]
    fn test_cli_flags_become_overrides() {
        let cli = Cli::parse_from([
            "healthdash",
            "--source",
            "who.tsv",
            "--delimiter",
            "tab",
            "--encoding",
            "latin1",
            "--seed",
            "9",
            "options",
        ]);

        let overrides = cli_overrides(&cli).unwrap();
        assert_eq!(overrides.source_path, Some(PathBuf::from("who.tsv")));
        assert_eq!(overrides.delimiter, Some(b'\t'));
        assert_eq!(overrides.encoding, Some(SourceEncoding::Latin1));
        assert_eq!(overrides.seed, Some(9));

        let mut config = LayeredConfig::with_defaults();
        config.update_from_cli(overrides);
        assert_eq!(config.source_path.source, ConfigSource::Cli);
    }

    #[test]
    fn test_invalid_delimiter_is_rejected() {
        let cli = Cli::parse_from(["healthdash", "--delimiter", ";;", "config"]);
        assert!(cli_overrides(&cli).is_err());
    }

    #[test]
    fn test_explicit_config_file_wins() {
        assert_eq!(
            config_file(Some(Path::new("custom.toml"))),
            Some(PathBuf::from("custom.toml"))
        );
    }
}
