use crate::error::{HealthError, Result};
use crate::formats::{ColumnMapping, RowFilter, SourceEncoding};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the WHO life-expectancy extract
pub const DEFAULT_SOURCE_PATH: &str = "data/raw/who_life_expectancy.csv";

/// Default seed shared by the synthetic and fallback generators
pub const DEFAULT_SEED: u64 = 42;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for HealthDash
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub source_path: ConfigValue<PathBuf>,
    pub delimiter: ConfigValue<u8>,
    pub encoding: ConfigValue<SourceEncoding>,
    pub primary_unit: ConfigValue<String>,
    pub seed: ConfigValue<u64>,
    pub fallback_seed: ConfigValue<u64>,
    pub reference_path: ConfigValue<Option<PathBuf>>,
    pub catalog_path: ConfigValue<Option<PathBuf>>,
    pub cache_path: ConfigValue<Option<PathBuf>>,
    pub columns: ConfigValue<ColumnMapping>,
    pub row_filter: ConfigValue<Option<RowFilter>>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            source_path: ConfigValue::new(PathBuf::from(DEFAULT_SOURCE_PATH), ConfigSource::Default),
            delimiter: ConfigValue::new(b',', ConfigSource::Default),
            encoding: ConfigValue::new(SourceEncoding::Utf8, ConfigSource::Default),
            primary_unit: ConfigValue::new("years".to_string(), ConfigSource::Default),
            seed: ConfigValue::new(DEFAULT_SEED, ConfigSource::Default),
            fallback_seed: ConfigValue::new(DEFAULT_SEED, ConfigSource::Default),
            reference_path: ConfigValue::new(None, ConfigSource::Default),
            catalog_path: ConfigValue::new(None, ConfigSource::Default),
            cache_path: ConfigValue::new(None, ConfigSource::Default),
            columns: ConfigValue::new(ColumnMapping::default(), ConfigSource::Default),
            row_filter: ConfigValue::new(None, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| HealthError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| HealthError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(source) = file_config.source {
            if let Some(path) = source.path {
                self.source_path.update(path, ConfigSource::File);
            }
            if let Some(delimiter) = source.delimiter {
                self.delimiter.update(parse_delimiter(&delimiter)?, ConfigSource::File);
            }
            if let Some(encoding) = source.encoding {
                self.encoding.update(parse_encoding(&encoding)?, ConfigSource::File);
            }
            if let Some(unit) = source.unit {
                self.primary_unit.update(unit, ConfigSource::File);
            }
            if let Some(columns) = source.columns {
                self.columns.update(columns, ConfigSource::File);
            }
            if let Some(row_filter) = source.row_filter {
                self.row_filter.update(Some(row_filter), ConfigSource::File);
            }
        }

        if let Some(seed) = file_config.seed {
            self.seed.update(seed, ConfigSource::File);
        }

        if let Some(fallback_seed) = file_config.fallback_seed {
            self.fallback_seed.update(fallback_seed, ConfigSource::File);
        }

        if let Some(reference) = file_config.reference {
            self.reference_path.update(Some(reference), ConfigSource::File);
        }

        if let Some(catalog) = file_config.catalog {
            self.catalog_path.update(Some(catalog), ConfigSource::File);
        }

        if let Some(cache) = file_config.cache {
            self.cache_path.update(Some(cache), ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // HEALTHDASH_SOURCE
        if let Ok(source) = env::var("HEALTHDASH_SOURCE") {
            self.source_path.update(PathBuf::from(source), ConfigSource::Environment);
        }

        // HEALTHDASH_DELIMITER
        if let Ok(delimiter_str) = env::var("HEALTHDASH_DELIMITER") {
            match parse_delimiter(&delimiter_str) {
                Ok(delimiter) => self.delimiter.update(delimiter, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid HEALTHDASH_DELIMITER value '{}': expected a single ASCII character or 'tab'",
                    delimiter_str
                ),
            }
        }

        // HEALTHDASH_ENCODING
        if let Ok(encoding_str) = env::var("HEALTHDASH_ENCODING") {
            match parse_encoding(&encoding_str) {
                Ok(encoding) => self.encoding.update(encoding, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid HEALTHDASH_ENCODING value '{}': expected utf-8 or latin-1",
                    encoding_str
                ),
            }
        }

        // HEALTHDASH_SEED
        if let Ok(seed_str) = env::var("HEALTHDASH_SEED") {
            match seed_str.parse::<u64>() {
                Ok(seed) => self.seed.update(seed, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid HEALTHDASH_SEED value '{}': expected unsigned integer",
                    seed_str
                ),
            }
        }

        // HEALTHDASH_FALLBACK_SEED
        if let Ok(seed_str) = env::var("HEALTHDASH_FALLBACK_SEED") {
            match seed_str.parse::<u64>() {
                Ok(seed) => self.fallback_seed.update(seed, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid HEALTHDASH_FALLBACK_SEED value '{}': expected unsigned integer",
                    seed_str
                ),
            }
        }

        // HEALTHDASH_REFERENCE
        if let Ok(reference) = env::var("HEALTHDASH_REFERENCE") {
            self.reference_path.update(Some(PathBuf::from(reference)), ConfigSource::Environment);
        }

        // HEALTHDASH_CACHE
        if let Ok(cache) = env::var("HEALTHDASH_CACHE") {
            self.cache_path.update(Some(PathBuf::from(cache)), ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(source_path) = overrides.source_path {
            self.source_path.update(source_path, ConfigSource::Cli);
        }

        if let Some(delimiter) = overrides.delimiter {
            self.delimiter.update(delimiter, ConfigSource::Cli);
        }

        if let Some(encoding) = overrides.encoding {
            self.encoding.update(encoding, ConfigSource::Cli);
        }

        if let Some(seed) = overrides.seed {
            self.seed.update(seed, ConfigSource::Cli);
        }

        if let Some(cache_path) = overrides.cache_path {
            self.cache_path.update(Some(cache_path), ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let optional_path = |p: &Option<PathBuf>| {
            p.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "(none)".to_string())
        };

        let mut map = HashMap::new();

        map.insert(
            "source_path".to_string(),
            (self.source_path.value.display().to_string(), self.source_path.source),
        );

        map.insert(
            "delimiter".to_string(),
            (describe_delimiter(self.delimiter.value), self.delimiter.source),
        );

        map.insert(
            "encoding".to_string(),
            (self.encoding.value.label().to_string(), self.encoding.source),
        );

        map.insert(
            "primary_unit".to_string(),
            (self.primary_unit.value.clone(), self.primary_unit.source),
        );

        map.insert("seed".to_string(), (self.seed.value.to_string(), self.seed.source));

        map.insert(
            "fallback_seed".to_string(),
            (self.fallback_seed.value.to_string(), self.fallback_seed.source),
        );

        map.insert(
            "reference_path".to_string(),
            (optional_path(&self.reference_path.value), self.reference_path.source),
        );

        map.insert(
            "catalog_path".to_string(),
            (optional_path(&self.catalog_path.value), self.catalog_path.source),
        );

        map.insert(
            "cache_path".to_string(),
            (optional_path(&self.cache_path.value), self.cache_path.source),
        );

        let columns = &self.columns.value;
        map.insert(
            "columns".to_string(),
            (
                format!(
                    "country={}, year={}, metric={}, value={}",
                    columns.country, columns.year, columns.metric, columns.value
                ),
                self.columns.source,
            ),
        );

        map.insert(
            "row_filter".to_string(),
            (
                self.row_filter
                    .value
                    .as_ref()
                    .map(|f| format!("{} == {}", f.column, f.equals))
                    .unwrap_or_else(|| "(none)".to_string()),
                self.row_filter.source,
            ),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    seed: Option<u64>,
    fallback_seed: Option<u64>,
    reference: Option<PathBuf>,
    catalog: Option<PathBuf>,
    cache: Option<PathBuf>,
    source: Option<SourceSection>,
}

#[derive(Debug, Deserialize, Serialize)]
struct SourceSection {
    path: Option<PathBuf>,
    delimiter: Option<String>,
    encoding: Option<String>,
    unit: Option<String>,
    columns: Option<ColumnMapping>,
    row_filter: Option<RowFilter>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub source_path: Option<PathBuf>,
    pub delimiter: Option<u8>,
    pub encoding: Option<SourceEncoding>,
    pub seed: Option<u64>,
    pub cache_path: Option<PathBuf>,
}

/// Parse a field delimiter from string
pub fn parse_delimiter(s: &str) -> Result<u8> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(HealthError::ConfigInvalid {
            key: "delimiter".to_string(),
            reason: format!("Invalid delimiter: {:?}. Use a single ASCII character or 'tab'", s),
        }),
    }
}

/// Parse source encoding from string
pub fn parse_encoding(s: &str) -> Result<SourceEncoding> {
    match s.to_lowercase().as_str() {
        "utf-8" | "utf8" => Ok(SourceEncoding::Utf8),
        "latin-1" | "latin1" | "iso-8859-1" => Ok(SourceEncoding::Latin1),
        _ => Err(HealthError::ConfigInvalid {
            key: "encoding".to_string(),
            reason: format!("Invalid encoding: {}. Use utf-8 or latin-1", s),
        }),
    }
}

fn describe_delimiter(delimiter: u8) -> String {
    match delimiter {
        b'\t' => "tab".to_string(),
        other => (other as char).to_string(),
    }
}
