//! Country classification tables (WHO region and development tier)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::observation::DevelopmentTier;
use crate::error::{HealthError, Result};

/// Region assigned to countries missing from the table
pub const DEFAULT_REGION: &str = "Global";

/// Classification of a single country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryClass {
    pub region: String,
    pub tier: DevelopmentTier,
}

/// Immutable `country -> (region, tier)` lookup with declared defaults
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    countries: HashMap<String, CountryClass>,
    default_region: String,
    default_tier: DevelopmentTier,
}

impl ReferenceTable {
    /// Create a table from explicit entries
    pub fn new(
        entries: impl IntoIterator<Item = (String, CountryClass)>,
        default_region: impl Into<String>,
        default_tier: DevelopmentTier,
    ) -> Self {
        Self {
            countries: entries.into_iter().collect(),
            default_region: default_region.into(),
            default_tier,
        }
    }

    /// Built-in classification of the countries shipped with the WHO extract
    pub fn builtin() -> Self {
        let entries = [
            ("Afghanistan", "EMRO", DevelopmentTier::Low),
            ("Japan", "WPRO", DevelopmentTier::High),
            ("United States of America", "AMRO", DevelopmentTier::High),
            ("Germany", "EURO", DevelopmentTier::High),
            ("Brazil", "AMRO", DevelopmentTier::UpperMiddle),
            ("India", "SEARO", DevelopmentTier::LowerMiddle),
        ];

        Self::new(
            entries.into_iter().map(|(name, region, tier)| {
                (name.to_string(), CountryClass { region: region.to_string(), tier })
            }),
            DEFAULT_REGION,
            DevelopmentTier::Mixed,
        )
    }

    /// Load a reference table from a TOML file
    ///
    /// ```toml
    /// default_region = "Global"
    /// default_tier = "Mixed"
    ///
    /// [[countries]]
    /// name = "Japan"
    /// region = "WPRO"
    /// tier = "High"
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            HealthError::ReferenceInvalid {
                reason: format!("Failed to read {}: {}", path.as_ref().display(), e),
            }
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse a reference table from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ReferenceFile = toml::from_str(content).map_err(|e| {
            HealthError::ReferenceInvalid { reason: format!("Failed to parse TOML: {}", e) }
        })?;

        let mut countries = HashMap::with_capacity(file.countries.len());
        for entry in file.countries {
            let name = entry.name.trim().to_string();
            if name.is_empty() {
                return Err(HealthError::ReferenceInvalid {
                    reason: "country entry with empty name".to_string(),
                });
            }
            if countries.contains_key(&name) {
                return Err(HealthError::ReferenceInvalid {
                    reason: format!("duplicate country entry: {}", name),
                });
            }
            countries.insert(name, CountryClass { region: entry.region, tier: entry.tier });
        }

        Ok(Self {
            countries,
            default_region: file.default_region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
            default_tier: file.default_tier.unwrap_or_default(),
        })
    }

    /// WHO region for a country, or the default region
    pub fn region(&self, country: &str) -> &str {
        self.countries
            .get(country)
            .map(|c| c.region.as_str())
            .unwrap_or(self.default_region.as_str())
    }

    /// Development tier for a country, or the default tier
    pub fn tier(&self, country: &str) -> DevelopmentTier {
        self.countries.get(country).map(|c| c.tier).unwrap_or(self.default_tier)
    }

    /// Whether the country has an explicit entry
    pub fn contains(&self, country: &str) -> bool {
        self.countries.contains_key(country)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

impl Default for ReferenceTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Debug, Deserialize)]
struct ReferenceFile {
    default_region: Option<String>,
    default_tier: Option<DevelopmentTier>,
    #[serde(default)]
    countries: Vec<ReferenceEntry>,
}

#[derive(Debug, Deserialize)]
struct ReferenceEntry {
    name: String,
    region: String,
    #[serde(default)]
    tier: DevelopmentTier,
}
