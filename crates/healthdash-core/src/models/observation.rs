use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse development classification driving synthetic plausibility ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DevelopmentTier {
    High,
    #[serde(rename = "Upper-Middle")]
    UpperMiddle,
    #[serde(rename = "Lower-Middle")]
    LowerMiddle,
    Low,
    /// Unmapped or mixed-income countries
    #[default]
    #[serde(other)]
    Mixed,
}

impl DevelopmentTier {
    /// Position of synthetic base values inside a metric's plausible range
    pub fn multiplier(&self) -> f64 {
        match self {
            DevelopmentTier::High => 0.9,
            DevelopmentTier::UpperMiddle => 0.7,
            DevelopmentTier::LowerMiddle => 0.5,
            DevelopmentTier::Low => 0.3,
            DevelopmentTier::Mixed => 0.5,
        }
    }

    /// Quality label attached to synthetic rows for this tier
    pub fn synthetic_quality(&self) -> DataQuality {
        match self {
            DevelopmentTier::High | DevelopmentTier::UpperMiddle => DataQuality::High,
            _ => DataQuality::Medium,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DevelopmentTier::High => "High",
            DevelopmentTier::UpperMiddle => "Upper-Middle",
            DevelopmentTier::LowerMiddle => "Lower-Middle",
            DevelopmentTier::Low => "Low",
            DevelopmentTier::Mixed => "Mixed",
        }
    }

    /// Parse a tier label, falling back to `Mixed` for anything unrecognised
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "high" => DevelopmentTier::High,
            "upper-middle" | "upper_middle" => DevelopmentTier::UpperMiddle,
            "lower-middle" | "lower_middle" => DevelopmentTier::LowerMiddle,
            "low" => DevelopmentTier::Low,
            _ => DevelopmentTier::Mixed,
        }
    }
}

impl fmt::Display for DevelopmentTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How much an observation can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataQuality {
    High,
    Medium,
    Synthetic,
}

impl fmt::Display for DataQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DataQuality::High => "High",
            DataQuality::Medium => "Medium",
            DataQuality::Synthetic => "Synthetic",
        };
        f.write_str(label)
    }
}

/// One (country, year, metric) data point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub country: String,

    pub year: i32,

    /// Indicator name (e.g. "Under-5 Mortality Rate")
    pub metric: String,

    pub value: f64,

    /// Unit of `value` (e.g. "years", "per 1000")
    pub unit: String,

    /// WHO region code, "Global" when unmapped
    pub who_region: String,

    pub development_level: DevelopmentTier,

    pub data_quality: DataQuality,

    /// Series rebased to 100 at the group's first year, set by the indexer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_indexed: Option<f64>,
}

impl Observation {
    /// Key identifying the series this observation belongs to
    pub fn series_key(&self) -> (&str, &str) {
        (self.country.as_str(), self.metric.as_str())
    }
}
