use chrono::{DateTime, Utc};
use healthdash_core::models::{Observation, Provenance};
use healthdash_query::{BarChart, CountryLatest, FilterOutcome, LineChart, YearRange};
use serde::Serialize;
use tabled::Tabled;

/// Output for load command
#[derive(Debug, Serialize)]
pub struct LoadOutput {
    pub source_path: String,
    pub provenance: Provenance,
    pub fallback_reason: Option<String>,
    pub loaded_at: DateTime<Utc>,
    pub observation_count: usize,
    pub metric_count: usize,
    pub country_count: usize,
    pub year_range: Option<YearRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<MetricCount>>,
}

#[derive(Debug, Serialize, Tabled)]
pub struct MetricCount {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Unit")]
    pub unit: String,
    #[tabled(rename = "Rows")]
    pub rows: usize,
}

/// Output for query command
#[derive(Debug, Serialize)]
pub struct QueryOutput {
    pub provenance: Provenance,
    pub query: FilterOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_chart: Option<LineChart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_chart: Option<BarChart>,
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub entries: Vec<ConfigEntry>,
}

#[derive(Debug, Serialize, Tabled)]
pub struct ConfigEntry {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

/// One line of the data table
#[derive(Debug, Tabled)]
pub struct ObservationRow {
    #[tabled(rename = "Country")]
    pub country: String,
    #[tabled(rename = "Year")]
    pub year: i32,
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Unit")]
    pub unit: String,
    #[tabled(rename = "Region")]
    pub region: String,
}

impl From<&Observation> for ObservationRow {
    fn from(o: &Observation) -> Self {
        Self {
            country: o.country.clone(),
            year: o.year,
            metric: o.metric.clone(),
            value: format!("{:.2}", o.value),
            unit: o.unit.clone(),
            region: o.who_region.clone(),
        }
    }
}

/// Human-readable line for a country's latest value
pub fn describe_latest(latest: &CountryLatest) -> String {
    match latest {
        CountryLatest::Current { country, value } => format!("✓ {}: {:.1}", country, value),
        CountryLatest::Stale { country, year, value } => {
            format!("⚠ {}: {:.1} ({})", country, value, year)
        }
        CountryLatest::Missing { country } => format!("✗ {}: No data", country),
    }
}
