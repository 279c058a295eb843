//! Filter plans and their outcomes

use healthdash_core::models::Observation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Region choice meaning "no region filter"
pub const ALL_REGIONS: &str = "All";

/// Inclusive year range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub from: i32,
    pub to: i32,
}

impl YearRange {
    /// Create a range; reversed bounds are swapped
    pub fn new(from: i32, to: i32) -> Self {
        if from <= to {
            Self { from, to }
        } else {
            Self { from: to, to: from }
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.from..=self.to).contains(&year)
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// What to select from the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPlan {
    /// The metric to show
    pub metric: String,

    /// Selected countries, in selection order
    pub countries: Vec<String>,

    pub years: YearRange,

    /// Optional WHO region; overrides `countries` when set
    pub region: Option<String>,
}

impl FilterPlan {
    /// Create a plan with no countries selected
    pub fn new(metric: impl Into<String>, years: YearRange) -> Self {
        Self {
            metric: metric.into(),
            countries: Vec::new(),
            years,
            region: None,
        }
    }

    /// Add one country to the selection
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.countries.push(country.into());
        self
    }

    /// Add several countries to the selection
    pub fn with_countries(mut self, countries: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.countries.extend(countries.into_iter().map(Into::into));
        self
    }

    /// Set the region filter; `"All"` clears it
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        let region = region.into();
        self.region = (region != ALL_REGIONS).then_some(region);
        self
    }
}

/// KPIs over the matched rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Mean value of all matched rows
    pub mean: f64,

    /// Country holding the maximum value
    pub top_country: String,

    /// Mean at the upper year minus mean at the lower year
    pub improvement: Option<f64>,

    /// Number of countries in the effective selection
    pub country_count: usize,

    pub unit: String,
}

/// Most recent value of one selected country within the year range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CountryLatest {
    /// The country has a value at the upper year
    Current { country: String, value: f64 },

    /// Only older years are available; `year` is the most recent one
    Stale { country: String, year: i32, value: f64 },

    /// No rows in range
    Missing { country: String },
}

impl CountryLatest {
    pub fn country(&self) -> &str {
        match self {
            CountryLatest::Current { country, .. }
            | CountryLatest::Stale { country, .. }
            | CountryLatest::Missing { country } => country,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, CountryLatest::Stale { .. })
    }
}

/// Rows and statistics for a non-empty match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterResult {
    pub plan: FilterPlan,

    /// Countries actually queried after the region override
    pub selection: Vec<String>,

    /// Matched rows in dataset order
    pub rows: Vec<Observation>,

    pub summary: SummaryStats,

    pub latest: Vec<CountryLatest>,
}

impl FilterResult {
    /// Rows sorted by country, then year
    pub fn table(&self) -> Vec<&Observation> {
        let mut rows: Vec<&Observation> = self.rows.iter().collect();
        rows.sort_by(|a, b| a.country.cmp(&b.country).then(a.year.cmp(&b.year)));
        rows
    }
}

/// Outcome of executing a plan
///
/// Empty selections and empty matches are ordinary states rather than errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FilterOutcome {
    /// No country selected, nothing to compute
    NoSelection,

    /// Countries were selected but no row matched
    NoMatches { selection: Vec<String> },

    Matched(FilterResult),
}

impl FilterOutcome {
    pub fn result(&self) -> Option<&FilterResult> {
        match self {
            FilterOutcome::Matched(result) => Some(result),
            _ => None,
        }
    }
}
