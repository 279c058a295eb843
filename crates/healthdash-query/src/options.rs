//! Selectable values and defaults derived from a dataset

use healthdash_core::models::Dataset;
use serde::{Deserialize, Serialize};

use crate::models::{YearRange, ALL_REGIONS};

/// Number of countries selected before the user chooses
pub const DEFAULT_COUNTRY_COUNT: usize = 3;

/// Width of the default year window
pub const DEFAULT_YEAR_SPAN: i32 = 10;

/// Everything a presentation layer offers for selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionOptions {
    /// Metrics in first-appearance order
    pub metrics: Vec<String>,

    /// Sorted country names
    pub countries: Vec<String>,

    /// `"All"` followed by the sorted WHO regions
    pub regions: Vec<String>,

    /// Smallest and largest year in the dataset
    pub year_bounds: Option<YearRange>,

    pub default_countries: Vec<String>,

    /// The last ten years of data, clamped to the bounds
    pub default_years: Option<YearRange>,
}

impl SelectionOptions {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let countries = dataset.countries();
        let year_bounds = dataset.year_bounds().map(|(min, max)| YearRange::new(min, max));

        let mut regions = vec![ALL_REGIONS.to_string()];
        regions.extend(dataset.regions());

        Self {
            metrics: dataset.metrics(),
            default_countries: countries.iter().take(DEFAULT_COUNTRY_COUNT).cloned().collect(),
            countries,
            regions,
            year_bounds,
            default_years: year_bounds
                .map(|b| YearRange::new((b.to - DEFAULT_YEAR_SPAN).max(b.from), b.to)),
        }
    }

    /// First metric, the usual starting choice
    pub fn default_metric(&self) -> Option<&str> {
        self.metrics.first().map(String::as_str)
    }
}
