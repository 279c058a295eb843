use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use super::observation::Observation;

/// Which load path produced the active dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    /// Primary source blended with synthetic auxiliary metrics
    PrimaryWithSynthetic,
    /// Fully synthetic dataset produced after a primary source failure
    Fallback,
}

impl Provenance {
    pub fn label(&self) -> &'static str {
        match self {
            Provenance::PrimaryWithSynthetic => "Primary+Synthetic",
            Provenance::Fallback => "Fallback",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable collection of observations
///
/// Row order is the order rows were produced in (primary rows first, then
/// synthetic rows). Filters build new views and never touch the base rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Distinct metric names in first-appearance order
    pub fn metrics(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.observations
            .iter()
            .filter(|o| seen.insert(o.metric.as_str()))
            .map(|o| o.metric.clone())
            .collect()
    }

    /// Distinct country names, sorted
    pub fn countries(&self) -> Vec<String> {
        self.observations
            .iter()
            .map(|o| o.country.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Distinct WHO regions, sorted
    pub fn regions(&self) -> Vec<String> {
        self.observations
            .iter()
            .map(|o| o.who_region.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Smallest and largest year present
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let min = self.observations.iter().map(|o| o.year).min()?;
        let max = self.observations.iter().map(|o| o.year).max()?;
        Some((min, max))
    }

    /// Rows for a single metric, in dataset order
    pub fn for_metric<'a>(&'a self, metric: &'a str) -> impl Iterator<Item = &'a Observation> {
        self.observations.iter().filter(move |o| o.metric == metric)
    }
}

impl FromIterator<Observation> for Dataset {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Result of one load request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadResult {
    pub dataset: Dataset,

    pub provenance: Provenance,

    /// Why the primary path was abandoned, for fallback loads
    pub fallback_reason: Option<String>,

    pub loaded_at: DateTime<Utc>,
}

impl LoadResult {
    pub fn primary(dataset: Dataset) -> Self {
        Self {
            dataset,
            provenance: Provenance::PrimaryWithSynthetic,
            fallback_reason: None,
            loaded_at: Utc::now(),
        }
    }

    pub fn fallback(dataset: Dataset, reason: impl Into<String>) -> Self {
        Self {
            dataset,
            provenance: Provenance::Fallback,
            fallback_reason: Some(reason.into()),
            loaded_at: Utc::now(),
        }
    }
}
