//! Synthetic auxiliary metrics for countries present in the primary source

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::collections::HashSet;

use crate::models::{MetricCatalog, Observation, ReferenceTable};

/// First year of generated series
pub const FIRST_YEAR: i32 = 2000;

/// Last year of generated series
pub const LAST_YEAR: i32 = 2022;

/// Years covered by synthetic metrics: every other year from 2000 to 2022
pub fn synthetic_years() -> impl Iterator<Item = i32> {
    (FIRST_YEAR..=LAST_YEAR).step_by(2)
}

/// Round to `decimals` decimal places
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Deterministic generator of plausible indicator series
///
/// Values depend on the country's development tier, a per-metric linear trend
/// and Gaussian noise drawn from a single RNG seeded with `seed`. Draw order is
/// country, then catalog metric, then year, so the same inputs always produce
/// the same rows.
pub struct SyntheticGenerator<'a> {
    catalog: &'a MetricCatalog,
    reference: &'a ReferenceTable,
    seed: u64,
}

impl<'a> SyntheticGenerator<'a> {
    pub fn new(catalog: &'a MetricCatalog, reference: &'a ReferenceTable, seed: u64) -> Self {
        Self { catalog, reference, seed }
    }

    /// Generate rows for every country and every catalog metric not in `exclude`
    pub fn generate(&self, countries: &[String], exclude: &HashSet<String>) -> Vec<Observation> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let years: Vec<i32> = synthetic_years().collect();
        let mut records = Vec::new();

        for country in countries {
            let tier = self.reference.tier(country);
            let region = self.reference.region(country);
            let multiplier = tier.multiplier();

            for spec in self.catalog.iter().filter(|m| !exclude.contains(&m.name)) {
                let base_value = spec.min + (spec.max - spec.min) * multiplier;
                let (lower, upper) = spec.clamp_bounds();
                let noise_sd = spec.noise_sd();

                for &year in &years {
                    let trend = spec.annual_trend * f64::from(year - FIRST_YEAR);
                    let noise: f64 = rng.sample::<f64, _>(StandardNormal) * noise_sd;
                    let value = (base_value + trend + noise).clamp(lower, upper);

                    records.push(Observation {
                        country: country.clone(),
                        year,
                        metric: spec.name.clone(),
                        value: round_to(value, 2),
                        unit: spec.unit.clone(),
                        who_region: region.to_string(),
                        development_level: tier,
                        data_quality: tier.synthetic_quality(),
                        value_indexed: None,
                    });
                }
            }
        }

        tracing::debug!(
            "Generated {} synthetic rows for {} countries",
            records.len(),
            countries.len()
        );

        records
    }
}
