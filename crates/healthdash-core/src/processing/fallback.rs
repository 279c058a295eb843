//! Fully synthetic dataset used when the primary source cannot be loaded

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use super::indexing::compute_indexed;
use super::synthetic::round_to;
use crate::models::catalog::{LIFE_EXPECTANCY, UNDER5_MORTALITY};
use crate::models::{DataQuality, Dataset, Observation, ReferenceTable};

/// Countries covered by the fallback dataset
pub const FALLBACK_COUNTRIES: [&str; 6] =
    ["United States", "Japan", "Germany", "Brazil", "India", "China"];

pub const FALLBACK_FIRST_YEAR: i32 = 2000;

pub const FALLBACK_LAST_YEAR: i32 = 2023;

/// Parameters of one fallback indicator
struct FallbackMetric {
    name: &'static str,
    unit: &'static str,
    baseline: (f64, f64),
    /// Multiplier applied to the shared yearly trend
    trend_factor: f64,
    noise_sd: f64,
    bounds: (f64, f64),
}

const LIFE: FallbackMetric = FallbackMetric {
    name: LIFE_EXPECTANCY,
    unit: "years",
    baseline: (70.0, 85.0),
    trend_factor: 1.0,
    noise_sd: 0.5,
    bounds: (65.0, 90.0),
};

const MORTALITY: FallbackMetric = FallbackMetric {
    name: UNDER5_MORTALITY,
    unit: "per 1000",
    baseline: (5.0, 50.0),
    trend_factor: -0.3,
    noise_sd: 1.0,
    bounds: (2.0, 100.0),
};

/// Generate the fallback dataset
///
/// Every country draws one baseline per metric, then each year adds a linear
/// trend and Gaussian noise. Values are clamped, rounded to one decimal and
/// indexed like the primary pipeline. This never fails.
pub fn generate_fallback(seed: u64, reference: &ReferenceTable) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(
        FALLBACK_COUNTRIES.len() * 2 * (FALLBACK_LAST_YEAR - FALLBACK_FIRST_YEAR + 1) as usize,
    );

    for country in FALLBACK_COUNTRIES {
        let base_life = rng.gen_range(LIFE.baseline.0..LIFE.baseline.1);
        let base_mortality = rng.gen_range(MORTALITY.baseline.0..MORTALITY.baseline.1);

        for year in FALLBACK_FIRST_YEAR..=FALLBACK_LAST_YEAR {
            let year_factor = f64::from(year - FALLBACK_FIRST_YEAR) * 0.15;

            for (metric, base) in [(&LIFE, base_life), (&MORTALITY, base_mortality)] {
                let noise: f64 = rng.sample::<f64, _>(StandardNormal) * metric.noise_sd;
                let value = (base + year_factor * metric.trend_factor + noise)
                    .clamp(metric.bounds.0, metric.bounds.1);

                records.push(Observation {
                    country: country.to_string(),
                    year,
                    metric: metric.name.to_string(),
                    value: round_to(value, 1),
                    unit: metric.unit.to_string(),
                    who_region: reference.region(country).to_string(),
                    development_level: reference.tier(country),
                    data_quality: DataQuality::Synthetic,
                    value_indexed: None,
                });
            }
        }
    }

    Dataset::new(compute_indexed(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DevelopmentTier;

    #[test]
    fn test_covers_all_countries_metrics_years() {
        let dataset = generate_fallback(42, &ReferenceTable::builtin());

        assert_eq!(dataset.len(), 6 * 2 * 24);
        for country in FALLBACK_COUNTRIES {
            for metric in [LIFE_EXPECTANCY, UNDER5_MORTALITY] {
                for year in FALLBACK_FIRST_YEAR..=FALLBACK_LAST_YEAR {
                    assert!(
                        dataset
                            .iter()
                            .any(|o| o.country == country && o.metric == metric && o.year == year),
                        "missing {} {} {}",
                        country,
                        metric,
                        year
                    );
                }
            }
        }
    }

    #[test]
    fn test_rows_are_synthetic_and_bounded() {
        let dataset = generate_fallback(42, &ReferenceTable::builtin());

        for row in dataset.iter() {
            assert_eq!(row.data_quality, DataQuality::Synthetic);
            assert!(row.value_indexed.is_some());
            let bounds = if row.metric == LIFE_EXPECTANCY { LIFE.bounds } else { MORTALITY.bounds };
            assert!(row.value >= bounds.0 && row.value <= bounds.1, "{:?}", row);
        }
    }

    #[test]
    fn test_first_year_indexed_at_base() {
        let dataset = generate_fallback(1, &ReferenceTable::builtin());
        for row in dataset.iter().filter(|o| o.year == FALLBACK_FIRST_YEAR) {
            assert_eq!(row.value_indexed, Some(100.0));
        }
    }

    #[test]
    fn test_deterministic_for_same_seed() {
        let reference = ReferenceTable::builtin();
        assert_eq!(generate_fallback(42, &reference), generate_fallback(42, &reference));
        assert_ne!(generate_fallback(42, &reference), generate_fallback(43, &reference));
    }

    #[test]
    fn test_classification_from_reference() {
        let dataset = generate_fallback(42, &ReferenceTable::builtin());

        let japan = dataset.iter().find(|o| o.country == "Japan").unwrap();
        assert_eq!(japan.who_region, "WPRO");
        assert_eq!(japan.development_level, DevelopmentTier::High);

        let china = dataset.iter().find(|o| o.country == "China").unwrap();
        assert_eq!(china.who_region, "Global");
        assert_eq!(china.development_level, DevelopmentTier::Mixed);
    }
}
