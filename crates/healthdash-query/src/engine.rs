//! Executes filter plans against a dataset

use healthdash_core::models::{Dataset, Observation};
use std::collections::{BTreeSet, HashSet};

use crate::models::{CountryLatest, FilterOutcome, FilterPlan, FilterResult, SummaryStats, YearRange};
use crate::options::SelectionOptions;

/// Query engine over one loaded dataset
///
/// The engine only borrows the dataset; every query builds new values and the
/// underlying rows are never modified.
pub struct QueryEngine<'a> {
    dataset: &'a Dataset,
}

impl<'a> QueryEngine<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Choices a presentation layer offers for this dataset
    pub fn options(&self) -> SelectionOptions {
        SelectionOptions::from_dataset(self.dataset)
    }

    /// Execute a filter plan
    pub fn execute(&self, plan: &FilterPlan) -> FilterOutcome {
        let selection = self.effective_selection(plan);
        if selection.is_empty() {
            return FilterOutcome::NoSelection;
        }

        let selected: HashSet<&str> = selection.iter().map(String::as_str).collect();
        let rows: Vec<Observation> = self
            .dataset
            .for_metric(&plan.metric)
            .filter(|o| selected.contains(o.country.as_str()) && plan.years.contains(o.year))
            .cloned()
            .collect();

        tracing::debug!(
            "Query {} for {} countries in {}: {} rows",
            plan.metric,
            selection.len(),
            plan.years,
            rows.len()
        );

        let Some(summary) = summarize(&rows, plan.years, selection.len()) else {
            return FilterOutcome::NoMatches { selection };
        };

        let latest = latest_values(&rows, &selection, plan.years);

        FilterOutcome::Matched(FilterResult {
            plan: plan.clone(),
            selection,
            rows,
            summary,
            latest,
        })
    }

    /// Countries to query: the region's countries for the metric when a region
    /// is set, otherwise the plan's list without repeats
    fn effective_selection(&self, plan: &FilterPlan) -> Vec<String> {
        match &plan.region {
            Some(region) => self
                .dataset
                .for_metric(&plan.metric)
                .filter(|o| &o.who_region == region)
                .map(|o| o.country.as_str())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect(),
            None => {
                let mut seen = HashSet::new();
                plan.countries
                    .iter()
                    .filter(|c| seen.insert(c.as_str()))
                    .cloned()
                    .collect()
            }
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// KPIs over matched rows, `None` when nothing matched
fn summarize(rows: &[Observation], years: YearRange, country_count: usize) -> Option<SummaryStats> {
    let first = rows.first()?;

    // Strict comparison keeps the first row among equal maxima
    let mut top = first;
    for row in &rows[1..] {
        if row.value > top.value {
            top = row;
        }
    }

    let at_year = |year: i32| mean(rows.iter().filter(move |o| o.year == year).map(|o| o.value));
    let improvement = match (at_year(years.to), at_year(years.from)) {
        (Some(last), Some(first)) => Some(last - first),
        _ => None,
    };

    Some(SummaryStats {
        mean: mean(rows.iter().map(|o| o.value))?,
        top_country: top.country.clone(),
        improvement,
        country_count,
        unit: first.unit.clone(),
    })
}

/// Latest value per selected country, in selection order
fn latest_values(rows: &[Observation], selection: &[String], years: YearRange) -> Vec<CountryLatest> {
    selection
        .iter()
        .map(|country| {
            let own = rows.iter().filter(|o| &o.country == country);

            if let Some(current) = own.clone().find(|o| o.year == years.to) {
                return CountryLatest::Current { country: country.clone(), value: current.value };
            }

            // First row of the most recent year
            let mut latest: Option<&Observation> = None;
            for row in own {
                if latest.map_or(true, |l| row.year > l.year) {
                    latest = Some(row);
                }
            }

            match latest {
                Some(row) => CountryLatest::Stale {
                    country: country.clone(),
                    year: row.year,
                    value: row.value,
                },
                None => CountryLatest::Missing { country: country.clone() },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthdash_core::models::{DataQuality, DevelopmentTier};
    use proptest::prelude::*;

    const LIFE: &str = "Life expectancy at birth (years)";

    fn obs(country: &str, year: i32, value: f64, region: &str) -> Observation {
        Observation {
            country: country.to_string(),
            year,
            metric: LIFE.to_string(),
            value,
            unit: "years".to_string(),
            who_region: region.to_string(),
            development_level: DevelopmentTier::Mixed,
            data_quality: DataQuality::High,
            value_indexed: None,
        }
    }

    fn japan_dataset() -> Dataset {
        Dataset::new(vec![
            obs("Japan", 2010, 82.9, "WPRO"),
            obs("Japan", 2015, 83.7, "WPRO"),
            obs("Japan", 2020, 84.6, "WPRO"),
            obs("Japan", 2005, 82.0, "WPRO"),
        ])
    }

    #[test]
    fn test_single_country_kpis() {
        let dataset = japan_dataset();
        let plan = FilterPlan::new(LIFE, YearRange::new(2010, 2020)).with_country("Japan");

        let outcome = QueryEngine::new(&dataset).execute(&plan);
        let result = outcome.result().unwrap();

        assert_eq!(result.rows.len(), 3);
        assert!((result.summary.mean - 83.733_333_333).abs() < 1e-6);
        assert_eq!(result.summary.top_country, "Japan");
        assert!((result.summary.improvement.unwrap() - 1.7).abs() < 1e-9);
        assert_eq!(result.summary.country_count, 1);
        assert_eq!(result.summary.unit, "years");
        assert_eq!(
            result.latest,
            vec![CountryLatest::Current { country: "Japan".to_string(), value: 84.6 }]
        );
    }

    #[test]
    fn test_empty_selection() {
        let dataset = japan_dataset();
        let plan = FilterPlan::new(LIFE, YearRange::new(2010, 2020));

        assert_eq!(QueryEngine::new(&dataset).execute(&plan), FilterOutcome::NoSelection);
    }

    #[test]
    fn test_no_matching_rows() {
        let dataset = japan_dataset();
        let plan = FilterPlan::new(LIFE, YearRange::new(1990, 1995)).with_country("Japan");

        assert_eq!(
            QueryEngine::new(&dataset).execute(&plan),
            FilterOutcome::NoMatches { selection: vec!["Japan".to_string()] }
        );
    }

    #[test]
    fn test_stale_and_missing_latest() {
        let dataset = Dataset::new(vec![
            obs("Japan", 2016, 84.0, "WPRO"),
            obs("Japan", 2018, 84.3, "WPRO"),
            obs("Brazil", 2020, 75.9, "AMRO"),
        ]);
        let plan = FilterPlan::new(LIFE, YearRange::new(2015, 2020))
            .with_countries(["Japan", "Brazil", "Chad"]);

        let outcome = QueryEngine::new(&dataset).execute(&plan);
        let result = outcome.result().unwrap();

        assert_eq!(
            result.latest,
            vec![
                CountryLatest::Stale { country: "Japan".to_string(), year: 2018, value: 84.3 },
                CountryLatest::Current { country: "Brazil".to_string(), value: 75.9 },
                CountryLatest::Missing { country: "Chad".to_string() },
            ]
        );
        // Nothing at 2015, so improvement is undefined
        assert_eq!(result.summary.improvement, None);
        assert_eq!(result.summary.country_count, 3);
    }

    #[test]
    fn test_top_country_ties_keep_first() {
        let dataset = Dataset::new(vec![
            obs("Brazil", 2020, 80.0, "AMRO"),
            obs("Japan", 2020, 80.0, "WPRO"),
        ]);
        let plan = FilterPlan::new(LIFE, YearRange::new(2020, 2020)).with_countries(["Japan", "Brazil"]);

        let outcome = QueryEngine::new(&dataset).execute(&plan);
        assert_eq!(outcome.result().unwrap().summary.top_country, "Brazil");
    }

    #[test]
    fn test_region_overrides_country_list() {
        let dataset = Dataset::new(vec![
            obs("Germany", 2020, 81.0, "EURO"),
            obs("Japan", 2020, 84.6, "WPRO"),
            obs("France", 2020, 82.5, "EURO"),
        ]);
        let plan = FilterPlan::new(LIFE, YearRange::new(2020, 2020))
            .with_country("Japan")
            .with_region("EURO");

        let outcome = QueryEngine::new(&dataset).execute(&plan);
        let result = outcome.result().unwrap();

        assert_eq!(result.selection, vec!["France", "Germany"]);
        assert!(result.rows.iter().all(|o| o.who_region == "EURO"));
        assert_eq!(result.summary.top_country, "France");
    }

    #[test]
    fn test_unknown_region_is_empty_selection() {
        let dataset = japan_dataset();
        let plan = FilterPlan::new(LIFE, YearRange::new(2010, 2020))
            .with_country("Japan")
            .with_region("AFRO");

        assert_eq!(QueryEngine::new(&dataset).execute(&plan), FilterOutcome::NoSelection);
    }

    #[test]
    fn test_table_sorted_by_country_then_year() {
        let dataset = Dataset::new(vec![
            obs("Japan", 2012, 83.1, "WPRO"),
            obs("Brazil", 2012, 74.0, "AMRO"),
            obs("Japan", 2010, 82.9, "WPRO"),
            obs("Brazil", 2010, 73.6, "AMRO"),
        ]);
        let plan = FilterPlan::new(LIFE, YearRange::new(2010, 2012)).with_countries(["Japan", "Brazil"]);

        let outcome = QueryEngine::new(&dataset).execute(&plan);
        let table: Vec<(&str, i32)> = outcome
            .result()
            .unwrap()
            .table()
            .into_iter()
            .map(|o| (o.country.as_str(), o.year))
            .collect();

        assert_eq!(
            table,
            vec![("Brazil", 2010), ("Brazil", 2012), ("Japan", 2010), ("Japan", 2012)]
        );
        // Base rows keep their order
        assert_eq!(dataset.observations()[0].country, "Japan");
    }

    #[test]
    fn test_duplicate_countries_counted_once() {
        let dataset = japan_dataset();
        let plan = FilterPlan::new(LIFE, YearRange::new(2010, 2020)).with_countries(["Japan", "Japan"]);

        let outcome = QueryEngine::new(&dataset).execute(&plan);
        let result = outcome.result().unwrap();
        assert_eq!(result.summary.country_count, 1);
        assert_eq!(result.latest.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_summary_within_bounds(
            values in prop::collection::vec((0usize..4, 2000i32..2010, 0.0f64..100.0), 1..40)
        ) {
            let countries = ["A", "B", "C", "D"];
            let dataset = Dataset::new(
                values.iter().map(|(c, y, v)| obs(countries[*c], *y, *v, "R")).collect(),
            );
            let plan = FilterPlan::new(LIFE, YearRange::new(2000, 2009)).with_countries(countries);

            let outcome = QueryEngine::new(&dataset).execute(&plan);
            let result = outcome.result().unwrap();

            let max = values.iter().map(|(_, _, v)| *v).fold(f64::MIN, f64::max);
            let min = values.iter().map(|(_, _, v)| *v).fold(f64::MAX, f64::min);

            prop_assert_eq!(result.rows.len(), values.len());
            prop_assert!(result.summary.mean >= min - 1e-9 && result.summary.mean <= max + 1e-9);

            let top = result.rows.iter().find(|o| o.value == max).unwrap();
            prop_assert_eq!(&result.summary.top_country, &top.country);
        }
    }
}
