//! Queries over datasets produced by the load pipeline

use healthdash_core::models::catalog::LIFE_EXPECTANCY;
use healthdash_core::models::Provenance;
use healthdash_core::{load, LoadOptions};
use healthdash_query::{
    bar_chart, line_chart, CountryLatest, FilterOutcome, FilterPlan, QueryEngine, YearRange,
};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_fallback_dataset_is_queryable() {
    let result = load(&LoadOptions::new("/nonexistent/who.csv"));
    assert_eq!(result.provenance, Provenance::Fallback);

    let engine = QueryEngine::new(&result.dataset);
    let options = engine.options();
    let years = options.default_years.unwrap();
    let plan = FilterPlan::new(LIFE_EXPECTANCY, years).with_countries(options.default_countries);

    let outcome = engine.execute(&plan);
    let matched = outcome.result().unwrap();

    // Three countries, eleven years each
    assert_eq!(matched.rows.len(), 3 * 11);
    assert!(matched.summary.improvement.is_some());
    assert!(matched.latest.iter().all(|l| matches!(l, CountryLatest::Current { .. })));

    let chart = line_chart(matched, true);
    assert!(chart.series.iter().all(|s| s.points.len() == 11));
    assert_eq!(bar_chart(matched).unwrap().bars.len(), 3);
}

#[test]
fn test_biennial_synthetic_metric_marks_stale_years() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "COUNTRY,YEAR,GHO (DISPLAY),Numeric").unwrap();
    writeln!(file, "Japan,2020,Life expectancy at birth (years),84.6").unwrap();
    writeln!(file, "Japan,2021,Life expectancy at birth (years),84.5").unwrap();

    let result = load(&LoadOptions::new(file.path()));
    let engine = QueryEngine::new(&result.dataset);

    // Synthetic series only cover even years
    let plan =
        FilterPlan::new("Under-5 Mortality Rate", YearRange::new(2015, 2021)).with_country("Japan");
    let outcome = engine.execute(&plan);
    let matched = outcome.result().unwrap();

    match &matched.latest[0] {
        CountryLatest::Stale { year, .. } => assert_eq!(*year, 2020),
        other => panic!("expected a stale value, got {:?}", other),
    }
    assert!(bar_chart(matched).is_none());

    let empty = FilterPlan::new("Under-5 Mortality Rate", YearRange::new(2015, 2021));
    assert_eq!(engine.execute(&empty), FilterOutcome::NoSelection);
}
