//! Load command implementation

use crate::cli::LoadArgs;
use crate::output::OutputWriter;
use crate::output_types::{LoadOutput, MetricCount};
use crate::storage;
use anyhow::Result;
use healthdash_core::config::LayeredConfig;
use healthdash_core::formats::{CsvSourceReader, SourceReader};
use healthdash_core::models::{Dataset, LoadResult, Provenance};
use healthdash_query::YearRange;

pub fn execute(
    args: LoadArgs,
    config: &LayeredConfig,
    reload: bool,
    output: &OutputWriter,
) -> Result<()> {
    let mut loader = storage::open_loader(config)?;

    // Report source problems up front; loading itself never fails
    let source_path = loader.options().source_path.clone();
    let reader = CsvSourceReader::new(loader.options().layout.clone());
    let validation = reader.validate(&source_path);
    for problem in validation.errors.iter().chain(&validation.warnings) {
        output.warning(problem);
    }

    let result = storage::dataset(&mut loader, reload);
    let load_output = summarize(&source_path.display().to_string(), &result, args.metrics);

    if output.is_json() {
        return output.result(load_output);
    }

    match result.provenance {
        Provenance::PrimaryWithSynthetic => output.success(format!(
            "Loaded {} from {}",
            result.provenance,
            source_path.display()
        )),
        Provenance::Fallback => output.warning(format!(
            "Using {} dataset: {}",
            result.provenance,
            result.fallback_reason.as_deref().unwrap_or("primary source failed")
        )),
    }

    output.section("Dataset");
    output.kv("Provenance", result.provenance);
    output.kv("Loaded At", result.loaded_at.format("%Y-%m-%d %H:%M:%S UTC"));
    output.kv("Observations", load_output.observation_count);
    output.kv("Metrics", load_output.metric_count);
    output.kv("Countries", load_output.country_count);
    if let Some(range) = load_output.year_range {
        output.kv("Years", range);
    }

    if let Some(metrics) = load_output.metrics {
        output.section("Metrics");
        output.table(metrics);
    }

    Ok(())
}

fn summarize(source_path: &str, result: &LoadResult, per_metric: bool) -> LoadOutput {
    let dataset = &result.dataset;

    LoadOutput {
        source_path: source_path.to_string(),
        provenance: result.provenance,
        fallback_reason: result.fallback_reason.clone(),
        loaded_at: result.loaded_at,
        observation_count: dataset.len(),
        metric_count: dataset.metrics().len(),
        country_count: dataset.countries().len(),
        year_range: dataset.year_bounds().map(|(from, to)| YearRange::new(from, to)),
        metrics: per_metric.then(|| metric_counts(dataset)),
    }
}

fn metric_counts(dataset: &Dataset) -> Vec<MetricCount> {
    dataset
        .metrics()
        .into_iter()
        .map(|metric| {
            let rows: Vec<_> = dataset.for_metric(&metric).collect();
            MetricCount {
                unit: rows.first().map(|o| o.unit.clone()).unwrap_or_default(),
                rows: rows.len(),
                metric,
            }
        })
        .collect()
}
