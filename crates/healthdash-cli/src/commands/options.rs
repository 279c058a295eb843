//! Options command implementation

use crate::output::OutputWriter;
use crate::storage;
use anyhow::Result;
use healthdash_core::config::LayeredConfig;
use healthdash_query::QueryEngine;

pub fn execute(config: &LayeredConfig, reload: bool, output: &OutputWriter) -> Result<()> {
    let mut loader = storage::open_loader(config)?;
    let result = storage::dataset(&mut loader, reload);
    let options = QueryEngine::new(&result.dataset).options();

    if output.is_json() {
        return output.result(options);
    }

    output.section(format!("Selection Options ({})", result.provenance));

    output.kv("Metrics", options.metrics.len());
    for metric in &options.metrics {
        println!("  {}", metric);
    }

    output.kv("Countries", options.countries.len());
    println!("  {}", options.countries.join(", "));

    output.kv("Regions", options.regions.join(", "));

    match options.year_bounds {
        Some(bounds) => output.kv("Years", bounds),
        None => output.kv("Years", "(none)"),
    }

    output.section("Defaults");
    output.kv("Metric", options.default_metric().unwrap_or("(none)"));
    output.kv("Countries", options.default_countries.join(", "));
    if let Some(years) = options.default_years {
        output.kv("Years", years);
    }

    Ok(())
}
