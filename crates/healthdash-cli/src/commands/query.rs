//! Query command implementation

use crate::cli::QueryArgs;
use crate::interactive::{self, NextAction};
use crate::output::OutputWriter;
use crate::output_types::{describe_latest, ObservationRow, QueryOutput};
use crate::storage::{self, Loader};
use anyhow::{bail, Context, Result};
use healthdash_core::config::LayeredConfig;
use healthdash_core::models::{LoadResult, Provenance};
use healthdash_query::{
    bar_chart, line_chart, FilterOutcome, FilterPlan, QueryEngine, SelectionOptions, YearRange,
};

/// Chart flags shared by one-shot and interactive queries
#[derive(Debug, Clone, Copy)]
struct ChartOptions {
    charts: bool,
    indexed: bool,
}

pub fn execute(
    args: QueryArgs,
    config: &LayeredConfig,
    reload: bool,
    output: &OutputWriter,
) -> Result<()> {
    let mut loader = storage::open_loader(config)?;
    let current = storage::dataset(&mut loader, reload);
    let chart_options = ChartOptions { charts: args.charts, indexed: args.indexed };

    report_provenance(&current, output);

    let engine = QueryEngine::new(&current.dataset);
    let plan = build_plan(&args, &engine.options())?;

    if args.interactive {
        if output.is_json() {
            output.warning("Interactive mode is not available with --json; running the query once");
        } else {
            return run_interactive(&mut loader, current, plan, chart_options, output);
        }
    }

    let outcome = engine.execute(&plan);
    render(&outcome, &plan, current.provenance, chart_options, output)
}

/// Resolve the plan from flags, filling gaps with the dataset defaults
fn build_plan(args: &QueryArgs, options: &SelectionOptions) -> Result<FilterPlan> {
    let metric = match &args.metric {
        Some(metric) if options.metrics.contains(metric) => metric.clone(),
        Some(metric) => bail!(
            "Unknown metric '{}'. Available metrics: {}",
            metric,
            options.metrics.join(", ")
        ),
        None => options.default_metric().context("The dataset contains no metrics")?.to_string(),
    };

    let defaults = options.default_years.context("The dataset contains no years")?;
    let years = YearRange::new(args.from.unwrap_or(defaults.from), args.to.unwrap_or(defaults.to));

    let countries = if args.countries.is_empty() && args.region.is_none() {
        options.default_countries.clone()
    } else {
        args.countries.clone()
    };

    let mut plan = FilterPlan::new(metric, years).with_countries(countries);
    if let Some(region) = &args.region {
        plan = plan.with_region(region.clone());
    }
    Ok(plan)
}

fn run_interactive(
    loader: &mut Loader,
    mut current: LoadResult,
    mut plan: FilterPlan,
    chart_options: ChartOptions,
    output: &OutputWriter,
) -> Result<()> {
    loop {
        let engine = QueryEngine::new(&current.dataset);
        plan = interactive::prompt_plan(&engine.options(), &plan)?;

        let outcome = engine.execute(&plan);
        render(&outcome, &plan, current.provenance, chart_options, output)?;

        match interactive::next_action()? {
            NextAction::Refine => {}
            NextAction::Reload => {
                current = storage::dataset(loader, true);
                report_provenance(&current, output);
            }
            NextAction::Quit => return Ok(()),
        }
    }
}

fn report_provenance(result: &LoadResult, output: &OutputWriter) {
    if result.provenance == Provenance::Fallback {
        output.warning(format!(
            "Showing the {} dataset: {}",
            result.provenance,
            result.fallback_reason.as_deref().unwrap_or("primary source failed")
        ));
    }
}

fn render(
    outcome: &FilterOutcome,
    plan: &FilterPlan,
    provenance: Provenance,
    chart_options: ChartOptions,
    output: &OutputWriter,
) -> Result<()> {
    let charts = outcome
        .result()
        .filter(|_| chart_options.charts)
        .map(|result| (line_chart(result, chart_options.indexed), bar_chart(result)));

    if output.is_json() {
        let (line_chart, bar_chart) = match charts {
            Some((line, bar)) => (Some(line), bar),
            None => (None, None),
        };
        return output.result(QueryOutput {
            provenance,
            query: outcome.clone(),
            line_chart,
            bar_chart,
        });
    }

    let result = match outcome {
        FilterOutcome::NoSelection => {
            output.info("No countries selected. Pass --country or --region to begin");
            return Ok(());
        }
        FilterOutcome::NoMatches { selection } => {
            output.warning(format!(
                "No data available for {} in {} for {}",
                plan.metric,
                plan.years,
                selection.join(", ")
            ));
            return Ok(());
        }
        FilterOutcome::Matched(result) => result,
    };

    let summary = &result.summary;
    output.section(format!("{} ({}) · {}", plan.metric, plan.years, provenance));
    output.kv("Average Value", format!("{:.1} {}", summary.mean, summary.unit));
    output.kv("Highest Value", &summary.top_country);
    output.kv(
        "Improvement",
        summary.improvement.map(|v| format!("{:+.1}", v)).unwrap_or_else(|| "n/a".to_string()),
    );
    output.kv("Countries", summary.country_count);

    if let Some((line, bar)) = &charts {
        output.line_chart(line);
        match bar {
            Some(bar) => output.bar_chart(bar),
            None => output.info(format!("No values in {} to compare", plan.years.to)),
        }
    }

    output.section(format!("Latest Values ({})", plan.years.to));
    for latest in &result.latest {
        println!("  {}", describe_latest(latest));
    }
    if result.latest.iter().any(|l| l.is_stale()) {
        output.info(format!(
            "⚠ marks countries without data for {}; their most recent year is shown",
            plan.years.to
        ));
    }

    output.section("Data Table");
    output.table(result.table().into_iter().map(ObservationRow::from).collect());

    Ok(())
}
