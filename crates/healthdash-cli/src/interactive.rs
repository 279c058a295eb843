use anyhow::{Context, Result};
use dialoguer::{Input, MultiSelect, Select};
use healthdash_query::{FilterPlan, SelectionOptions, YearRange, ALL_REGIONS};

/// What to do after a result has been shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    Refine,
    Reload,
    Quit,
}

/// Build a filter plan with prompts, starting from the previous selection
pub fn prompt_plan(options: &SelectionOptions, previous: &FilterPlan) -> Result<FilterPlan> {
    if options.metrics.is_empty() {
        anyhow::bail!("The dataset contains no metrics");
    }
    let bounds = options.year_bounds.context("The dataset contains no years")?;

    let metric_idx = Select::new()
        .with_prompt("Metric")
        .items(&options.metrics)
        .default(options.metrics.iter().position(|m| *m == previous.metric).unwrap_or(0))
        .interact()?;
    let metric = options.metrics[metric_idx].clone();

    let current_region = previous.region.as_deref().unwrap_or(ALL_REGIONS);
    let region_idx = Select::new()
        .with_prompt("Filter by region")
        .items(&options.regions)
        .default(options.regions.iter().position(|r| r == current_region).unwrap_or(0))
        .interact()?;
    let region = options.regions[region_idx].clone();

    // A region selects its own countries
    let countries = if region == ALL_REGIONS {
        let defaults: Vec<bool> =
            options.countries.iter().map(|c| previous.countries.contains(c)).collect();
        MultiSelect::new()
            .with_prompt("Countries (space to toggle)")
            .items(&options.countries)
            .defaults(&defaults)
            .interact()?
            .into_iter()
            .map(|idx| options.countries[idx].clone())
            .collect()
    } else {
        Vec::new()
    };

    let from = prompt_year("From year", previous.years.from, bounds)?;
    let to = prompt_year("To year", previous.years.to.max(from), YearRange::new(from, bounds.to))?;

    Ok(FilterPlan::new(metric, YearRange::new(from, to))
        .with_countries(countries)
        .with_region(region))
}

fn prompt_year(prompt: &str, default: i32, bounds: YearRange) -> Result<i32> {
    let year = Input::<i32>::new()
        .with_prompt(format!("{} ({})", prompt, bounds))
        .default(default.clamp(bounds.from, bounds.to))
        .validate_with(|year: &i32| -> std::result::Result<(), String> {
            if bounds.contains(*year) {
                Ok(())
            } else {
                Err(format!("Choose a year between {} and {}", bounds.from, bounds.to))
            }
        })
        .interact_text()?;
    Ok(year)
}

/// Ask how to continue after a result
pub fn next_action() -> Result<NextAction> {
    let actions = vec!["Refine selection", "Reload data", "Quit"];
    let idx = Select::new().with_prompt("Next").items(&actions).default(0).interact()?;

    Ok(match idx {
        0 => NextAction::Refine,
        1 => NextAction::Reload,
        _ => NextAction::Quit,
    })
}
