use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// HealthDash - Global health indicator explorer
#[derive(Parser, Debug)]
#[command(name = "healthdash")]
#[command(about = "Load, augment and explore global health indicators", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./healthdash.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Primary indicator table
    #[arg(long, global = true, value_name = "FILE")]
    pub source: Option<PathBuf>,

    /// Field delimiter of the source ("tab" or a single character)
    #[arg(long, global = true)]
    pub delimiter: Option<String>,

    /// Source encoding (utf-8 or latin-1)
    #[arg(long, global = true)]
    pub encoding: Option<String>,

    /// Seed for the synthetic metric generator
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Persist the loaded dataset to this JSON file
    #[arg(long, global = true, value_name = "FILE")]
    pub cache: Option<PathBuf>,

    /// Ignore any cached dataset and load the source again
    #[arg(long, global = true)]
    pub reload: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the dataset and report where it came from
    Load(LoadArgs),

    /// Filter one metric and show KPIs, latest values and the data table
    Query(QueryArgs),

    /// List the metrics, countries, regions and years available
    Options,

    /// Show every configuration value and its source
    Config,
}

#[derive(Parser, Debug)]
pub struct LoadArgs {
    /// Show row counts per metric
    #[arg(long)]
    pub metrics: bool,
}

#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// Metric to show (defaults to the first metric in the dataset)
    #[arg(long, short = 'm')]
    pub metric: Option<String>,

    /// Country to include; repeat or separate with commas
    #[arg(long = "country", short = 'c', value_delimiter = ',')]
    pub countries: Vec<String>,

    /// First year of the range
    #[arg(long)]
    pub from: Option<i32>,

    /// Last year of the range
    #[arg(long)]
    pub to: Option<i32>,

    /// WHO region; selects every country of the region ("All" for none)
    #[arg(long)]
    pub region: Option<String>,

    /// Draw the trend and comparison charts
    #[arg(long)]
    pub charts: bool,

    /// Plot the trend chart on the indexed scale (first year = 100)
    #[arg(long)]
    pub indexed: bool,

    /// Interactive mode - build the selection with prompts
    #[arg(long, short = 'i')]
    pub interactive: bool,
}
