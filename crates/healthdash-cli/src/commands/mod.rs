//! Command implementations

mod config;
mod load;
mod options;
mod query;

use crate::cli::{Cli, Commands};
use crate::config_loader;
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = config_loader::load_config(&cli)?;

    match cli.command {
        Commands::Load(args) => load::execute(args, &config, cli.reload, &output),
        Commands::Query(args) => query::execute(args, &config, cli.reload, &output),
        Commands::Options => options::execute(&config, cli.reload, &output),
        Commands::Config => config::execute(&config, &output),
    }
}
