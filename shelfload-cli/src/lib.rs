//! Command-line interface for loading catalogue dumps.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod load;

pub use error::CliError;
use load::{LoadArgs, run_load};

const ARG_AUTHORS_DUMP: &str = "authors-dump";
const ARG_WORKS_DUMP: &str = "works-dump";
const ARG_DATABASE: &str = "database";
const ARG_WORK_LIMIT: &str = "work-limit";
const ARG_AUTHOR_LIMIT: &str = "author-limit";
const ARG_ALL_WORKS: &str = "all-works";
const ENV_AUTHORS_DUMP: &str = "SHELFLOAD_CMDS_LOAD_AUTHORS_DUMP";
const ENV_WORKS_DUMP: &str = "SHELFLOAD_CMDS_LOAD_WORKS_DUMP";
const ENV_DATABASE: &str = "SHELFLOAD_CMDS_LOAD_DATABASE";

/// Run the shelfload CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when the arguments or layered configuration are
/// invalid, when the database cannot be opened, or when either load pass
/// aborts.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Load(args) => run_load(args).map(|_| ()),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "shelfload",
    about = "Load Open Library author and work dumps into a catalogue database",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the author pass followed by the work pass.
    Load(LoadArgs),
}

#[cfg(test)]
mod tests;
