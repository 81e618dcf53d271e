//! Load command implementation for the shelfload CLI.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use shelfload_data::{DEFAULT_WORK_LIMIT, Loader, LoaderConfig, Pass, PassReport, RunReport};

use crate::{
    ARG_ALL_WORKS, ARG_AUTHOR_LIMIT, ARG_AUTHORS_DUMP, ARG_DATABASE, ARG_WORK_LIMIT,
    ARG_WORKS_DUMP, CliError, ENV_AUTHORS_DUMP, ENV_DATABASE, ENV_WORKS_DUMP,
};

/// CLI arguments for the `load` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load the author dump and then the works dump into the \
                 catalogue database. Paths and limits can come from CLI \
                 flags, configuration files, or environment variables.",
    about = "Load author and work dumps into the catalogue database"
)]
#[ortho_config(prefix = "SHELFLOAD")]
pub(crate) struct LoadArgs {
    /// Path to the author dump.
    #[arg(long = ARG_AUTHORS_DUMP, value_name = "path")]
    #[serde(default)]
    pub(crate) authors_dump: Option<Utf8PathBuf>,
    /// Path to the works dump.
    #[arg(long = ARG_WORKS_DUMP, value_name = "path")]
    #[serde(default)]
    pub(crate) works_dump: Option<Utf8PathBuf>,
    /// Path to the SQLite catalogue database; created when absent.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Maximum number of work lines to load (default 50).
    #[arg(long = ARG_WORK_LIMIT, value_name = "n")]
    #[serde(default)]
    pub(crate) work_limit: Option<usize>,
    /// Load every work in the dump.
    #[arg(long = ARG_ALL_WORKS)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) all_works: bool,
    /// Maximum number of author lines to load; unlimited when omitted.
    #[arg(long = ARG_AUTHOR_LIMIT, value_name = "n")]
    #[serde(default)]
    pub(crate) author_limit: Option<usize>,
}

impl LoadArgs {
    pub(crate) fn into_config(self) -> Result<LoadConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        LoadConfig::try_from(merged)
    }
}

/// Resolved `load` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LoadConfig {
    pub(crate) authors_dump: Utf8PathBuf,
    pub(crate) works_dump: Utf8PathBuf,
    pub(crate) database: Utf8PathBuf,
    pub(crate) work_limit: Option<usize>,
    pub(crate) author_limit: Option<usize>,
}

impl LoadConfig {
    /// Reject dump paths that exist but are not regular files. A dump that
    /// does not exist is left to its pass, which reports it as unavailable
    /// while the other pass still runs.
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::reject_non_file(&self.authors_dump, ARG_AUTHORS_DUMP)?;
        Self::reject_non_file(&self.works_dump, ARG_WORKS_DUMP)?;
        Ok(())
    }

    fn reject_non_file(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match shelfload_fs::is_regular_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub(crate) fn loader_config(&self) -> LoaderConfig {
        LoaderConfig::new(self.authors_dump.clone(), self.works_dump.clone())
            .with_author_limit(self.author_limit)
            .with_work_limit(self.work_limit)
    }
}

impl TryFrom<LoadArgs> for LoadConfig {
    type Error = CliError;

    fn try_from(args: LoadArgs) -> Result<Self, Self::Error> {
        let authors_dump = args.authors_dump.ok_or(CliError::MissingArgument {
            field: ARG_AUTHORS_DUMP,
            env: ENV_AUTHORS_DUMP,
        })?;
        let works_dump = args.works_dump.ok_or(CliError::MissingArgument {
            field: ARG_WORKS_DUMP,
            env: ENV_WORKS_DUMP,
        })?;
        let database = args.database.ok_or(CliError::MissingArgument {
            field: ARG_DATABASE,
            env: ENV_DATABASE,
        })?;
        let work_limit = match (args.all_works, args.work_limit) {
            (true, Some(_)) => {
                return Err(CliError::ConflictingLimits {
                    limit: ARG_WORK_LIMIT,
                    all: ARG_ALL_WORKS,
                });
            }
            (true, None) => None,
            (false, limit) => Some(limit.unwrap_or(DEFAULT_WORK_LIMIT)),
        };
        Ok(Self {
            authors_dump,
            works_dump,
            database,
            work_limit,
            author_limit: args.author_limit,
        })
    }
}

/// Reports from a `load` run where both passes completed.
#[derive(Debug)]
pub(crate) struct LoadOutcome {
    pub(crate) database: Utf8PathBuf,
    pub(crate) authors: PassReport,
    pub(crate) works: PassReport,
}

pub(crate) fn run_load(args: LoadArgs) -> Result<LoadOutcome, CliError> {
    let config = resolve_load_config(args)?;
    execute_load(&config)
}

fn resolve_load_config(args: LoadArgs) -> Result<LoadConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

#[cfg(feature = "store-sqlite")]
fn execute_load(config: &LoadConfig) -> Result<LoadOutcome, CliError> {
    use shelfload_core::SqliteStore;

    let store = SqliteStore::open(&config.database).map_err(|source| CliError::OpenStore {
        path: config.database.clone(),
        source: Box::new(source),
    })?;
    let report = Loader::new(config.loader_config()).run(&store, &store);
    finish_run(config, report)
}

#[cfg(not(feature = "store-sqlite"))]
fn execute_load(_config: &LoadConfig) -> Result<LoadOutcome, CliError> {
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "loading dumps into a database",
    })
}

fn finish_run(config: &LoadConfig, report: RunReport) -> Result<LoadOutcome, CliError> {
    let RunReport { authors, works } = report;
    let authors = authors.map_err(|source| CliError::PassAborted {
        pass: Pass::Authors,
        source: Box::new(source),
    })?;
    let works = works.map_err(|source| CliError::PassAborted {
        pass: Pass::Works,
        source: Box::new(source),
    })?;
    info!(
        "Loaded {} authors ({} skipped) and {} works ({} skipped) into {}",
        authors.loaded,
        authors.skipped.len(),
        works.loaded,
        works.skipped.len(),
        config.database
    );
    Ok(LoadOutcome {
        database: config.database.clone(),
        authors,
        works,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<LoadConfig, CliError> {
    let merged = LoadArgs::merge_from_layers(layers).map_err(CliError::from)?;
    LoadConfig::try_from(merged)
}
