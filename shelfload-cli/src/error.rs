//! Error types emitted by the shelfload CLI.
//!
//! Keep this error type reasonably small, as the CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use shelfload_core::StoreError;
use shelfload_data::{LoadError, Pass};
use thiserror::Error;

/// Errors emitted by the shelfload CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// `--work-limit` and `--all-works` were both given.
    #[error("--{limit} cannot be combined with --{all}")]
    ConflictingLimits {
        limit: &'static str,
        all: &'static str,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        feature: &'static str,
        action: &'static str,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the catalogue database failed.
    #[error("failed to open catalogue database at {path:?}: {source}")]
    OpenStore {
        path: Utf8PathBuf,
        #[source]
        source: Box<StoreError>,
    },
    /// A load pass stopped before reaching the end of its dump.
    #[error("{pass} pass aborted: {source}")]
    PassAborted {
        pass: Pass,
        #[source]
        source: Box<LoadError>,
    },
}
