//! Error types emitted by the Kerbside CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use kerbside_data::{LayerLoadError, RouteLoadError, ScorerBuildError};
use thiserror::Error;

/// Errors emitted by the Kerbside CLI.
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
        /// Flag name without the leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The hour of day is outside `0..24`.
    #[error("hour {hour} is not between 0 and 23")]
    InvalidHour {
        /// Rejected hour.
        hour: u8,
    },
    /// The analysis configuration file could not be read.
    #[error("failed to read analysis configuration at {path:?}: {source}")]
    ReadAnalysisConfig {
        /// Configuration file.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The analysis configuration file is not valid JSON for the engine.
    #[error("failed to parse analysis configuration at {path:?}: {source}")]
    ParseAnalysisConfig {
        /// Configuration file.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// Loading candidate routes failed.
    #[error(transparent)]
    LoadRoutes(#[from] RouteLoadError),
    /// Loading a feature layer failed.
    #[error(transparent)]
    LoadLayers(#[from] LayerLoadError),
    /// Constructing the remote safety scorer failed.
    #[error("failed to build safety scorer for {base_url:?}: {source}")]
    BuildScorer {
        /// Configured scorer URL.
        base_url: String,
        /// Underlying construction error.
        #[source]
        source: ScorerBuildError,
    },
    /// Serialising the ranked analyses failed.
    #[error("failed to serialise analyses: {0}")]
    SerialiseAnalyses(#[source] serde_json::Error),
    /// Writing the analyses failed.
    #[error("failed to write analyses: {0}")]
    WriteOutput(#[source] std::io::Error),
}
