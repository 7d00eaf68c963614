//! Error types for the tripgeo CLI.

use camino::Utf8PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tripgeo_data::ProviderBuildError;

/// Errors emitted by the tripgeo CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required positional argument is missing after configuration merging.
    #[error("missing {field} (pass it as <{value_name}> or set {env})")]
    MissingPositional {
        field: &'static str,
        value_name: &'static str,
        env: &'static str,
    },
    /// A configured value is out of range.
    #[error("invalid {field}: {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: String,
    },
    /// The trip file does not exist.
    #[error("trip file {path:?} does not exist")]
    MissingTripFile { path: Utf8PathBuf },
    /// Reading the trip file failed.
    #[error("failed to read trip file {path:?}: {source}")]
    ReadTrip {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The trip JSON could not be decoded.
    #[error("failed to parse trip JSON at {path:?}: {source}")]
    ParseTrip {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The cache directory could not be created.
    #[error("failed to prepare cache directory {path:?}: {source}")]
    PrepareCacheDir {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Constructing one of the HTTP adapters failed.
    #[error("failed to build {service} client for {base_url:?}: {source}")]
    BuildService {
        service: &'static str,
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The async runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Serializing the trip geometry failed.
    #[error("failed to serialize trip geometry: {0}")]
    SerializeGeometry(#[source] serde_json::Error),
    /// Writing the output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
