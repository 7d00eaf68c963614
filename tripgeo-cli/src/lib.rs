//! Command-line interface for turning trip itineraries into map geometry.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod assemble;
mod error;

pub use error::CliError;

use assemble::{AssembleArgs, run_assemble};

pub(crate) const ARG_TRIP: &str = "trip";
pub(crate) const ARG_CACHE_DIR: &str = "cache-dir";
pub(crate) const ARG_NOMINATIM_URL: &str = "nominatim-url";
pub(crate) const ARG_OSRM_URL: &str = "osrm-url";
pub(crate) const ARG_OVERPASS_URL: &str = "overpass-url";
pub(crate) const ARG_USER_AGENT: &str = "user-agent";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_GEOCODE_SPACING_MS: &str = "geocode-spacing-ms";
pub(crate) const ARG_SKIP_RAIL: &str = "skip-rail";
pub(crate) const ARG_SHARED_ROUTE_KEYS: &str = "shared-route-keys";
pub(crate) const TRIP_VALUE_NAME: &str = "path";
pub(crate) const ENV_TRIP: &str = "TRIPGEO_CMDS_ASSEMBLE_TRIP_PATH";

/// Run the tripgeo CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Assemble(args) => run_assemble(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "tripgeo",
    about = "Turn trip itineraries into locations, routes and map bounds",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a trip's events and draw the legs between them.
    Assemble(AssembleArgs),
}

#[cfg(test)]
mod tests;
