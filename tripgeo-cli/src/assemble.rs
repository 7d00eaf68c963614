//! Assemble command implementation for the tripgeo CLI.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tripgeo_core::{
    DEFAULT_CALL_SPACING, DurableStore, FixedDelayLimiter, Geocoder, LOCATION_NAMESPACE,
    LocationResolver, MapDataService, PersistentCache, ROUTE_NAMESPACE, RouteKeying,
    RouteSynthesizer, RoutingService, SynthesizerConfig, Trip, TripGeoAssembler, TripGeometry,
};
use tripgeo_data::{
    DEFAULT_NOMINATIM_URL, DEFAULT_OSRM_URL, DEFAULT_OVERPASS_URL, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT, FileStore, HttpServiceConfig, NominatimGeocoder, OsrmRoutingService,
    OverpassRailLines,
};

use crate::{
    ARG_CACHE_DIR, ARG_GEOCODE_SPACING_MS, ARG_NOMINATIM_URL, ARG_OSRM_URL, ARG_OVERPASS_URL,
    ARG_SHARED_ROUTE_KEYS, ARG_SKIP_RAIL, ARG_TIMEOUT_SECS, ARG_TRIP, ARG_USER_AGENT, CliError,
    ENV_TRIP, TRIP_VALUE_NAME,
};

/// Cache directory used when none is configured.
pub(crate) const DEFAULT_CACHE_DIR: &str = ".tripgeo-cache";

/// CLI arguments for the `assemble` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Resolve every event of a JSON trip to coordinates, draw the \
                 legs between consecutive confirmed locations and print the \
                 resulting geometry as JSON. Geocoding and routing answers are \
                 cached on disk between runs.",
    about = "Assemble map geometry for a trip"
)]
#[ortho_config(prefix = "TRIPGEO")]
pub(crate) struct AssembleArgs {
    /// Path to a JSON file containing a trip.
    #[arg(value_name = TRIP_VALUE_NAME)]
    #[serde(default)]
    pub(crate) trip_path: Option<Utf8PathBuf>,
    /// Directory holding the location and route caches.
    #[arg(long = ARG_CACHE_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) cache_dir: Option<Utf8PathBuf>,
    /// Base URL of the Nominatim geocoder.
    #[arg(long = ARG_NOMINATIM_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_url: Option<String>,
    /// Base URL of the OSRM router used for driving legs.
    #[arg(long = ARG_OSRM_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_url: Option<String>,
    /// Overpass interpreter endpoint used to trace rail lines.
    #[arg(long = ARG_OVERPASS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_url: Option<String>,
    /// User agent sent to every service.
    #[arg(long = ARG_USER_AGENT, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Minimum gap between geocoder requests in milliseconds.
    #[arg(long = ARG_GEOCODE_SPACING_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) geocode_spacing_ms: Option<u64>,
    /// Draw trains as straight lines without querying rail lines.
    #[arg(long = ARG_SKIP_RAIL)]
    #[serde(default)]
    pub(crate) skip_rail: bool,
    /// Share one cached path per endpoint pair across transport modes.
    #[arg(long = ARG_SHARED_ROUTE_KEYS)]
    #[serde(default)]
    pub(crate) shared_route_keys: bool,
}

impl AssembleArgs {
    pub(crate) fn into_config(self) -> Result<AssembleConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        AssembleConfig::try_from(merged)
    }
}

/// Resolved `assemble` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AssembleConfig {
    /// Path to the JSON trip.
    pub(crate) trip_path: Utf8PathBuf,
    /// Directory holding the cache files.
    pub(crate) cache_dir: Utf8PathBuf,
    pub(crate) nominatim_url: String,
    pub(crate) osrm_url: String,
    /// Overpass endpoint, absent when rail lookups are disabled.
    pub(crate) overpass_url: Option<String>,
    pub(crate) user_agent: String,
    pub(crate) timeout: Duration,
    pub(crate) geocode_spacing: Duration,
    pub(crate) keying: RouteKeying,
}

impl AssembleConfig {
    fn http_config(&self, base_url: &str) -> HttpServiceConfig {
        HttpServiceConfig::new(base_url)
            .with_timeout(self.timeout)
            .with_user_agent(self.user_agent.clone())
    }
}

impl TryFrom<AssembleArgs> for AssembleConfig {
    type Error = CliError;

    fn try_from(args: AssembleArgs) -> Result<Self, Self::Error> {
        let trip_path = args.trip_path.ok_or(CliError::MissingPositional {
            field: ARG_TRIP,
            value_name: TRIP_VALUE_NAME,
            env: ENV_TRIP,
        })?;

        let timeout_secs = args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(CliError::InvalidArgument {
                field: ARG_TIMEOUT_SECS,
                reason: "must be at least one second".to_owned(),
            });
        }
        let geocode_spacing = args
            .geocode_spacing_ms
            .map_or(DEFAULT_CALL_SPACING, Duration::from_millis);

        let overpass_url = if args.skip_rail {
            None
        } else {
            Some(
                args.overpass_url
                    .unwrap_or_else(|| DEFAULT_OVERPASS_URL.to_owned()),
            )
        };
        let keying = if args.shared_route_keys {
            RouteKeying::SharedPath
        } else {
            RouteKeying::PerMode
        };

        Ok(Self {
            trip_path,
            cache_dir: args
                .cache_dir
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CACHE_DIR)),
            nominatim_url: args
                .nominatim_url
                .unwrap_or_else(|| DEFAULT_NOMINATIM_URL.to_owned()),
            osrm_url: args
                .osrm_url
                .unwrap_or_else(|| DEFAULT_OSRM_URL.to_owned()),
            overpass_url,
            user_agent: args
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
            timeout: Duration::from_secs(timeout_secs),
            geocode_spacing,
            keying,
        })
    }
}

/// External services needed to assemble a trip.
pub(crate) struct Services {
    pub(crate) geocoder: Arc<dyn Geocoder>,
    pub(crate) routing: Arc<dyn RoutingService>,
    pub(crate) map_data: Option<Arc<dyn MapDataService>>,
    pub(crate) store: Arc<dyn DurableStore>,
}

/// Builds the services for the current assemble invocation.
pub(crate) trait ServiceFactory {
    fn build(&self, config: &AssembleConfig) -> Result<Services, CliError>;
}

/// Production wiring: HTTP adapters and a file-backed store.
pub(crate) struct HttpServiceFactory;

impl ServiceFactory for HttpServiceFactory {
    fn build(&self, config: &AssembleConfig) -> Result<Services, CliError> {
        tripgeo_fs::ensure_dir(&config.cache_dir).map_err(|source| {
            CliError::PrepareCacheDir {
                path: config.cache_dir.clone(),
                source,
            }
        })?;

        let geocoder = NominatimGeocoder::with_config(config.http_config(&config.nominatim_url))
            .map_err(|source| CliError::BuildService {
                service: "Nominatim",
                base_url: config.nominatim_url.clone(),
                source,
            })?;
        let routing = OsrmRoutingService::with_config(config.http_config(&config.osrm_url))
            .map_err(|source| CliError::BuildService {
                service: "OSRM",
                base_url: config.osrm_url.clone(),
                source,
            })?;
        let map_data = match &config.overpass_url {
            Some(url) => {
                let rail = OverpassRailLines::with_config(config.http_config(url)).map_err(
                    |source| CliError::BuildService {
                        service: "Overpass",
                        base_url: url.clone(),
                        source,
                    },
                )?;
                Some(Arc::new(rail) as Arc<dyn MapDataService>)
            }
            None => None,
        };

        Ok(Services {
            geocoder: Arc::new(geocoder),
            routing: Arc::new(routing),
            map_data,
            store: Arc::new(FileStore::new(config.cache_dir.clone())),
        })
    }
}

pub(super) fn run_assemble(args: AssembleArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_assemble_with(args, &HttpServiceFactory, &mut stdout)
}

pub(super) fn run_assemble_with(
    args: AssembleArgs,
    factory: &dyn ServiceFactory,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let trip = load_trip(&config.trip_path)?;
    let services = factory.build(&config)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let geometry = runtime.block_on(assemble_trip(&config, services, &trip));
    write_geometry(writer, &geometry)
}

async fn assemble_trip(config: &AssembleConfig, services: Services, trip: &Trip) -> TripGeometry {
    info!(
        "assembling trip {} ({} events) with caches in {}",
        trip.id,
        trip.events.len(),
        config.cache_dir
    );
    let places = PersistentCache::load(Arc::clone(&services.store), LOCATION_NAMESPACE).await;
    let routes = PersistentCache::load(services.store, ROUTE_NAMESPACE).await;

    let resolver = LocationResolver::new(
        services.geocoder,
        Arc::new(places),
        Arc::new(FixedDelayLimiter::new(config.geocode_spacing)),
    );
    let mut synthesizer = RouteSynthesizer::new(services.routing, Arc::new(routes))
        .with_config(SynthesizerConfig::default().with_keying(config.keying));
    if let Some(map_data) = services.map_data {
        synthesizer = synthesizer.with_map_data(map_data);
    }

    TripGeoAssembler::new(resolver, synthesizer)
        .assemble(trip)
        .await
}

/// Loads a JSON-encoded [`Trip`] from disk.
pub(super) fn load_trip(path: &Utf8Path) -> Result<Trip, CliError> {
    let raw = tripgeo_fs::read_if_exists(path)
        .map_err(|source| CliError::ReadTrip {
            path: path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| CliError::MissingTripFile {
            path: path.to_path_buf(),
        })?;
    serde_json::from_str(&raw).map_err(|source| CliError::ParseTrip {
        path: path.to_path_buf(),
        source,
    })
}

fn write_geometry(writer: &mut dyn Write, geometry: &TripGeometry) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(geometry).map_err(CliError::SerializeGeometry)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
