//! Adapters connecting `tripgeo-core` ports to real services.
//!
//! Responsibilities:
//! - Speak the wire formats of Nominatim, OSRM and Overpass.
//! - Map transport failures onto the port error types.
//! - Persist caches to disk.
//!
//! Boundaries:
//! - No trip logic; that lives in `tripgeo-core`.
//! - Blocking filesystem calls run on Tokio's blocking pool.
//!
//! Invariants:
//! - Adapters are `Send + Sync` and hold no global state.

pub mod geocoding;
mod http;
pub mod rail;
pub mod routing;
pub mod store;

pub use geocoding::{DEFAULT_NOMINATIM_URL, NominatimGeocoder};
pub use http::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpServiceConfig, ProviderBuildError};
pub use rail::{DEFAULT_OVERPASS_URL, OverpassRailLines};
pub use routing::{DEFAULT_OSRM_URL, OsrmRoutingService};
pub use store::FileStore;
