//! Core domain types and pipeline for turning trip itineraries into map
//! geometry.
//!
//! A [`Trip`] is a list of [`TripEvent`]s. The [`TripGeoAssembler`] resolves
//! each event to one or two [`ResolvedLocation`]s with a [`LocationResolver`],
//! then draws a [`RouteInfo`] between consecutive confirmed locations with a
//! [`RouteSynthesizer`]. External services sit behind the traits in
//! [`ports`]; both stages cache their answers in a [`PersistentCache`].

pub mod assembler;
pub mod cache;
pub mod coordinate;
pub mod distance;
pub mod location;
pub mod ports;
pub mod rate_limit;
pub mod resolver;
pub mod route;
pub mod synthesizer;
#[doc(hidden)]
pub mod test_support;
pub mod trip;

pub use assembler::{TripGeoAssembler, TripGeometry};
pub use cache::{LOCATION_NAMESPACE, LookupKey, PersistentCache, ROUTE_NAMESPACE};
pub use coordinate::{Bounds, Coordinate, CoordinateError};
pub use location::{LocationRole, Place, ResolvedLocation};
pub use ports::{
    DurableStore, GeocodeError, GeocodeHit, Geocoder, MapDataError, MapDataService, RoutePath,
    RoutingError, RoutingService, StoreError,
};
pub use rate_limit::{DEFAULT_CALL_SPACING, FixedDelayLimiter, RateLimiter, Unlimited};
pub use resolver::LocationResolver;
pub use route::{RouteInfo, RouteMode, RouteRequest};
pub use synthesizer::{RouteKeying, RouteSynthesizer, SynthesizerConfig};
pub use trip::{EventKind, EventKindTag, EventStatus, LocationQuery, Schedule, Trip, TripEvent};
