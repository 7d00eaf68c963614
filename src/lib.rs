//! Facade crate for tripgeo, which turns trip itineraries into map geometry.
//!
//! This crate re-exports the core domain types and pipeline. The HTTP
//! adapters for Nominatim, OSRM and Overpass, along with the file-backed
//! cache store, are exposed behind the default `http` feature.

#![forbid(unsafe_code)]

pub use tripgeo_core::{
    Bounds, Coordinate, CoordinateError, DurableStore, EventKind, EventKindTag, EventStatus,
    FixedDelayLimiter, GeocodeError, GeocodeHit, Geocoder, LocationResolver, LocationRole,
    LookupKey, MapDataError, MapDataService, PersistentCache, Place, RateLimiter,
    ResolvedLocation, RouteInfo, RouteKeying, RouteMode, RouteRequest, RouteSynthesizer,
    RoutingError, RoutingService, StoreError, SynthesizerConfig, Trip, TripEvent,
    TripGeoAssembler, TripGeometry, Unlimited,
};

#[cfg(feature = "http")]
pub use tripgeo_data::{
    FileStore, HttpServiceConfig, NominatimGeocoder, OsrmRoutingService, OverpassRailLines,
    ProviderBuildError,
};
