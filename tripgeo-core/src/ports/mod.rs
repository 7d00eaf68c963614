//! Ports the core drives: geocoding, road routing, rail map data and a
//! durable key/value store for the caches.
//!
//! Every port is an `async_trait` object-safe trait that is `Send + Sync`, so
//! adapters can be shared behind `Arc<dyn ...>`.

mod macros;
pub(crate) use macros::define_port_error;

mod geocoder;
mod map_data;
mod routing;
mod store;

pub use geocoder::{GeocodeError, GeocodeHit, Geocoder};
pub use map_data::{MapDataError, MapDataService};
pub use routing::{RoutePath, RoutingError, RoutingService};
pub use store::{DurableStore, StoreError};
