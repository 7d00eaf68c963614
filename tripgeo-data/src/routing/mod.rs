//! Road routing through an OSRM server.
//!
//! [`OsrmRoutingService`] implements [`tripgeo_core::RoutingService`] with the
//! OSRM Route API, requesting the full GeoJSON geometry for each leg.
//!
//! # Example
//!
//! ```no_run
//! use tripgeo_core::{Coordinate, RoutingService};
//! use tripgeo_data::routing::OsrmRoutingService;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let service = OsrmRoutingService::new("http://localhost:5000")?;
//! let paris = Coordinate::new(48.8566, 2.3522)?;
//! let lyon = Coordinate::new(45.7640, 4.8357)?;
//! let path = service.route(paris, lyon).await?;
//! println!("{} km", path.distance_meters / 1_000.0);
//! # Ok(())
//! # }
//! ```

mod osrm;
mod provider;

pub use provider::{DEFAULT_OSRM_URL, OsrmRoutingService};
