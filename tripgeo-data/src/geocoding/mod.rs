//! Geocoding through a Nominatim-compatible search API.
//!
//! ```no_run
//! use std::time::Duration;
//! use tripgeo_core::Geocoder;
//! use tripgeo_data::geocoding::NominatimGeocoder;
//! use tripgeo_data::HttpServiceConfig;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpServiceConfig::new("https://nominatim.openstreetmap.org")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-trip-planner/1.0");
//! let geocoder = NominatimGeocoder::with_config(config)?;
//! let hits = geocoder.search("Louvre, Paris").await?;
//! println!("{hits:?}");
//! # Ok(())
//! # }
//! ```

mod nominatim;
mod provider;

pub use provider::{DEFAULT_NOMINATIM_URL, NominatimGeocoder};
