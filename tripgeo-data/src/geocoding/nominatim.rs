//! Nominatim `/search` response types.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Search/>

use serde::Deserialize;
use tripgeo_core::{GeocodeError, GeocodeHit};

/// One place from a `format=jsonv2` search.
///
/// Nominatim encodes coordinates as strings.
#[derive(Debug, Deserialize)]
pub struct SearchPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

impl SearchPlace {
    /// Parse the coordinate strings into a hit.
    pub fn into_hit(self) -> Result<GeocodeHit, GeocodeError> {
        let latitude = parse_degrees(&self.lat, "lat")?;
        let longitude = parse_degrees(&self.lon, "lon")?;
        Ok(GeocodeHit {
            latitude,
            longitude,
            display_name: self.display_name,
        })
    }
}

fn parse_degrees(raw: &str, field: &str) -> Result<f64, GeocodeError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|err| GeocodeError::parse(format!("{field} {raw:?} is not a number: {err}")))
}
