//! OSRM API response types for the Route service.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use serde::Deserialize;

/// OSRM Route API response.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"NoRoute"` - No route between the points
    /// - `"InvalidQuery"` - Invalid query parameters
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Alternative routes, best first.
    #[serde(default)]
    pub routes: Vec<RouteDto>,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}

/// One route with `geometries=geojson`.
#[derive(Debug, Deserialize)]
pub struct RouteDto {
    /// Travel time in seconds.
    pub duration: f64,
    /// Length in metres.
    pub distance: f64,
    /// Line geometry.
    pub geometry: LineStringDto,
}

/// GeoJSON `LineString`; positions are `[lon, lat]`.
#[derive(Debug, Deserialize)]
pub struct LineStringDto {
    pub coordinates: Vec<[f64; 2]>,
}
