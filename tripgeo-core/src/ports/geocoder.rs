//! Driven port for turning free text into coordinates.

use async_trait::async_trait;

use super::define_port_error;

/// One candidate returned by a geocoder.
///
/// Coordinates are unvalidated; the resolver checks them before use.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeHit {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Name the service gave the place.
    pub display_name: String,
}

define_port_error! {
    /// Errors surfaced while geocoding.
    pub enum GeocodeError {
        /// The request never produced a response.
        Network { message: String } => "geocoder network error: {message}",
        /// The request took too long.
        Timeout { message: String } => "geocoder timed out: {message}",
        /// The service answered with a non-success status.
        Http { status: u16, message: String } => "geocoder returned HTTP {status}: {message}",
        /// The body could not be decoded.
        Parse { message: String } => "geocoder response was malformed: {message}",
    }
}

/// Look up places matching a query.
///
/// Implementations return candidates best-first. An empty vector means the
/// service knows nothing matching the query.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Search for `query`.
    async fn search(&self, query: &str) -> Result<Vec<GeocodeHit>, GeocodeError>;
}
