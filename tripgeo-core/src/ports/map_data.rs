//! Driven port for querying map features, used to draw trains along rails.

use async_trait::async_trait;

use super::define_port_error;
use crate::{Bounds, Coordinate};

define_port_error! {
    /// Errors surfaced while querying map data.
    pub enum MapDataError {
        /// The request never produced a response.
        Network { message: String } => "map data network error: {message}",
        /// The request took too long.
        Timeout { message: String } => "map data timed out: {message}",
        /// The service answered with a non-success status.
        Http { status: u16, message: String } => "map data returned HTTP {status}: {message}",
        /// The body could not be decoded.
        Parse { message: String } => "map data response was malformed: {message}",
        /// The requested region was rejected before any call.
        InvalidBounds { message: String } => "invalid bounds: {message}",
    }
}

/// Fetch line features inside a region.
#[async_trait]
pub trait MapDataService: Send + Sync {
    /// Rail lines intersecting `bounds`, each as an ordered polyline.
    async fn lines_near(&self, bounds: Bounds) -> Result<Vec<Vec<Coordinate>>, MapDataError>;
}
