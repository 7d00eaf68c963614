//! Driven port for road routing between two points.

use async_trait::async_trait;

use super::define_port_error;
use crate::Coordinate;

/// A road path as reported by a routing service.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePath {
    /// Path geometry from start to end.
    pub coordinates: Vec<Coordinate>,
    /// Travel time in seconds.
    pub duration_seconds: f64,
    /// Length in metres.
    pub distance_meters: f64,
}

define_port_error! {
    /// Errors surfaced while routing.
    pub enum RoutingError {
        /// The request never produced a response.
        Network { message: String } => "routing network error: {message}",
        /// The request took too long.
        Timeout { message: String } => "routing timed out: {message}",
        /// The service answered with a non-success status.
        Http { status: u16, message: String } => "routing returned HTTP {status}: {message}",
        /// The body could not be decoded.
        Parse { message: String } => "routing response was malformed: {message}",
        /// The service found no route between the points.
        NoRoute { code: String } => "no route found ({code})",
        /// The service rejected the request with its own error code.
        Service { code: String, message: String } => "routing service error {code}: {message}",
    }
}

/// Compute a road route between two points.
#[async_trait]
pub trait RoutingService: Send + Sync {
    /// Route from `start` to `end`.
    async fn route(&self, start: Coordinate, end: Coordinate) -> Result<RoutePath, RoutingError>;
}
