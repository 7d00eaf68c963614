//! [`RoutingService`] implementation using OSRM's Route API.

use async_trait::async_trait;
use reqwest::Client;
use tripgeo_core::{Coordinate, RoutePath, RoutingError, RoutingService};

use super::osrm::RouteResponse;
use crate::http::{HttpServiceConfig, ProviderBuildError, TransportFailure, fetch_body};

/// Public OSRM demo server.
pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";

impl From<TransportFailure> for RoutingError {
    fn from(failure: TransportFailure) -> Self {
        match failure {
            TransportFailure::Timeout(message) => Self::timeout(message),
            TransportFailure::Status { status, message } => Self::http(status, message),
            TransportFailure::Network(message) => Self::network(message),
        }
    }
}

/// Driving routes from an OSRM server.
#[derive(Debug)]
pub struct OsrmRoutingService {
    client: Client,
    config: HttpServiceConfig,
}

impl OsrmRoutingService {
    /// Service for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unusable or the client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpServiceConfig::new(base_url))
    }

    /// Service with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unusable or the client fails to build.
    pub fn with_config(config: HttpServiceConfig) -> Result<Self, ProviderBuildError> {
        let client = config.build_client()?;
        Ok(Self { client, config })
    }

    /// Build the Route API URL.
    ///
    /// The format is
    /// `{base_url}/route/v1/driving/{lon},{lat};{lon},{lat}?overview=full&geometries=geojson`.
    fn build_route_url(&self, start: Coordinate, end: Coordinate) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
            self.config.trimmed_base(),
            start.longitude,
            start.latitude,
            end.longitude,
            end.latitude
        )
    }

    /// Convert an OSRM response to a [`RoutePath`].
    fn convert_response(response: RouteResponse) -> Result<RoutePath, RoutingError> {
        if !response.is_ok() {
            if response.code == "NoRoute" {
                return Err(RoutingError::no_route(response.code));
            }
            return Err(RoutingError::service(
                response.code,
                response.message.unwrap_or_default(),
            ));
        }
        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| RoutingError::no_route("Ok"))?;
        let coordinates = route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| {
                Coordinate::new(lat, lon)
                    .map_err(|err| RoutingError::parse(format!("bad route vertex: {err}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if !(route.duration.is_finite() && route.distance.is_finite()) {
            return Err(RoutingError::parse("route metrics are not finite"));
        }
        Ok(RoutePath {
            coordinates,
            duration_seconds: route.duration,
            distance_meters: route.distance,
        })
    }
}

#[async_trait]
impl RoutingService for OsrmRoutingService {
    async fn route(&self, start: Coordinate, end: Coordinate) -> Result<RoutePath, RoutingError> {
        let url = self.build_route_url(start, end);
        let body = fetch_body(self.client.get(&url), &url).await?;
        let response: RouteResponse = serde_json::from_slice(&body)
            .map_err(|err| RoutingError::parse(format!("invalid OSRM JSON: {err}")))?;
        Self::convert_response(response)
    }
}
