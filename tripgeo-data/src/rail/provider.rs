//! [`MapDataService`] implementation querying Overpass for rail ways.

use async_trait::async_trait;
use reqwest::Client;
use tripgeo_core::{Bounds, Coordinate, MapDataError, MapDataService};

use super::overpass::OverpassResponse;
use crate::http::{HttpServiceConfig, ProviderBuildError, TransportFailure, fetch_body};

/// Public Overpass interpreter endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Server-side timeout embedded in each query.
pub const DEFAULT_QUERY_TIMEOUT_SECS: u32 = 25;

impl From<TransportFailure> for MapDataError {
    fn from(failure: TransportFailure) -> Self {
        match failure {
            TransportFailure::Timeout(message) => Self::timeout(message),
            TransportFailure::Status { status, message } => Self::http(status, message),
            TransportFailure::Network(message) => Self::network(message),
        }
    }
}

/// Rail lines inside a region, fetched with `way["railway"="rail"]`.
///
/// Unlike the other adapters, the configured URL is the full interpreter
/// endpoint rather than a base.
#[derive(Debug)]
pub struct OverpassRailLines {
    client: Client,
    config: HttpServiceConfig,
    query_timeout_secs: u32,
}

impl OverpassRailLines {
    /// Adapter for the interpreter at `endpoint` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unusable or the client fails to build.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpServiceConfig::new(endpoint))
    }

    /// Adapter with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unusable or the client fails to build.
    pub fn with_config(config: HttpServiceConfig) -> Result<Self, ProviderBuildError> {
        let client = config.build_client()?;
        Ok(Self {
            client,
            config,
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
        })
    }

    /// Override the server-side query timeout.
    #[must_use]
    pub fn with_query_timeout(mut self, seconds: u32) -> Self {
        self.query_timeout_secs = seconds.max(1);
        self
    }
}

/// Overpass QL for rail ways in `bounds`, in south,west,north,east order.
fn build_rail_query(bounds: Bounds, timeout_secs: u32) -> Result<String, MapDataError> {
    validate_bounds(bounds)?;
    Ok(format!(
        "[out:json][timeout:{timeout_secs}];\nway[\"railway\"=\"rail\"]({s},{w},{n},{e});\nout geom;",
        s = bounds.min.latitude,
        w = bounds.min.longitude,
        n = bounds.max.latitude,
        e = bounds.max.longitude,
    ))
}

fn validate_bounds(bounds: Bounds) -> Result<(), MapDataError> {
    let Bounds { min, max } = bounds;
    let corners_valid = [min, max]
        .into_iter()
        .all(|c| Coordinate::new(c.latitude, c.longitude).is_ok());
    if !corners_valid {
        return Err(MapDataError::invalid_bounds(
            "corners must be valid coordinates",
        ));
    }
    if min.latitude >= max.latitude || min.longitude >= max.longitude {
        return Err(MapDataError::invalid_bounds(
            "min must lie strictly south-west of max",
        ));
    }
    Ok(())
}

#[async_trait]
impl MapDataService for OverpassRailLines {
    async fn lines_near(&self, bounds: Bounds) -> Result<Vec<Vec<Coordinate>>, MapDataError> {
        let query = build_rail_query(bounds, self.query_timeout_secs)?;
        let endpoint = self.config.base_url.as_str();
        let request = self
            .client
            .post(endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("data", query)]);
        let body = fetch_body(request, endpoint).await?;
        let response: OverpassResponse = serde_json::from_slice(&body)
            .map_err(|err| MapDataError::parse(format!("invalid Overpass JSON: {err}")))?;
        response.into_lines()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn bounds(s: f64, w: f64, n: f64, e: f64) -> Bounds {
        Bounds {
            min: Coordinate {
                latitude: s,
                longitude: w,
            },
            max: Coordinate {
                latitude: n,
                longitude: e,
            },
        }
    }

    #[rstest]
    fn query_lists_bbox_south_west_north_east() {
        let query = build_rail_query(bounds(45.7, 2.3, 48.9, 4.9), 25).expect("query builds");
        assert_eq!(
            query,
            "[out:json][timeout:25];\nway[\"railway\"=\"rail\"](45.7,2.3,48.9,4.9);\nout geom;"
        );
    }

    #[rstest]
    #[case(bounds(48.0, 2.0, 48.0, 3.0))]
    #[case(bounds(49.0, 2.0, 48.0, 3.0))]
    #[case(bounds(48.0, 2.0, 95.0, 3.0))]
    fn rejects_degenerate_or_invalid_bounds(#[case] region: Bounds) {
        assert!(matches!(
            build_rail_query(region, 25),
            Err(MapDataError::InvalidBounds { .. })
        ));
    }
}
