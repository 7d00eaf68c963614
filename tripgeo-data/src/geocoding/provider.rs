//! [`Geocoder`] implementation backed by Nominatim.

use async_trait::async_trait;
use reqwest::Client;
use tripgeo_core::{GeocodeError, GeocodeHit, Geocoder};
use url::Url;

use super::nominatim::SearchPlace;
use crate::http::{HttpServiceConfig, ProviderBuildError, TransportFailure, fetch_body};

/// Public OpenStreetMap Nominatim instance.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

impl From<TransportFailure> for GeocodeError {
    fn from(failure: TransportFailure) -> Self {
        match failure {
            TransportFailure::Timeout(message) => Self::timeout(message),
            TransportFailure::Status { status, message } => Self::http(status, message),
            TransportFailure::Network(message) => Self::network(message),
        }
    }
}

/// Geocoder that asks Nominatim for the single best match.
#[derive(Debug)]
pub struct NominatimGeocoder {
    client: Client,
    config: HttpServiceConfig,
}

impl NominatimGeocoder {
    /// Geocoder for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unusable or the client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpServiceConfig::new(base_url))
    }

    /// Geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unusable or the client fails to build.
    pub fn with_config(config: HttpServiceConfig) -> Result<Self, ProviderBuildError> {
        let client = config.build_client()?;
        Ok(Self { client, config })
    }

    /// Build the search URL for `query`.
    ///
    /// The format is `{base_url}/search?q={query}&format=jsonv2&limit=1`.
    fn search_url(&self, query: &str) -> Result<Url, GeocodeError> {
        Url::parse_with_params(
            &format!("{}/search", self.config.trimmed_base()),
            &[("q", query), ("format", "jsonv2"), ("limit", "1")],
        )
        .map_err(|err| GeocodeError::network(format!("could not build search URL: {err}")))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<GeocodeHit>, GeocodeError> {
        let url = self.search_url(query)?;
        let label = url.to_string();
        let body = fetch_body(self.client.get(url), &label).await?;
        let places: Vec<SearchPlace> = serde_json::from_slice(&body)
            .map_err(|err| GeocodeError::parse(format!("invalid Nominatim JSON: {err}")))?;
        places.into_iter().map(SearchPlace::into_hit).collect()
    }
}
