//! Shared HTTP plumbing for the service adapters.
//!
//! Every adapter is configured with an [`HttpServiceConfig`] and builds its
//! `reqwest` client the same way. Transport failures are classified once
//! here and each adapter maps the result onto its own port error.

use std::time::Duration;

use log::debug;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

/// Default user agent for outbound requests.
pub const DEFAULT_USER_AGENT: &str = "tripgeo/0.1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error returned when an adapter cannot be constructed.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The base URL is not a usable HTTP(S) URL.
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Endpoint and client settings for one external service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServiceConfig {
    /// Base URL of the service, without a trailing path component.
    pub base_url: String,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl HttpServiceConfig {
    /// Configuration for `base_url` with default timeout and user agent.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The base URL without trailing slashes.
    #[must_use]
    pub fn trimmed_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Build the client and check the base URL.
    pub(crate) fn build_client(&self) -> Result<Client, ProviderBuildError> {
        let parsed = Url::parse(&self.base_url).map_err(|err| ProviderBuildError::InvalidUrl {
            url: self.base_url.clone(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProviderBuildError::InvalidUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }
        Client::builder()
            .user_agent(&self.user_agent)
            .connect_timeout(self.timeout)
            .timeout(self.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)
    }
}

/// Transport-level failure, before it is mapped onto a port error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TransportFailure {
    Timeout(String),
    Status { status: u16, message: String },
    Network(String),
}

impl TransportFailure {
    /// Classify a `reqwest` error.
    pub(crate) fn from_reqwest(error: &reqwest::Error, url: &str) -> Self {
        if error.is_timeout() {
            return Self::Timeout(format!("{url}: {error}"));
        }
        if let Some(status) = error.status() {
            return Self::Status {
                status: status.as_u16(),
                message: format!("{url}: {error}"),
            };
        }
        Self::Network(format!("{url}: {error}"))
    }

    /// Classify a non-success response.
    pub(crate) fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let preview = body_preview(body);
        let message = if preview.is_empty() {
            format!("status {}", status.as_u16())
        } else {
            format!("status {}: {preview}", status.as_u16())
        };
        match status {
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Self::Timeout(message),
            _ => Self::Status {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// Collapse whitespace and cap the length of an error body for logging.
pub(crate) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

/// Send `request` and return the body, or the classified failure.
pub(crate) async fn fetch_body(
    request: reqwest::RequestBuilder,
    url: &str,
) -> Result<Vec<u8>, TransportFailure> {
    let response = request
        .send()
        .await
        .map_err(|err| TransportFailure::from_reqwest(&err, url))?;
    let status = response.status();
    debug!("{url} answered {status}");
    let body = response
        .bytes()
        .await
        .map_err(|err| TransportFailure::from_reqwest(&err, url))?;
    if !status.is_success() {
        return Err(TransportFailure::from_status(status, body.as_ref()));
    }
    Ok(body.to_vec())
}
