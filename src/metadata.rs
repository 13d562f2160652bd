//! Fetching the location catalog from the Resource Manager metadata service.
//!
//! Every Azure cloud publishes a document at
//! `https://<resource-manager-host>/metadata/endpoints` listing each cloud's
//! endpoint together with the locations it supports. Only the entry
//! describing the host we asked is used.
//!
//! Fetching is best-effort. Callers are expected to treat any error as
//! "enhanced validation unavailable" rather than as a failure.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::environment::PUBLIC_CLOUD_NAME;
use crate::error::LocationError;

/// API version sent to the metadata endpoint.
pub const METADATA_API_VERSION: &str = "2018-01-01";

/// Default time allowed for the metadata request.
pub const DEFAULT_METADATA_TIMEOUT: Duration = Duration::from_secs(30);

/// Location tokens the metadata service reports transposed, paired with the
/// token Resource Manager actually accepts.
const INDIA_LOCATION_FIXES: [(&str, &str); 3] = [
    ("indiacentral", "centralindia"),
    ("indiasouth", "southindia"),
    ("indiawest", "westindia"),
];

/// A source of supported locations for a cloud endpoint.
///
/// [`MetadataClient`] is the production implementation. Startup code takes
/// a `&dyn LocationSource` so tests can substitute their own.
#[async_trait::async_trait]
pub trait LocationSource: Send + Sync {
    /// Return the catalog for `endpoint`, or `None` if the endpoint is not
    /// described by the source.
    async fn supported_locations(
        &self,
        endpoint: &str,
        cloud_name: &str,
    ) -> Result<Option<Vec<String>>, LocationError>;
}

#[derive(Debug, Deserialize)]
struct MetadataResponse {
    #[serde(rename = "cloudEndpoint", default)]
    cloud_endpoint: BTreeMap<String, CloudEndpoint>,
}

#[derive(Debug, Deserialize)]
struct CloudEndpoint {
    #[serde(default)]
    endpoint: String,
    #[serde(default)]
    locations: Option<Vec<String>>,
}

/// HTTP client for the metadata service.
///
/// The underlying `reqwest` client honours `HTTPS_PROXY`, `HTTP_PROXY` and
/// `NO_PROXY`.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    client: reqwest::Client,
    scheme: String,
    timeout: Duration,
}

impl MetadataClient {
    /// Create a client using HTTPS and the default timeout.
    pub fn new() -> Result<Self, LocationError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            scheme: "https".to_string(),
            timeout: DEFAULT_METADATA_TIMEOUT,
        })
    }

    /// Set the time allowed for the whole request, including the body.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the URL scheme used to reach the metadata host.
    ///
    /// Production traffic always uses `https`; plain `http` is only useful
    /// against a local test server.
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// The configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build the metadata URL for a bare host.
    pub fn metadata_url(&self, host: &str) -> String {
        format!(
            "{}://{}/metadata/endpoints?api-version={}",
            self.scheme, host, METADATA_API_VERSION
        )
    }

    /// Fetch the supported locations for a Resource Manager endpoint.
    ///
    /// Returns `Ok(None)` when the response has no entry for the endpoint.
    /// For the public cloud the transposed India location names are
    /// corrected before returning.
    #[instrument(skip(self))]
    pub async fn fetch_supported_locations(
        &self,
        endpoint: &str,
        cloud_name: &str,
    ) -> Result<Option<Vec<String>>, LocationError> {
        let host = bare_host(endpoint);
        let url = self.metadata_url(host);
        debug!(url = %url, "Fetching cloud metadata");

        let body = tokio::time::timeout(self.timeout, self.get(&url))
            .await
            .map_err(|_| LocationError::Timeout(self.timeout))??;

        let response: MetadataResponse = serde_json::from_slice(&body)?;
        let locations = select_locations(response, host);

        match &locations {
            Some(found) => debug!(count = found.len(), "Found supported locations"),
            None => debug!(host = %host, "No metadata entry matches endpoint"),
        }

        if cloud_name == PUBLIC_CLOUD_NAME {
            return Ok(locations.map(|found| correct_india_locations(&found)));
        }
        Ok(locations)
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, LocationError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LocationError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait::async_trait]
impl LocationSource for MetadataClient {
    async fn supported_locations(
        &self,
        endpoint: &str,
        cloud_name: &str,
    ) -> Result<Option<Vec<String>>, LocationError> {
        self.fetch_supported_locations(endpoint, cloud_name).await
    }
}

/// Strip the `https://` scheme and any trailing slash from an endpoint.
pub fn bare_host(endpoint: &str) -> &str {
    endpoint
        .strip_prefix("https://")
        .unwrap_or(endpoint)
        .trim_end_matches('/')
}

fn select_locations(response: MetadataResponse, host: &str) -> Option<Vec<String>> {
    response
        .cloud_endpoint
        .into_values()
        .find(|entry| entry.endpoint.eq_ignore_ascii_case(host))
        .and_then(|entry| entry.locations)
}

/// Replace the India location names the metadata service reports
/// transposed (`indiacentral` and friends) with the names Resource Manager
/// accepts. Other entries are copied unchanged.
pub fn correct_india_locations(locations: &[String]) -> Vec<String> {
    locations
        .iter()
        .map(|location| {
            INDIA_LOCATION_FIXES
                .iter()
                .find(|(wrong, _)| location == wrong)
                .map(|(_, right)| right.to_string())
                .unwrap_or_else(|| location.clone())
        })
        .collect()
}
