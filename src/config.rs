//! Provider configuration.
//!
//! Configuration is read once at startup, either deserialized from the
//! provider block or taken from the process environment, and then passed
//! explicitly to everything that needs it.
//!
//! # Environment Variables
//!
//! - `ARM_ENVIRONMENT`: cloud name (`public`, `china`, `usgovernment`, `german`)
//! - `ARM_PROVIDER_ENHANCED_VALIDATION`: `true` enables catalog-backed location validation
//! - `ARM_METADATA_HOSTNAME`: host to query for cloud metadata instead of the environment's endpoint
//! - `ARM_METADATA_TIMEOUT_SECONDS`: time allowed for the metadata request

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::environment::CloudEnvironment;
use crate::error::LocationError;
use crate::metadata::DEFAULT_METADATA_TIMEOUT;

/// Environment variable naming the cloud.
pub const ENV_ENVIRONMENT: &str = "ARM_ENVIRONMENT";
/// Environment variable enabling enhanced validation.
pub const ENV_ENHANCED_VALIDATION: &str = "ARM_PROVIDER_ENHANCED_VALIDATION";
/// Environment variable overriding the metadata host.
pub const ENV_METADATA_HOSTNAME: &str = "ARM_METADATA_HOSTNAME";
/// Environment variable setting the metadata timeout in seconds.
pub const ENV_METADATA_TIMEOUT_SECONDS: &str = "ARM_METADATA_TIMEOUT_SECONDS";

/// Settings that control location handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Name of the cloud environment.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Whether to validate locations against the fetched catalog.
    #[serde(default)]
    pub enhanced_validation: bool,

    /// Host to query for metadata instead of the environment's Resource
    /// Manager endpoint.
    #[serde(default)]
    pub metadata_host: Option<String>,

    /// Time allowed for the metadata request.
    ///
    /// Written as whole seconds under `metadata_timeout_secs`; zero is
    /// rejected.
    #[serde(
        rename = "metadata_timeout_secs",
        default = "default_metadata_timeout",
        with = "timeout_secs"
    )]
    pub metadata_timeout: Duration,
}

fn default_environment() -> String {
    "public".to_string()
}

fn default_metadata_timeout() -> Duration {
    DEFAULT_METADATA_TIMEOUT
}

fn parse_timeout_secs(secs: u64) -> Result<Duration, String> {
    if secs == 0 {
        return Err("metadata timeout must be at least one second".to_string());
    }
    Ok(Duration::from_secs(secs))
}

mod timeout_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(timeout: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(timeout.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        super::parse_timeout_secs(secs).map_err(serde::de::Error::custom)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            enhanced_validation: false,
            metadata_host: None,
            metadata_timeout: default_metadata_timeout(),
        }
    }
}

impl ProviderConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, LocationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LocationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_ENVIRONMENT).filter(|v| !v.is_empty()) {
            config.environment = value;
        }
        if let Some(value) = lookup(ENV_ENHANCED_VALIDATION) {
            config.enhanced_validation = value.trim().eq_ignore_ascii_case("true");
        }
        if let Some(value) = lookup(ENV_METADATA_HOSTNAME).filter(|v| !v.is_empty()) {
            config.metadata_host = Some(value);
        }
        if let Some(value) = lookup(ENV_METADATA_TIMEOUT_SECONDS) {
            let secs: u64 = value.trim().parse().map_err(|_| {
                LocationError::Configuration(format!(
                    "{} must be a whole number of seconds, got {:?}",
                    ENV_METADATA_TIMEOUT_SECONDS, value
                ))
            })?;
            config.metadata_timeout = parse_timeout_secs(secs).map_err(|msg| {
                LocationError::Configuration(format!("{}: {}", ENV_METADATA_TIMEOUT_SECONDS, msg))
            })?;
        }

        Ok(config)
    }

    /// Set the environment name.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Enable or disable enhanced validation.
    pub fn with_enhanced_validation(mut self, enabled: bool) -> Self {
        self.enhanced_validation = enabled;
        self
    }

    /// Query `host` for metadata.
    pub fn with_metadata_host(mut self, host: impl Into<String>) -> Self {
        self.metadata_host = Some(host.into());
        self
    }

    /// Set the metadata timeout. Sub-second values are kept as given.
    pub fn with_metadata_timeout(mut self, timeout: Duration) -> Self {
        self.metadata_timeout = timeout;
        self
    }

    /// The metadata timeout.
    pub fn metadata_timeout(&self) -> Duration {
        self.metadata_timeout
    }

    /// Resolve the configured cloud environment.
    pub fn cloud_environment(&self) -> Result<CloudEnvironment, LocationError> {
        CloudEnvironment::from_name(&self.environment)
    }

    /// The endpoint to fetch metadata from for `env`.
    pub fn metadata_endpoint(&self, env: CloudEnvironment) -> String {
        match &self.metadata_host {
            Some(host) => host.clone(),
            None => env.resource_manager_endpoint().to_string(),
        }
    }
}
