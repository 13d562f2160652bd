//! Error types for location handling.

use std::time::Duration;

use thiserror::Error;

/// Errors raised while resolving, fetching or caching location data.
#[derive(Debug, Error)]
pub enum LocationError {
    /// The HTTP request to the metadata service failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The metadata service answered with a non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status {
        /// The HTTP status code returned.
        status: u16,
        /// The URL that was requested.
        url: String,
    },

    /// The metadata response could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The metadata request did not complete in time.
    #[error("Deadline exceeded after {0:?}")]
    Timeout(Duration),

    /// The location cache has already been populated.
    #[error("Location cache already populated")]
    CacheAlreadyPopulated,

    /// The named cloud environment is not known.
    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),

    /// A resource ID could not be parsed.
    #[error("Invalid resource ID: {0}")]
    InvalidResourceId(String),

    /// A configuration value is invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl LocationError {
    /// Get the error message as a string.
    pub fn message(&self) -> String {
        match self {
            Self::Http(err) => err.to_string(),
            Self::Status { status, url } => format!("status {} from {}", status, url),
            Self::Decode(err) => err.to_string(),
            Self::Timeout(timeout) => format!("timed out after {:?}", timeout),
            Self::CacheAlreadyPopulated => "cache already populated".to_string(),
            Self::UnknownEnvironment(msg) => msg.clone(),
            Self::InvalidResourceId(msg) => msg.clone(),
            Self::Configuration(msg) => msg.clone(),
        }
    }

    /// Whether this error came from the metadata fetch.
    ///
    /// Fetch errors are never fatal: callers degrade to permissive
    /// validation instead of surfacing them.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Status { .. } | Self::Decode(_) | Self::Timeout(_)
        )
    }
}

/// A user-facing problem with a location value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationValidationError {
    /// The value was empty, or empty once normalized.
    #[error("{field} must not be empty")]
    Empty {
        /// The field being validated.
        field: String,
    },

    /// The value is not in the catalog for the current cloud.
    #[error("{location} was not found in the list of supported Azure Locations: {}", .supported.join(","))]
    Unsupported {
        /// The normalized value that was rejected.
        location: String,
        /// The raw catalog, as returned by the metadata service.
        supported: Vec<String>,
    },

    /// The value was not a string.
    #[error("expected {field} to be string")]
    WrongType {
        /// The field being validated.
        field: String,
    },
}
