//! Provider startup for location handling.
//!
//! Startup resolves the cloud environment, fetches the location catalog once
//! when enhanced validation is enabled, populates the cache and returns a
//! validator sharing it. The fetch is best-effort: any failure is logged at
//! debug level and validation degrades to the permissive check.
//!
//! # Example
//!
//! ```ignore
//! use azurerm_location::{init_logging, initialize, ProviderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging();
//!
//!     let config = ProviderConfig::from_env()?;
//!     let validator = initialize(&config).await?;
//!
//!     let (_, errors) = validator.validate(&serde_json::json!("West Europe"), "location");
//!     assert!(errors.is_empty());
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::cache::LocationCache;
use crate::config::ProviderConfig;
use crate::error::LocationError;
use crate::metadata::{LocationSource, MetadataClient};
use crate::validation::LocationValidator;

/// Initialize location validation using the metadata service.
///
/// Fails only when the configuration itself is invalid (for example an
/// unknown environment name). Problems reaching the metadata service never
/// fail startup.
#[instrument(skip(config), fields(environment = %config.environment, enhanced = config.enhanced_validation))]
pub async fn initialize(config: &ProviderConfig) -> Result<LocationValidator, LocationError> {
    if !config.enhanced_validation {
        config.cloud_environment()?;
        debug!("Enhanced validation disabled, skipping metadata client");
        return build_validator(config, None);
    }

    match MetadataClient::new() {
        Ok(client) => {
            let client = client.with_timeout(config.metadata_timeout());
            initialize_with_source(config, &client).await
        },
        Err(e) => {
            warn!(error = %e, "Unable to build metadata client, enhanced validation unavailable");
            config.cloud_environment()?;
            build_validator(config, None)
        },
    }
}

/// Initialize location validation using `source` for the catalog.
pub async fn initialize_with_source(
    config: &ProviderConfig,
    source: &dyn LocationSource,
) -> Result<LocationValidator, LocationError> {
    let env = config.cloud_environment()?;

    if !config.enhanced_validation {
        debug!("Enhanced validation disabled, skipping location fetch");
        return build_validator(config, None);
    }

    let endpoint = config.metadata_endpoint(env);
    let timeout = config.metadata_timeout();
    let fetched = tokio::time::timeout(timeout, source.supported_locations(&endpoint, env.name()))
        .await
        .unwrap_or(Err(LocationError::Timeout(timeout)));

    let catalog = match fetched {
        Ok(catalog) => catalog,
        Err(e) => {
            debug!(error = %e, endpoint = %endpoint, "Unable to fetch supported locations");
            None
        },
    };

    build_validator(config, catalog)
}

fn build_validator(
    config: &ProviderConfig,
    catalog: Option<Vec<String>>,
) -> Result<LocationValidator, LocationError> {
    let cache = Arc::new(LocationCache::new());
    cache.populate(catalog)?;

    let validator = LocationValidator::new(config.enhanced_validation, cache);
    info!(
        enhanced = validator.is_enhanced(),
        "Location validation initialized"
    );
    Ok(validator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    enum Response {
        Catalog(Option<Vec<String>>),
        Unavailable,
        Hang,
    }

    struct FakeSource {
        response: Response,
        calls: AtomicUsize,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl FakeSource {
        fn new(response: Response) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl LocationSource for FakeSource {
        async fn supported_locations(
            &self,
            endpoint: &str,
            cloud_name: &str,
        ) -> Result<Option<Vec<String>>, LocationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((endpoint.to_string(), cloud_name.to_string()));

            match &self.response {
                Response::Catalog(catalog) => Ok(catalog.clone()),
                Response::Unavailable => Err(LocationError::Status {
                    status: 503,
                    url: endpoint.to_string(),
                }),
                Response::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(None)
                },
            }
        }
    }

    fn catalog() -> Option<Vec<String>> {
        Some(vec!["westeurope".to_string(), "eastus".to_string()])
    }

    #[tokio::test]
    async fn test_disabled_skips_fetch() {
        let source = FakeSource::new(Response::Catalog(catalog()));
        let config = ProviderConfig::new();

        let validator = initialize_with_source(&config, &source).await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
        assert!(!validator.is_enhanced());
        assert!(validator.cache().is_populated());
        assert!(validator.cache().supported_locations().is_none());
    }

    #[tokio::test]
    async fn test_enabled_populates_cache() {
        let source = FakeSource::new(Response::Catalog(catalog()));
        let config = ProviderConfig::new().with_enhanced_validation(true);

        let validator = initialize_with_source(&config, &source).await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            source.seen.lock().unwrap()[0],
            (
                "https://management.azure.com/".to_string(),
                "AzurePublicCloud".to_string()
            )
        );
        assert!(validator.is_enhanced());

        let (_, errors) = validator.validate(&json!("chinanorth"), "location");
        assert_eq!(errors.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_cache_absent() {
        let source = FakeSource::new(Response::Unavailable);
        let config = ProviderConfig::new().with_enhanced_validation(true);

        let validator = initialize_with_source(&config, &source).await.unwrap();

        assert!(!validator.is_enhanced());
        assert!(validator.cache().supported_locations().is_none());
        let (_, errors) = validator.validate(&json!("chinanorth"), "location");
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_timeout_leaves_cache_absent() {
        let source = FakeSource::new(Response::Hang);
        let config = ProviderConfig::new()
            .with_enhanced_validation(true)
            .with_metadata_timeout(Duration::from_secs(1));

        let validator = initialize_with_source(&config, &source).await.unwrap();
        assert!(!validator.is_enhanced());
    }

    #[tokio::test]
    async fn test_metadata_host_override_and_environment() {
        let source = FakeSource::new(Response::Catalog(None));
        let config = ProviderConfig::new()
            .with_environment("china")
            .with_enhanced_validation(true)
            .with_metadata_host("metadata.internal");

        initialize_with_source(&config, &source).await.unwrap();

        assert_eq!(
            source.seen.lock().unwrap()[0],
            ("metadata.internal".to_string(), "AzureChinaCloud".to_string())
        );
    }

    #[tokio::test]
    async fn test_unknown_environment_is_fatal() {
        let source = FakeSource::new(Response::Catalog(catalog()));
        let config = ProviderConfig::new()
            .with_environment("mars")
            .with_enhanced_validation(true);

        let err = initialize_with_source(&config, &source).await.unwrap_err();
        assert!(matches!(err, LocationError::UnknownEnvironment(_)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_initialize_disabled_checks_environment() {
        let config = ProviderConfig::new().with_environment("mars");
        let err = tokio_test::block_on(initialize(&config)).unwrap_err();
        assert!(matches!(err, LocationError::UnknownEnvironment(_)));
    }

    #[tokio::test]
    async fn test_sub_second_timeout_allows_fast_source() {
        let source = FakeSource::new(Response::Catalog(catalog()));
        let config = ProviderConfig::new()
            .with_enhanced_validation(true)
            .with_metadata_timeout(Duration::from_millis(900));

        let validator = initialize_with_source(&config, &source).await.unwrap();

        assert!(validator.is_enhanced());
        assert_eq!(validator.cache().supported_locations().map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_initialize_disabled_without_network() {
        let config = ProviderConfig::new();
        let validator = tokio_test::block_on(initialize(&config)).unwrap();

        assert!(!validator.is_enhanced());
        let (_, errors) = validator.validate(&json!("anywhere"), "location");
        assert!(errors.is_empty());
    }
}
