//! Azure location handling for infrastructure providers.
//!
//! Almost every Azure resource has a `location`. This crate provides the
//! pieces a provider needs to handle it consistently:
//!
//! - **Normalization**: canonical lowercase, space-free location tokens
//! - **Metadata fetch**: the supported locations for the active cloud, read
//!   from the Resource Manager `/metadata/endpoints` document
//! - **Location cache**: the fetched catalog, written once at startup
//! - **Enhanced validation**: checks a location against the catalog, falling
//!   back to a non-empty check when the catalog is unavailable
//! - **Schema helpers**: `location` attributes with validation,
//!   diff-suppression and state hooks attached
//! - **Resource IDs**: parsing and formatting of Resource Manager IDs
//! - **Logging**: Integration with `tracing` for structured logging
//!
//! # Quick Start
//!
//! ```ignore
//! use azurerm_location::{init_logging, initialize, ProviderConfig};
//! use azurerm_location::schema::location_schema;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging();
//!
//!     // Reads ARM_ENVIRONMENT, ARM_PROVIDER_ENHANCED_VALIDATION, ...
//!     let config = ProviderConfig::from_env()?;
//!     let validator = initialize(&config).await?;
//!
//!     let diagnostics = location_schema().validate(&validator, Some(&json!("West Europe")), "location");
//!     assert!(diagnostics.is_empty());
//!     Ok(())
//! }
//! ```
//!
//! # Enhanced Validation
//!
//! Enhanced validation is off unless `ARM_PROVIDER_ENHANCED_VALIDATION=true`.
//! When on, startup performs a single request to
//!
//! ```text
//! GET https://<resource-manager-host>/metadata/endpoints?api-version=2018-01-01
//! ```
//!
//! and keeps the locations listed for that host. If the request fails the
//! provider still starts; locations are then only checked for emptiness.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod config;
pub mod environment;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod normalize;
pub mod resource_id;
pub mod schema;
pub mod startup;
pub mod testing;
pub mod validation;

// Re-export main types at crate root
pub use cache::LocationCache;
pub use config::ProviderConfig;
pub use environment::CloudEnvironment;
pub use error::{LocationError, LocationValidationError};
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use metadata::{correct_india_locations, LocationSource, MetadataClient};
pub use normalize::{diff_suppress, normalize, normalize_nilable, state_func};
pub use resource_id::ResourceId;
pub use startup::{initialize, initialize_with_source};
pub use validation::LocationValidator;

// Re-export async_trait for implementing LocationSource
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
