//! Enhanced validation of location fields.
//!
//! When enhanced validation is enabled and the location catalog was fetched,
//! a location must appear in that catalog (after normalization). Otherwise
//! validation falls back to a permissive "must not be empty" check.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use azurerm_location::cache::LocationCache;
//! use azurerm_location::validation::LocationValidator;
//! use serde_json::json;
//!
//! let cache = LocationCache::with_locations(vec!["westeurope".to_string()]);
//! let validator = LocationValidator::new(true, Arc::new(cache));
//!
//! let (_, errors) = validator.validate(&json!("West Europe"), "location");
//! assert!(errors.is_empty());
//!
//! let (_, errors) = validator.validate(&json!("chinanorth"), "location");
//! assert_eq!(errors.len(), 1);
//! ```

use std::sync::Arc;

use serde_json::Value;
use tracing::trace;

use crate::cache::LocationCache;
use crate::error::LocationValidationError;
use crate::normalize::normalize;
use crate::schema::Diagnostic;

/// Pseudo-location used by resources that are not bound to a region. It is
/// never part of the catalog but is always accepted.
pub const GLOBAL_LOCATION: &str = "global";

/// Validates location values against the cached catalog.
#[derive(Debug, Clone)]
pub struct LocationValidator {
    enhanced: bool,
    cache: Arc<LocationCache>,
}

impl LocationValidator {
    /// Create a validator.
    ///
    /// `enhanced` is the resolved feature flag; when it is `false` the cache
    /// is never consulted.
    pub fn new(enhanced: bool, cache: Arc<LocationCache>) -> Self {
        Self { enhanced, cache }
    }

    /// A validator that only checks for empty values.
    pub fn permissive() -> Self {
        Self::new(false, Arc::new(LocationCache::new()))
    }

    /// Whether catalog-backed validation will be used.
    pub fn is_enhanced(&self) -> bool {
        self.enhanced && self.cache.supported_locations().is_some()
    }

    /// The shared cache.
    pub fn cache(&self) -> &Arc<LocationCache> {
        &self.cache
    }

    /// Validate a configured value for `field`.
    ///
    /// Returns warnings and errors in the shape field-level validation hooks
    /// use. Warnings are currently always empty.
    pub fn validate(
        &self,
        value: &Value,
        field: &str,
    ) -> (Vec<String>, Vec<LocationValidationError>) {
        let warnings = Vec::new();
        let errors = match self.check(value, field) {
            Ok(()) => Vec::new(),
            Err(err) => vec![err],
        };
        (warnings, errors)
    }

    /// Validate a configured value and report the result as diagnostics.
    pub fn validate_diagnostics(&self, value: &Value, field: &str) -> Vec<Diagnostic> {
        let (warnings, errors) = self.validate(value, field);

        let warnings = warnings
            .into_iter()
            .map(|w| Diagnostic::warning(w).with_attribute(field));
        let errors = errors
            .into_iter()
            .map(|e| Diagnostic::invalid_location(field, e));

        warnings.chain(errors).collect()
    }

    fn check(&self, value: &Value, field: &str) -> Result<(), LocationValidationError> {
        let Some(candidate) = value.as_str() else {
            return Err(LocationValidationError::WrongType {
                field: field.to_string(),
            });
        };

        let supported = match self.cache.supported_locations() {
            Some(supported) if self.enhanced => supported,
            _ => return check_not_empty(candidate, field),
        };

        let location = normalize(candidate);
        if location.is_empty() {
            return Err(LocationValidationError::Empty {
                field: field.to_string(),
            });
        }

        if supported.iter().any(|loc| normalize(loc) == location) {
            return Ok(());
        }

        if location == GLOBAL_LOCATION {
            return Ok(());
        }

        trace!(location = %location, "Location not found in catalog");
        Err(LocationValidationError::Unsupported {
            location,
            supported: supported.to_vec(),
        })
    }
}

fn check_not_empty(candidate: &str, field: &str) -> Result<(), LocationValidationError> {
    if candidate.is_empty() {
        return Err(LocationValidationError::Empty {
            field: field.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DiagnosticSeverity;
    use serde_json::json;

    fn public_catalog() -> Vec<String> {
        [
            "westeurope",
            "northeurope",
            "eastus",
            "westus",
            "southeastasia",
            "centralindia",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn validator(enhanced: bool, catalog: Option<Vec<String>>) -> LocationValidator {
        let cache = LocationCache::new();
        cache.populate(catalog).unwrap();
        LocationValidator::new(enhanced, Arc::new(cache))
    }

    fn passes(validator: &LocationValidator, value: Value) -> bool {
        let (warnings, errors) = validator.validate(&value, "location");
        assert!(warnings.is_empty());
        errors.is_empty()
    }

    #[test]
    fn test_disabled_is_permissive() {
        let v = validator(false, Some(public_catalog()));
        assert!(!v.is_enhanced());

        assert!(!passes(&v, json!("")));
        assert!(passes(&v, json!("China North")));
        assert!(passes(&v, json!("chinanorth")));
    }

    #[test]
    fn test_offline_is_permissive() {
        let v = validator(true, None);
        assert!(!v.is_enhanced());

        assert!(!passes(&v, json!("")));
        assert!(passes(&v, json!("China North")));
        assert!(passes(&v, json!("chinanorth")));
    }

    #[test]
    fn test_unpopulated_cache_is_permissive() {
        let v = LocationValidator::new(true, Arc::new(LocationCache::new()));
        assert!(passes(&v, json!("anywhere")));
        assert!(!passes(&v, json!("")));
    }

    #[test]
    fn test_enhanced_accepts_catalog_locations() {
        let v = validator(true, Some(public_catalog()));
        assert!(v.is_enhanced());

        assert!(passes(&v, json!("westeurope")));
        assert!(passes(&v, json!("West Europe")));
        assert!(passes(&v, json!("SOUTH EAST ASIA")));
    }

    #[test]
    fn test_enhanced_rejects_other_cloud_locations() {
        let v = validator(true, Some(public_catalog()));

        let (_, errors) = v.validate(&json!("China North"), "location");
        assert_eq!(
            errors,
            vec![LocationValidationError::Unsupported {
                location: "chinanorth".to_string(),
                supported: public_catalog(),
            }]
        );
        assert!(errors[0]
            .to_string()
            .starts_with("chinanorth was not found in the list of supported Azure Locations: westeurope,northeurope"));
    }

    #[test]
    fn test_enhanced_matches_raw_catalog_entries_after_normalization() {
        let v = validator(true, Some(vec!["West US 2".to_string()]));
        assert!(passes(&v, json!("westus2")));
    }

    #[test]
    fn test_global_always_passes() {
        for v in [
            validator(true, Some(public_catalog())),
            validator(true, Some(Vec::new())),
            validator(true, None),
            validator(false, None),
        ] {
            assert!(passes(&v, json!("global")));
            assert!(passes(&v, json!("Global")));
        }
    }

    #[test]
    fn test_empty_always_fails() {
        for v in [
            validator(true, Some(public_catalog())),
            validator(true, None),
            validator(false, Some(public_catalog())),
        ] {
            let (_, errors) = v.validate(&json!(""), "location");
            assert_eq!(
                errors,
                vec![LocationValidationError::Empty {
                    field: "location".to_string()
                }]
            );
        }
    }

    #[test]
    fn test_blank_value_fails_only_when_enhanced() {
        let enhanced = validator(true, Some(public_catalog()));
        assert!(!passes(&enhanced, json!("   ")));

        let permissive = validator(false, None);
        assert!(passes(&permissive, json!("   ")));
    }

    #[test]
    fn test_wrong_type() {
        for v in [validator(true, Some(public_catalog())), LocationValidator::permissive()] {
            for value in [json!(42), json!(null), json!(["westus"]), json!({"name": "westus"})] {
                let (_, errors) = v.validate(&value, "location");
                assert_eq!(
                    errors,
                    vec![LocationValidationError::WrongType {
                        field: "location".to_string()
                    }]
                );
            }
        }
    }

    #[test]
    fn test_validate_diagnostics() {
        let v = validator(true, Some(public_catalog()));

        assert!(v.validate_diagnostics(&json!("eastus"), "location").is_empty());

        let diagnostics = v.validate_diagnostics(&json!("mars"), "location");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, DiagnosticSeverity::Error);
        assert_eq!(diagnostics[0].attribute, Some("location".to_string()));
        assert!(diagnostics[0]
            .detail
            .as_deref()
            .unwrap()
            .starts_with("mars was not found"));
        assert!(matches!(
            diagnostics[0].cause,
            Some(LocationValidationError::Unsupported { ref location, .. }) if location == "mars"
        ));
    }
}
