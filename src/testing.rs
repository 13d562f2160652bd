//! Testing utilities for code that validates locations.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use azurerm_location::cache::LocationCache;
//! use azurerm_location::testing::{assert_location_accepted, assert_location_rejected};
//! use azurerm_location::validation::LocationValidator;
//!
//! let cache = LocationCache::with_locations(vec!["westeurope".to_string()]);
//! let validator = LocationValidator::new(true, Arc::new(cache));
//!
//! assert_location_accepted(&validator, "West Europe");
//! assert_location_rejected(&validator, "chinanorth");
//! ```

use serde_json::{json, Value};

use crate::error::LocationValidationError;
use crate::schema::Diagnostic;
use crate::validation::LocationValidator;

/// Build a metadata document in the shape served by
/// `/metadata/endpoints`.
///
/// Each entry is `(key, endpoint host, locations)`.
pub fn metadata_document(entries: &[(&str, &str, &[&str])]) -> Value {
    let cloud_endpoint: serde_json::Map<String, Value> = entries
        .iter()
        .map(|(key, endpoint, locations)| {
            (
                key.to_string(),
                json!({ "endpoint": endpoint, "locations": locations }),
            )
        })
        .collect();

    json!({ "cloudEndpoint": cloud_endpoint })
}

// =========================================================================
// Assertion Helpers
// =========================================================================

/// Assert that `location` passes validation.
///
/// # Panics
///
/// Panics if the validator reports any error.
pub fn assert_location_accepted(validator: &LocationValidator, location: &str) {
    let (_, errors) = validator.validate(&json!(location), "location");
    assert!(
        errors.is_empty(),
        "Expected {:?} to be accepted, but got: {:?}",
        location,
        errors.iter().map(|e| e.to_string()).collect::<Vec<_>>()
    );
}

/// Assert that `location` fails validation.
///
/// # Panics
///
/// Panics if the validator reports no error.
pub fn assert_location_rejected(validator: &LocationValidator, location: &str) {
    let (_, errors) = validator.validate(&json!(location), "location");
    assert!(
        !errors.is_empty(),
        "Expected {:?} to be rejected, but it was accepted",
        location
    );
}

/// Assert that none of `diagnostics` rejects a location.
///
/// # Panics
///
/// Panics if any diagnostic is an error.
pub fn assert_no_errors(diagnostics: &[Diagnostic]) {
    let rejected: Vec<_> = errors(diagnostics)
        .map(|d| d.detail.as_deref().unwrap_or(&d.summary))
        .collect();

    assert!(
        rejected.is_empty(),
        "Expected location to be accepted, but got {} error(s): {:?}",
        rejected.len(),
        rejected
    );
}

/// Assert that at least one of `diagnostics` rejects a location.
///
/// # Panics
///
/// Panics if no diagnostic is an error.
pub fn assert_has_errors(diagnostics: &[Diagnostic]) {
    assert!(
        errors(diagnostics).next().is_some(),
        "Expected location to be rejected, but got no errors"
    );
}

/// Assert that an error's summary or detail contains `substring`.
///
/// # Panics
///
/// Panics if no error diagnostic contains the given substring.
pub fn assert_error_contains(diagnostics: &[Diagnostic], substring: &str) {
    let matched = errors(diagnostics).any(|d| {
        d.summary.contains(substring)
            || d.detail.as_deref().is_some_and(|detail| detail.contains(substring))
    });

    assert!(
        matched,
        "Expected an error containing '{}', got: {:?}",
        substring,
        errors(diagnostics)
            .map(|d| (&d.summary, &d.detail))
            .collect::<Vec<_>>()
    );
}

/// Assert that a location was rejected for `cause`.
///
/// # Panics
///
/// Panics if no error diagnostic carries an equal cause.
pub fn assert_rejected_for(diagnostics: &[Diagnostic], cause: &LocationValidationError) {
    assert!(
        errors(diagnostics).any(|d| d.cause.as_ref() == Some(cause)),
        "Expected rejection for {:?}, got: {:?}",
        cause,
        errors(diagnostics).map(|d| &d.cause).collect::<Vec<_>>()
    );
}

fn errors(diagnostics: &[Diagnostic]) -> impl Iterator<Item = &Diagnostic> {
    diagnostics.iter().filter(|d| d.is_error())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LocationCache;
    use std::sync::Arc;

    fn validator() -> LocationValidator {
        let cache = LocationCache::with_locations(vec!["uksouth".to_string()]);
        LocationValidator::new(true, Arc::new(cache))
    }

    #[test]
    fn test_metadata_document() {
        let doc = metadata_document(&[("public", "management.azure.com", &["westus"][..])]);
        assert_eq!(doc["cloudEndpoint"]["public"]["endpoint"], "management.azure.com");
        assert_eq!(doc["cloudEndpoint"]["public"]["locations"][0], "westus");
    }

    #[test]
    fn test_assert_location_accepted() {
        assert_location_accepted(&validator(), "UK South");
        assert_location_accepted(&validator(), "global");
    }

    #[test]
    #[should_panic(expected = "to be accepted")]
    fn test_assert_location_accepted_fails() {
        assert_location_accepted(&validator(), "westus");
    }

    #[test]
    #[should_panic(expected = "to be rejected")]
    fn test_assert_location_rejected_fails() {
        assert_location_rejected(&validator(), "uksouth");
    }

    #[test]
    fn test_assert_no_errors() {
        assert_no_errors(&[]);
        assert_no_errors(&[Diagnostic::warning("just a warning")]);
    }

    #[test]
    #[should_panic(expected = "Expected location to be accepted")]
    fn test_assert_no_errors_fails() {
        assert_no_errors(&[Diagnostic::error("an error")]);
    }

    #[test]
    fn test_assert_error_contains_detail() {
        let diagnostics = validator().validate_diagnostics(&json!("westus"), "location");
        assert_has_errors(&diagnostics);
        assert_error_contains(&diagnostics, "was not found");
    }

    #[test]
    fn test_assert_rejected_for() {
        let diagnostics = validator().validate_diagnostics(&json!(" "), "location");
        assert_rejected_for(
            &diagnostics,
            &LocationValidationError::Empty {
                field: "location".to_string(),
            },
        );
    }

    #[test]
    #[should_panic(expected = "Expected rejection for")]
    fn test_assert_rejected_for_fails() {
        let diagnostics = validator().validate_diagnostics(&json!(42), "location");
        assert_rejected_for(
            &diagnostics,
            &LocationValidationError::Empty {
                field: "location".to_string(),
            },
        );
    }

    #[test]
    #[should_panic(expected = "Expected location to be rejected, but got no errors")]
    fn test_assert_has_errors_fails() {
        assert_has_errors(&[Diagnostic::warning("warning")]);
    }
}
