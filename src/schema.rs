//! Schema types for location attributes.
//!
//! Nearly every Azure resource carries a `location` attribute with the same
//! behaviour: it is validated against the location catalog, stored in
//! canonical form, and cosmetic differences (`West Europe` vs `westeurope`)
//! never show up as a change. The builders here produce that attribute in
//! its required, optional and computed flavours.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LocationValidationError;
use crate::normalize::{diff_suppress, state_func};
use crate::validation::LocationValidator;

/// Describes how an attribute can be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AttributeFlags {
    /// The attribute is required in configuration.
    pub required: bool,
    /// The attribute is optional in configuration.
    pub optional: bool,
    /// The attribute is computed by the provider (read-only).
    pub computed: bool,
}

impl AttributeFlags {
    /// Create flags for a required attribute.
    pub fn required() -> Self {
        Self {
            required: true,
            ..Default::default()
        }
    }

    /// Create flags for an optional attribute.
    pub fn optional() -> Self {
        Self {
            optional: true,
            ..Default::default()
        }
    }

    /// Create flags for a computed attribute (read-only, set by provider).
    pub fn computed() -> Self {
        Self {
            computed: true,
            ..Default::default()
        }
    }

    /// Whether the attribute is only ever set by the provider.
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }
}

/// A `location` attribute and the hooks attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationAttribute {
    /// Flags describing how the attribute can be used.
    #[serde(flatten)]
    pub flags: AttributeFlags,
    /// Human-readable description of the attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// If set, changing this attribute forces resource replacement.
    #[serde(default)]
    pub force_new: bool,
}

impl LocationAttribute {
    /// Create a new location attribute with the given flags.
    pub fn new(flags: AttributeFlags) -> Self {
        Self {
            flags,
            description: None,
            force_new: false,
        }
    }

    /// Set the description for this attribute.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark this attribute as forcing resource replacement when changed.
    pub fn with_force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Validate a configured value for this attribute.
    ///
    /// Computed-only attributes are never validated. A missing value is an
    /// error only for required attributes.
    pub fn validate(
        &self,
        validator: &LocationValidator,
        value: Option<&Value>,
        path: &str,
    ) -> Vec<Diagnostic> {
        if self.flags.is_computed_only() {
            return Vec::new();
        }

        match value {
            None | Some(Value::Null) => {
                if self.flags.required {
                    vec![
                        Diagnostic::error(format!("Missing required attribute '{}'", path))
                            .with_detail("This attribute is required and must be provided")
                            .with_attribute(path),
                    ]
                } else {
                    Vec::new()
                }
            },
            Some(v) => validator.validate_diagnostics(v, path),
        }
    }

    /// Whether a change from `old` to `new` should be hidden from the plan.
    pub fn suppresses_diff(&self, key: &str, old: &str, new: &str) -> bool {
        !self.flags.is_computed_only() && diff_suppress(key, old, new)
    }

    /// The value to persist in state.
    pub fn state(&self, value: &Value) -> String {
        state_func(value)
    }
}

/// A required location that forces replacement when changed.
pub fn location_schema() -> LocationAttribute {
    LocationAttribute::new(AttributeFlags::required()).with_force_new()
}

/// An optional location that forces replacement when changed.
pub fn location_schema_optional() -> LocationAttribute {
    LocationAttribute::new(AttributeFlags::optional()).with_force_new()
}

/// A location reported by the provider.
pub fn location_schema_computed() -> LocationAttribute {
    LocationAttribute::new(AttributeFlags::computed())
}

/// A required location that can be updated in place.
pub fn location_schema_without_force_new() -> LocationAttribute {
    LocationAttribute::new(AttributeFlags::required())
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// An error that prevents the operation from completing.
    Error,
    /// A warning that doesn't prevent the operation but should be addressed.
    Warning,
}

/// A diagnostic message produced by validation.
///
/// Diagnostics raised for a rejected location keep the underlying
/// [`LocationValidationError`] in `cause`, so callers can match on the kind
/// of failure instead of the rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity of the diagnostic.
    pub severity: DiagnosticSeverity,
    /// A short summary of the issue.
    pub summary: String,
    /// A detailed description of the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// The attribute path where the issue occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// The validation failure behind this diagnostic, if any.
    #[serde(skip)]
    pub cause: Option<LocationValidationError>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(summary: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            summary: summary.into(),
            detail: None,
            attribute: None,
            cause: None,
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(summary: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            summary: summary.into(),
            detail: None,
            attribute: None,
            cause: None,
        }
    }

    /// An error diagnostic for a location rejected on `attribute`.
    pub fn invalid_location(attribute: impl Into<String>, cause: LocationValidationError) -> Self {
        let attribute = attribute.into();
        Self {
            severity: DiagnosticSeverity::Error,
            summary: format!("Invalid location for attribute '{}'", attribute),
            detail: Some(cause.to_string()),
            attribute: Some(attribute),
            cause: Some(cause),
        }
    }

    /// Add detail to this diagnostic.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Set the attribute path for this diagnostic.
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Whether this is an error.
    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}
