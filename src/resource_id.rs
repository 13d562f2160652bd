//! Azure Resource Manager resource IDs.
//!
//! IDs have the shape
//! `/subscriptions/{id}/resourceGroups/{name}/providers/{namespace}/{type}/{name}/...`
//! and are parsed into their well-known parts plus a map of the remaining
//! key/value segments.

use std::collections::HashMap;
use std::fmt;

use crate::error::LocationError;

/// A parsed Resource Manager ID.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceId {
    /// The subscription the resource lives in.
    pub subscription_id: String,
    /// The resource group, empty for subscription-level resources.
    pub resource_group: String,
    /// The resource provider namespace, e.g. `Microsoft.Compute`.
    pub provider: String,
    /// Remaining `type/name` segments keyed by type.
    pub path: HashMap<String, String>,
}

impl ResourceId {
    /// Parse a resource ID.
    ///
    /// ```
    /// use azurerm_location::resource_id::ResourceId;
    ///
    /// let id = ResourceId::parse(
    ///     "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/example/providers/Microsoft.Compute/virtualMachines/vm1",
    /// ).unwrap();
    /// assert_eq!(id.resource_group, "example");
    /// assert_eq!(id.path["virtualMachines"], "vm1");
    /// ```
    pub fn parse(id: &str) -> Result<Self, LocationError> {
        if id.is_empty() {
            return Err(invalid("ID was empty"));
        }
        if id.contains(['?', '#']) {
            return Err(invalid(format!("Cannot parse Azure ID: {:?}", id)));
        }

        let trimmed = id.trim_matches('/');
        let components: Vec<&str> = trimmed.split('/').collect();
        if components.len() % 2 != 0 {
            return Err(invalid(format!(
                "The number of path segments is not divisible by 2 in {:?}",
                id
            )));
        }

        let mut path = HashMap::new();
        for pair in components.chunks(2) {
            let (key, value) = (pair[0], pair[1]);
            if key.is_empty() || value.is_empty() {
                return Err(invalid(format!(
                    "Key/Value cannot be empty strings. Key: '{}', Value: '{}'",
                    key, value
                )));
            }
            path.insert(key.to_string(), value.to_string());
        }

        let subscription_id = path
            .remove("subscriptions")
            .ok_or_else(|| invalid(format!("No subscription ID found in: {:?}", id)))?;

        let resource_group = path
            .remove("resourceGroups")
            .or_else(|| path.remove("resourcegroups"))
            .unwrap_or_default();

        let provider = path.remove("providers").unwrap_or_default();

        Ok(Self {
            subscription_id,
            resource_group,
            provider,
            path,
        })
    }

    /// Remove a path element and return its value.
    pub fn pop_segment(&mut self, key: &str) -> Result<String, LocationError> {
        self.path
            .remove(key)
            .ok_or_else(|| invalid(format!("ID was missing the `{}` element", key)))
    }

    /// Fail if any path elements remain after the expected ones were popped.
    pub fn validate_no_empty_segments(&self, id: &str) -> Result<(), LocationError> {
        if self.path.is_empty() {
            return Ok(());
        }
        Err(invalid(format!(
            "ID contained more segments than required: {:?}, {:?}",
            id, self.path
        )))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/subscriptions/{}", self.subscription_id)?;
        if !self.resource_group.is_empty() {
            write!(f, "/resourceGroups/{}", self.resource_group)?;
        }
        if !self.provider.is_empty() {
            write!(f, "/providers/{}", self.provider)?;
        }

        let mut keys: Vec<&String> = self.path.keys().collect();
        keys.sort();
        for key in keys {
            write!(f, "/{}/{}", key, self.path[key])?;
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> LocationError {
    LocationError::InvalidResourceId(msg.into())
}
