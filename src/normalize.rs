//! Canonical form for Azure location names.
//!
//! Users write locations in many shapes (`West Europe`, `westeurope`,
//! `WestEurope`). The Resource Manager API returns a single lowercase,
//! space-free token. Everything that compares or stores a location goes
//! through [`normalize`].

use serde_json::Value;

/// Convert a location name into its canonical token.
///
/// Lower-cases the input and strips every space character. Other whitespace
/// and punctuation are left alone.
///
/// ```
/// use azurerm_location::normalize::normalize;
///
/// assert_eq!(normalize("West US"), "westus");
/// assert_eq!(normalize("southeastasia"), "southeastasia");
/// ```
pub fn normalize(input: &str) -> String {
    input.replace(' ', "").to_lowercase()
}

/// Like [`normalize`], but an absent value becomes the empty string.
pub fn normalize_nilable(input: Option<&str>) -> String {
    input.map(normalize).unwrap_or_default()
}

/// Diff-suppression hook for location attributes.
///
/// Two values that normalize to the same token are the same location, so a
/// plan should not report a change between them.
pub fn diff_suppress(_key: &str, old: &str, new: &str) -> bool {
    normalize(old) == normalize(new)
}

/// State hook for location attributes.
///
/// Returns the canonical token for string values and an empty string for
/// anything else.
pub fn state_func(value: &Value) -> String {
    match value {
        Value::String(s) => normalize(s),
        _ => String::new(),
    }
}
