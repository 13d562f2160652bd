//! Process-wide storage for the location catalog.
//!
//! The cache is written once during startup and read by every validation
//! afterwards. An absent catalog, whether never populated or populated with
//! `None` after a failed fetch, means "no restriction available".

use std::sync::OnceLock;

use tracing::debug;

use crate::error::LocationError;

/// Single-writer, read-only-afterwards holder of the location catalog.
///
/// Share it between validators with an `Arc`.
#[derive(Debug, Default)]
pub struct LocationCache {
    catalog: OnceLock<Option<Vec<String>>>,
}

impl LocationCache {
    /// Create an empty, unpopulated cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache already holding `catalog`.
    pub fn with_locations(catalog: Vec<String>) -> Self {
        Self {
            catalog: OnceLock::from(Some(catalog)),
        }
    }

    /// Store the catalog.
    ///
    /// Only the first call takes effect; later calls return
    /// [`LocationError::CacheAlreadyPopulated`] and leave the stored value
    /// unchanged. Populating with `None` records that the catalog is
    /// unavailable.
    pub fn populate(&self, catalog: Option<Vec<String>>) -> Result<(), LocationError> {
        let count = catalog.as_ref().map(Vec::len);
        self.catalog
            .set(catalog)
            .map_err(|_| LocationError::CacheAlreadyPopulated)?;
        debug!(locations = ?count, "Location cache populated");
        Ok(())
    }

    /// The cached catalog, if one is available.
    pub fn supported_locations(&self) -> Option<&[String]> {
        self.catalog.get().and_then(|c| c.as_deref())
    }

    /// Whether [`populate`](Self::populate) has been called.
    pub fn is_populated(&self) -> bool {
        self.catalog.get().is_some()
    }
}
