//! Connection metadata
//!
//! The registry memoizes the dialect name resolved for each live metadata
//! object. Entries are keyed by object identity and hold only a weak
//! reference, so a dropped connection never resolves from a stale entry.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, PoisonError, RwLock, Weak};

/// Identification a live connection reports about its database
pub trait DatabaseMetadata: Debug + Send + Sync {
    fn product_name(&self) -> &str;

    fn driver_name(&self) -> Option<&str> {
        None
    }

    fn product_version(&self) -> Option<&str> {
        None
    }
}

/// Plain metadata value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionMetadata {
    product_name: String,
    driver_name: Option<String>,
    product_version: Option<String>,
}

impl ConnectionMetadata {
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            ..Self::default()
        }
    }

    pub fn with_driver_name(mut self, driver_name: impl Into<String>) -> Self {
        self.driver_name = Some(driver_name.into());
        self
    }

    pub fn with_product_version(mut self, version: impl Into<String>) -> Self {
        self.product_version = Some(version.into());
        self
    }

    /// Share as the trait object the registry caches against
    pub fn into_shared(self) -> Arc<dyn DatabaseMetadata> {
        Arc::new(self)
    }
}

impl DatabaseMetadata for ConnectionMetadata {
    fn product_name(&self) -> &str {
        &self.product_name
    }

    fn driver_name(&self) -> Option<&str> {
        self.driver_name.as_deref()
    }

    fn product_version(&self) -> Option<&str> {
        self.product_version.as_deref()
    }
}

#[cfg(feature = "sqlx")]
impl From<&sqlx::AnyConnection> for ConnectionMetadata {
    fn from(connection: &sqlx::AnyConnection) -> Self {
        Self::new(connection.backend_name()).with_driver_name("sqlx")
    }
}

/// Entry count below which dropped connections are never swept
const PRUNE_THRESHOLD: usize = 64;

struct CacheEntry {
    metadata: Weak<dyn DatabaseMetadata>,
    name: String,
}

struct CacheState {
    entries: HashMap<usize, CacheEntry>,
    /// Size at which the next sweep runs
    prune_at: usize,
}

impl Default for CacheState {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            prune_at: PRUNE_THRESHOLD,
        }
    }
}

/// Identity-keyed memo of metadata object -> canonical dialect name
#[derive(Default)]
pub struct MetadataCache {
    state: RwLock<CacheState>,
}

impl Debug for MetadataCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataCache")
            .field("entries", &self.len())
            .finish()
    }
}

fn identity(metadata: &Arc<dyn DatabaseMetadata>) -> usize {
    Arc::as_ptr(metadata) as *const () as usize
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached name for this exact metadata object
    pub fn get(&self, metadata: &Arc<dyn DatabaseMetadata>) -> Option<String> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let entry = state.entries.get(&identity(metadata))?;
        // same address but a dead referent means the slot was reused
        let live = entry.metadata.upgrade()?;
        Arc::ptr_eq(&live, metadata).then(|| entry.name.clone())
    }

    /// Remember `name` for this metadata object.
    ///
    /// Entries of dropped connections are swept once the table doubles in
    /// size since the last sweep, so inserts stay amortized constant time.
    pub fn insert(&self, metadata: &Arc<dyn DatabaseMetadata>, name: String) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.entries.len() >= state.prune_at {
            state
                .entries
                .retain(|_, entry| entry.metadata.strong_count() > 0);
            state.prune_at = (state.entries.len() * 2).max(PRUNE_THRESHOLD);
        }
        state.entries.insert(
            identity(metadata),
            CacheEntry {
                metadata: Arc::downgrade(metadata),
                name,
            },
        );
    }

    /// Number of entries, including ones whose connection has since been dropped
    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
