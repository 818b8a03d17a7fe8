//! Database id resolution
//!
//! Maps the product or driver keyword a connection reports to a canonical
//! dialect name. Overrides accumulate for the lifetime of the resolver.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use dialect_profile::trace_log;

use crate::metadata::DatabaseMetadata;

/// Editable keyword -> canonical dialect name table
#[derive(Debug, Default)]
pub struct DatabaseIdResolver {
    mappings: RwLock<HashMap<String, String>>,
}

impl DatabaseIdResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact keyword lookup
    pub fn identify(&self, product_keyword: &str) -> Option<String> {
        self.mappings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(product_keyword)
            .cloned()
    }

    /// Insert or replace a keyword mapping
    pub fn set_override(&self, keyword: impl Into<String>, name: impl Into<String>) {
        self.mappings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(keyword.into(), name.into());
    }

    /// Snapshot of the whole table
    pub fn mappings(&self) -> HashMap<String, String> {
        self.mappings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.mappings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Canonical name for a live connection.
    ///
    /// Tries, in order: the product name verbatim, the driver name verbatim,
    /// then the longest keyword contained (ignoring case) in the product
    /// name, then in the driver name.
    pub fn identify_metadata(&self, metadata: &dyn DatabaseMetadata) -> Option<String> {
        let product = metadata.product_name();
        let driver = metadata.driver_name();

        if let Some(name) = self.identify(product) {
            return Some(name);
        }
        if let Some(name) = driver.and_then(|d| self.identify(d)) {
            return Some(name);
        }

        let mappings = self
            .mappings
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let longest_in = |haystack: &str| {
            let haystack = haystack.to_lowercase();
            mappings
                .iter()
                .filter(|(keyword, _)| !keyword.is_empty())
                .filter(|(keyword, _)| haystack.contains(&keyword.to_lowercase()))
                // ties on length are broken by keyword so the result is stable
                .max_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| b.cmp(a)))
                .map(|(_, name)| name.clone())
        };

        let found = longest_in(product).or_else(|| driver.and_then(longest_in));
        trace_log!("identified {:?} as {:?}", product, found);
        found
    }

    /// Load `keyword = name` lines, returning how many entries were read
    pub fn load_properties(&self, content: &str) -> usize {
        let entries = parse_properties(content);
        let count = entries.len();
        let mut mappings = self
            .mappings
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        mappings.extend(entries);
        count
    }

    /// Load `keyword = name` lines without replacing keywords already
    /// present, returning how many entries were added
    pub fn load_defaults(&self, content: &str) -> usize {
        let mut mappings = self
            .mappings
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let mut added = 0;
        for (keyword, name) in parse_properties(content) {
            if let Entry::Vacant(slot) = mappings.entry(keyword) {
                slot.insert(name);
                added += 1;
            }
        }
        added
    }

    /// Load a properties file from disk
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<usize, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.load_properties(&content))
    }
}

/// Parse a properties document.
///
/// Lines starting with `#` or `!` are comments. Key and value are split at
/// the first `=` or `:` and trimmed; lines without a separator or with an
/// empty key are skipped.
pub fn parse_properties(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .filter_map(|line| {
            let split = line.find(['=', ':'])?;
            let key = line[..split].trim();
            let value = line[split + 1..].trim();
            (!key.is_empty()).then(|| (key.to_string(), value.to_string()))
        })
        .collect()
}
