//! Dialect registry
//!
//! Process-wide catalog of dialects. Dialects are registered by type name
//! through a `TypeLoader` and resolved by canonical name, by implementing
//! type name or by live connection metadata.
//!
//! Reads and writes on the individual tables are each atomic, but a
//! registration updates the name table, the type-name index and the
//! database-id table one after another. A reader racing a registration may
//! see either mapping. Register during startup if that matters.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use dialect_profile::{debug_log, CapabilityProfile, Dialect, ProfileDialect};

use crate::builtin;
use crate::database_id::DatabaseIdResolver;
use crate::errors::{RegistryError, ShapeError};
use crate::loader::{DialectType, TypeCatalog, TypeLoader};
use crate::metadata::{DatabaseMetadata, MetadataCache};

const DIALECT_SUFFIX: &str = "dialect";

/// Registry of dialects keyed by canonical name
#[derive(Debug)]
pub struct DialectRegistry {
    names: RwLock<HashMap<String, Arc<dyn Dialect>>>,
    type_names: RwLock<HashMap<String, String>>,
    connections: MetadataCache,
    database_ids: DatabaseIdResolver,
    loader: TypeLoader,
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DialectRegistry {
    /// Empty registry loading types from the built-in catalog
    pub fn new() -> Self {
        Self::with_catalog(Arc::new(TypeCatalog::builtin()))
    }

    /// Empty registry loading types from `catalog`
    pub fn with_catalog(catalog: Arc<TypeCatalog>) -> Self {
        Self {
            names: RwLock::new(HashMap::new()),
            type_names: RwLock::new(HashMap::new()),
            connections: MetadataCache::new(),
            database_ids: DatabaseIdResolver::new(),
            loader: TypeLoader::new(catalog),
        }
    }

    /// Registry with the built-in database ids and every built-in dialect
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.bootstrap(&builtin::dialect_type_names());
        registry
    }

    /// Lazily bootstrapped process-wide registry
    pub fn global() -> &'static DialectRegistry {
        static REGISTRY: OnceLock<DialectRegistry> = OnceLock::new();
        REGISTRY.get_or_init(Self::with_builtins)
    }

    /// Add the built-in database ids that are not mapped yet, then register
    /// each type name.
    ///
    /// A type that fails to register is logged and skipped. Returns the
    /// number of types registered.
    pub fn bootstrap<S: AsRef<str>>(&self, type_names: &[S]) -> usize {
        self.database_ids
            .load_defaults(builtin::BUILTIN_DATABASE_IDS);

        let mut registered = 0;
        for type_name in type_names {
            let type_name = type_name.as_ref();
            match self.register_by_type_name(type_name) {
                Ok(_) => registered += 1,
                Err(err) => {
                    tracing::warn!("Skipping built-in dialect {}: {}", type_name, err);
                }
            }
        }
        debug_log!(
            "bootstrapped {} of {} dialects",
            registered,
            type_names.len()
        );
        registered
    }

    /// Catalog consulted when the registry's own catalog misses
    pub fn set_fallback_catalog(&self, catalog: Option<Arc<TypeCatalog>>) {
        self.loader.set_fallback(catalog);
    }

    pub fn loader(&self) -> &TypeLoader {
        &self.loader
    }

    pub fn database_ids(&self) -> &DatabaseIdResolver {
        &self.database_ids
    }

    /// Exact, case-sensitive name lookup
    pub fn resolve_by_name(&self, name: &str) -> Option<Arc<dyn Dialect>> {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Lookup through the implementing type name
    pub fn resolve_by_implementing_type_name(&self, type_name: &str) -> Option<Arc<dyn Dialect>> {
        let name = self
            .type_names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_name)
            .cloned()?;
        self.resolve_by_name(&name)
    }

    /// Lookup for a live connection, memoized per metadata object
    pub fn resolve_by_connection_metadata(
        &self,
        metadata: &Arc<dyn DatabaseMetadata>,
    ) -> Option<Arc<dyn Dialect>> {
        if let Some(name) = self.connections.get(metadata) {
            return self.resolve_by_name(&name);
        }

        let name = self.database_ids.identify_metadata(metadata.as_ref())?;
        let dialect = self.resolve_by_name(&name)?;
        debug_log!(
            "connection to {:?} resolved to dialect {}",
            metadata.product_name(),
            name
        );
        // the name is cached, not the dialect, so re-registration is picked up
        self.connections.insert(metadata, name);
        Some(dialect)
    }

    /// Canonical name the given type registers under
    pub fn canonical_name(dialect_type: &DialectType) -> Result<String, ShapeError> {
        if let Some(declared) = dialect_type.declared_name() {
            if declared.trim().is_empty() {
                return Err(ShapeError::EmptyDeclaredName {
                    type_name: dialect_type.type_name().to_string(),
                });
            }
            return Ok(declared.to_string());
        }

        let simple = dialect_type.simple_name();
        let stem = match simple.len().checked_sub(DIALECT_SUFFIX.len()) {
            Some(split)
                if simple.is_char_boundary(split)
                    && simple[split..].eq_ignore_ascii_case(DIALECT_SUFFIX) =>
            {
                &simple[..split]
            }
            _ => simple,
        };
        if stem.is_empty() {
            return Err(ShapeError::EmptyDerivedName {
                type_name: dialect_type.type_name().to_string(),
            });
        }
        Ok(stem.to_lowercase())
    }

    /// Register the type named `type_name` under its canonical name
    pub fn register_by_type_name(&self, type_name: &str) -> Result<Arc<dyn Dialect>, RegistryError> {
        self.register(None, type_name)
    }

    /// Load `type_name`, register it under its canonical name and, when
    /// given, under `name` as well. Re-registering a name replaces it.
    pub fn register(
        &self,
        name: Option<&str>,
        type_name: &str,
    ) -> Result<Arc<dyn Dialect>, RegistryError> {
        if name.is_some_and(|n| n.trim().is_empty()) {
            return Err(ShapeError::EmptySuppliedName.into());
        }
        let dialect_type = self.loader.load_dialect(type_name)?;
        let dialect = self.register_type(&dialect_type)?;

        if let Some(alias) = name {
            self.insert_name(alias, Arc::clone(&dialect));
        }
        Ok(dialect)
    }

    /// Register a dialect given only by its profile
    pub fn register_profile(
        &self,
        name: &str,
        profile: CapabilityProfile,
    ) -> Result<Arc<dyn Dialect>, RegistryError> {
        if name.trim().is_empty() {
            return Err(ShapeError::EmptySuppliedName.into());
        }
        let dialect: Arc<dyn Dialect> = Arc::new(ProfileDialect::new(name, profile));
        self.insert_name(name, Arc::clone(&dialect));
        Ok(dialect)
    }

    fn register_type(&self, dialect_type: &DialectType) -> Result<Arc<dyn Dialect>, RegistryError> {
        let name = Self::canonical_name(dialect_type)?;
        let dialect = self.instantiate(dialect_type, &name)?;

        self.insert_name(&name, Arc::clone(&dialect));
        self.type_names
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(dialect_type.type_name().to_string(), name);
        Ok(dialect)
    }

    /// Driver-aware construction when both the driver and the constructor
    /// are available, no-argument construction otherwise
    fn instantiate(&self, dialect_type: &DialectType, name: &str) -> Result<Arc<dyn Dialect>, ShapeError> {
        if let Some(driver_type_name) = dialect_type.driver_type() {
            if driver_type_name.trim().is_empty() {
                return Err(ShapeError::EmptyDriverName {
                    type_name: dialect_type.type_name().to_string(),
                });
            }
            match self.loader.load_driver(driver_type_name) {
                Ok(driver_type) => match dialect_type.driver_constructor() {
                    Some(construct) => return Ok(construct(driver_type.instantiate())),
                    None => tracing::info!(
                        "Can't find the driver based constructor for dialect {}",
                        name
                    ),
                },
                Err(err) => tracing::info!(
                    "Can't find driver {} for {} dialect: {}",
                    driver_type_name,
                    name,
                    err
                ),
            }
        }

        dialect_type
            .constructor()
            .map(|construct| construct())
            .ok_or_else(|| ShapeError::NoConstructor {
                type_name: dialect_type.type_name().to_string(),
            })
    }

    fn insert_name(&self, name: &str, dialect: Arc<dyn Dialect>) {
        self.names
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), dialect);
        self.database_ids.set_override(name, name);
    }

    /// Sorted registered names
    pub fn registered_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
