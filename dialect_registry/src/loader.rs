//! Type catalogs and loading
//!
//! A `TypeCatalog` maps fully qualified type names to the constructors the
//! registry may call. The `TypeLoader` looks a name up in its own catalog
//! first and, only on a miss, in a caller-supplied fallback catalog.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use dialect_profile::{trace_log, Dialect, Driver};

use crate::errors::LoadError;

/// No-argument dialect constructor
pub type DialectConstructor = fn() -> Arc<dyn Dialect>;

/// Dialect constructor receiving the associated driver
pub type DriverAwareConstructor = fn(Arc<dyn Driver>) -> Arc<dyn Dialect>;

/// Driver constructor
pub type DriverConstructor = fn() -> Arc<dyn Driver>;

/// Loadable dialect implementation and its registration metadata
#[derive(Clone)]
pub struct DialectType {
    type_name: String,
    simple_name: String,
    declared_name: Option<String>,
    driver_type: Option<String>,
    constructor: Option<DialectConstructor>,
    driver_constructor: Option<DriverAwareConstructor>,
}

impl DialectType {
    /// Dialect type with a no-argument constructor
    pub fn new(type_name: impl Into<String>, constructor: DialectConstructor) -> Self {
        Self::with_constructors(type_name.into(), Some(constructor), None)
    }

    /// Dialect type that can only be built with its driver
    pub fn driver_only(
        type_name: impl Into<String>,
        driver_type: impl Into<String>,
        driver_constructor: DriverAwareConstructor,
    ) -> Self {
        Self::with_constructors(type_name.into(), None, Some(driver_constructor))
            .with_driver(driver_type)
    }

    fn with_constructors(
        type_name: String,
        constructor: Option<DialectConstructor>,
        driver_constructor: Option<DriverAwareConstructor>,
    ) -> Self {
        // The simple name is the last `::` segment of the type path
        let simple_name = type_name
            .rsplit("::")
            .next()
            .unwrap_or(type_name.as_str())
            .to_string();
        Self {
            type_name,
            simple_name,
            declared_name: None,
            driver_type: None,
            constructor,
            driver_constructor,
        }
    }

    /// Explicit canonical name, used verbatim instead of the derived one
    pub fn with_declared_name(mut self, name: impl Into<String>) -> Self {
        self.declared_name = Some(name.into());
        self
    }

    /// Associated driver type, looked up when the dialect is registered
    pub fn with_driver(mut self, driver_type: impl Into<String>) -> Self {
        self.driver_type = Some(driver_type.into());
        self
    }

    pub fn with_driver_constructor(mut self, constructor: DriverAwareConstructor) -> Self {
        self.driver_constructor = Some(constructor);
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    pub fn declared_name(&self) -> Option<&str> {
        self.declared_name.as_deref()
    }

    pub fn driver_type(&self) -> Option<&str> {
        self.driver_type.as_deref()
    }

    pub fn constructor(&self) -> Option<DialectConstructor> {
        self.constructor
    }

    pub fn driver_constructor(&self) -> Option<DriverAwareConstructor> {
        self.driver_constructor
    }
}

impl fmt::Debug for DialectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialectType")
            .field("type_name", &self.type_name)
            .field("declared_name", &self.declared_name)
            .field("driver_type", &self.driver_type)
            .field("no_arg_constructor", &self.constructor.is_some())
            .field("driver_constructor", &self.driver_constructor.is_some())
            .finish()
    }
}

/// Loadable driver implementation
#[derive(Clone)]
pub struct DriverType {
    type_name: String,
    constructor: DriverConstructor,
}

impl DriverType {
    pub fn new(type_name: impl Into<String>, constructor: DriverConstructor) -> Self {
        Self {
            type_name: type_name.into(),
            constructor,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn instantiate(&self) -> Arc<dyn Driver> {
        (self.constructor)()
    }
}

impl fmt::Debug for DriverType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverType")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Entry of a type catalog
#[derive(Debug, Clone)]
pub enum LoadableType {
    Dialect(DialectType),
    Driver(DriverType),
    /// A known type implementing neither contract
    Opaque(String),
}

/// Runtime table of loadable types keyed by fully qualified type name
#[derive(Debug, Default)]
pub struct TypeCatalog {
    types: RwLock<HashMap<String, LoadableType>>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding every built-in dialect and driver
    pub fn builtin() -> Self {
        let catalog = Self::new();
        for dialect_type in crate::builtin::dialect_types() {
            catalog.define_dialect(dialect_type);
        }
        for driver_type in crate::builtin::driver_types() {
            catalog.define_driver(driver_type);
        }
        catalog
    }

    pub fn define_dialect(&self, dialect_type: DialectType) {
        let key = dialect_type.type_name().to_string();
        self.define(key, LoadableType::Dialect(dialect_type));
    }

    pub fn define_driver(&self, driver_type: DriverType) {
        let key = driver_type.type_name().to_string();
        self.define(key, LoadableType::Driver(driver_type));
    }

    pub fn define_opaque(&self, type_name: impl Into<String>) {
        let type_name = type_name.into();
        self.define(type_name.clone(), LoadableType::Opaque(type_name));
    }

    fn define(&self, key: String, entry: LoadableType) {
        self.types
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entry);
    }

    pub fn lookup(&self, type_name: &str) -> Option<LoadableType> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_name)
            .cloned()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.lookup(type_name).is_some()
    }

    pub fn len(&self) -> usize {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Two-context type resolution: own catalog first, fallback second
#[derive(Debug)]
pub struct TypeLoader {
    primary: Arc<TypeCatalog>,
    fallback: RwLock<Option<Arc<TypeCatalog>>>,
}

impl TypeLoader {
    pub fn new(primary: Arc<TypeCatalog>) -> Self {
        Self {
            primary,
            fallback: RwLock::new(None),
        }
    }

    pub fn primary(&self) -> &Arc<TypeCatalog> {
        &self.primary
    }

    pub fn set_fallback(&self, catalog: Option<Arc<TypeCatalog>>) {
        *self.fallback.write().unwrap_or_else(PoisonError::into_inner) = catalog;
    }

    pub fn fallback(&self) -> Option<Arc<TypeCatalog>> {
        self.fallback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn load(&self, type_name: &str) -> Result<LoadableType, LoadError> {
        if let Some(found) = self.primary.lookup(type_name) {
            return Ok(found);
        }
        trace_log!("{} not in the primary catalog, trying fallback", type_name);
        self.fallback()
            .and_then(|catalog| catalog.lookup(type_name))
            .ok_or_else(|| LoadError::NotFound {
                type_name: type_name.to_string(),
            })
    }

    pub fn load_dialect(&self, type_name: &str) -> Result<DialectType, LoadError> {
        match self.load(type_name)? {
            LoadableType::Dialect(dialect_type) => Ok(dialect_type),
            _ => Err(LoadError::ContractMismatch {
                type_name: type_name.to_string(),
                expected: "Dialect",
            }),
        }
    }

    pub fn load_driver(&self, type_name: &str) -> Result<DriverType, LoadError> {
        match self.load(type_name)? {
            LoadableType::Driver(driver_type) => Ok(driver_type),
            _ => Err(LoadError::ContractMismatch {
                type_name: type_name.to_string(),
                expected: "Driver",
            }),
        }
    }
}
