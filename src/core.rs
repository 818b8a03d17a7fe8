//! Core sqldialect functionality
//!
//! This module contains the `SqlDialect` coordinator, which turns an
//! `AppConfig` into a bootstrapped dialect registry and answers pagination
//! questions for live connections.

use std::sync::Arc;

use config::AppConfig;
use dialect_profile::{debug_log, Dialect, RowSelection};
use dialect_registry::{builtin, DatabaseMetadata, DialectRegistry, TypeCatalog};
use limit_binder::{compute_bind_layout, BindLayout};

use crate::errors::SqlDialectError;

/// Main coordinator owning the dialect registry
#[derive(Debug, Clone)]
pub struct SqlDialect {
    registry: Arc<DialectRegistry>,
    config: Arc<AppConfig>,
}

impl SqlDialect {
    /// Build a registry over the built-in type catalog
    pub fn new(config: AppConfig) -> Result<Self, SqlDialectError> {
        Self::with_catalog(config, Arc::new(TypeCatalog::builtin()))
    }

    /// Load configuration from the environment and build the registry
    pub fn load() -> Result<Self, SqlDialectError> {
        Self::new(AppConfig::load()?)
    }

    /// Build a registry loading types from `catalog`.
    ///
    /// Built-ins are bootstrapped first (failures skipped), then the
    /// database-id file is read (failures logged), then the configured
    /// overrides, profiles and registrations are applied. A failing
    /// configured registration is returned as an error.
    pub fn with_catalog(
        config: AppConfig,
        catalog: Arc<TypeCatalog>,
    ) -> Result<Self, SqlDialectError> {
        config.validate()?;
        let registry = DialectRegistry::with_catalog(catalog);

        if config.registry.load_builtins {
            registry.bootstrap(&builtin::dialect_type_names());
        }

        if let Some(path) = &config.registry.database_id_file {
            match registry.database_ids().load_file(path) {
                Ok(_count) => {
                    debug_log!("loaded {} database ids from {}", _count, path);
                }
                Err(err) => {
                    tracing::error!("Can't read database id file {}: {}", path, err);
                }
            }
        }

        for (keyword, name) in &config.database_ids {
            registry.database_ids().set_override(keyword, name);
        }

        for profile in &config.profiles {
            registry.register_profile(&profile.name, profile.profile)?;
        }

        for dialect in &config.dialects {
            registry.register(dialect.name.as_deref(), &dialect.implementation)?;
        }

        Ok(Self {
            registry: Arc::new(registry),
            config: Arc::new(config),
        })
    }

    /// Get registry reference
    pub fn registry(&self) -> &DialectRegistry {
        &self.registry
    }

    /// Shared handle to the registry
    pub fn shared_registry(&self) -> Arc<DialectRegistry> {
        Arc::clone(&self.registry)
    }

    /// Get current configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Dialect for a live connection
    pub fn resolve(&self, metadata: &Arc<dyn DatabaseMetadata>) -> Option<Arc<dyn Dialect>> {
        self.registry.resolve_by_connection_metadata(metadata)
    }

    /// Dialect registered under `name`
    pub fn resolve_by_name(&self, name: &str) -> Option<Arc<dyn Dialect>> {
        self.registry.resolve_by_name(name)
    }

    /// Pagination parameters for a statement on this connection, or `None`
    /// when no dialect is known for it
    pub fn pagination_layout(
        &self,
        metadata: &Arc<dyn DatabaseMetadata>,
        selection: &RowSelection,
        start_index: usize,
    ) -> Option<BindLayout> {
        let dialect = self.resolve(metadata)?;
        Some(compute_bind_layout(dialect.as_ref(), selection, start_index))
    }
}
