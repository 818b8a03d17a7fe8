//! Error types for the sqldialect crate
//!
//! This module contains all error types that can be returned by sqldialect operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqlDialectError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Dialect registration error: {0}")]
    Registry(#[from] dialect_registry::RegistryError),
}
