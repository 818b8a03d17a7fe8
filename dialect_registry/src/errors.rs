//! Error types for dialect registration
//!
//! Only `register` and its callers fail; every lookup reports a miss as
//! `None` instead.

use thiserror::Error;

/// A type name could not be turned into a usable implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Type not found in any catalog: {type_name}")]
    NotFound { type_name: String },

    #[error("Type {type_name} does not implement {expected}")]
    ContractMismatch {
        type_name: String,
        expected: &'static str,
    },
}

/// A located implementation carries invalid metadata or cannot be built
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("Declared dialect name is empty in {type_name}")]
    EmptyDeclaredName { type_name: String },

    #[error("Declared driver type is empty in {type_name}")]
    EmptyDriverName { type_name: String },

    #[error("Cannot derive a dialect name from {type_name}")]
    EmptyDerivedName { type_name: String },

    #[error("Supplied dialect name is empty")]
    EmptySuppliedName,

    #[error("Type {type_name} has neither a driver-aware nor a no-argument constructor")]
    NoConstructor { type_name: String },
}

/// Dialect registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Shape error: {0}")]
    Shape(#[from] ShapeError),
}
