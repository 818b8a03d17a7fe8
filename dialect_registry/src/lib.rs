//! Dialect registry for sqldialect
//!
//! This crate resolves which dialect applies to a type name, a registered
//! name or a live connection, and ships the built-in dialect catalog.

pub mod builtin;
pub mod database_id;
pub mod errors;
pub mod loader;
pub mod metadata;
pub mod prelude;
pub mod registry;

#[cfg(test)]
mod tests;

pub use database_id::{parse_properties, DatabaseIdResolver};
pub use errors::{LoadError, RegistryError, ShapeError};
pub use loader::{
    DialectConstructor, DialectType, DriverAwareConstructor, DriverConstructor, DriverType,
    LoadableType, TypeCatalog, TypeLoader,
};
pub use metadata::{ConnectionMetadata, DatabaseMetadata, MetadataCache};
pub use registry::DialectRegistry;
