//! Convenience re-exports for common dialect-registry usage

// Registry components
pub use crate::database_id::DatabaseIdResolver;
pub use crate::errors::{LoadError, RegistryError, ShapeError};
pub use crate::loader::{DialectType, DriverType, TypeCatalog};
pub use crate::metadata::{ConnectionMetadata, DatabaseMetadata};
pub use crate::registry::DialectRegistry;

// Dialect contracts
pub use dialect_profile::{CapabilityProfile, Dialect, Driver, RowSelection};
