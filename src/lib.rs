//! # sqldialect
//!
//! Runtime SQL dialect identification and limit/offset parameter binding,
//! so SQL-generating code can stay agnostic of the engine it talks to.
//!
//! ## Quick Start
//!
//! ```rust
//! use sqldialect::prelude::*;
//!
//! fn main() -> Result<(), SqlDialectError> {
//!     let dialects = SqlDialect::new(AppConfig::default())?;
//!
//!     let connection = ConnectionMetadata::new("PostgreSQL").into_shared();
//!     let dialect = dialects.resolve(&connection).expect("postgres is built in");
//!
//!     // SELECT ... WHERE owner = ? LIMIT ? OFFSET ?
//!     let handler = LimitHandler::new(dialect.as_ref());
//!     let mut statement = BindBuffer::new();
//!     let selection = RowSelection::page(40, 20);
//!     let bound = handler
//!         .bind_limit_parameters_at_end_of_query(&selection, &mut statement, 2)
//!         .unwrap_or_default();
//!
//!     assert_eq!(bound, 2);
//!     assert_eq!(statement.entries(), vec![(2, 20), (3, 40)]);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use crate::core::SqlDialect;
pub use crate::errors::SqlDialectError;

// Re-export centralized config
pub use config::{AppConfig, DialectRegistration, ProfileConfig, RegistryConfig};

// Re-export internal crates
pub use config;
pub use dialect_profile;
pub use dialect_registry;
pub use limit_binder;

// Logging macros live with the dialect contracts
pub use dialect_profile::{debug_log, trace_log};
