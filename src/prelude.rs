//! Convenience re-exports for common sqldialect usage
//!
//! # Example
//!
//! ```rust
//! use sqldialect::prelude::*;
//!
//! // Now you have access to the registry, the dialect contracts and the limit binder
//! ```

// Core components
pub use crate::core::SqlDialect;
pub use crate::errors::SqlDialectError;

// Re-export centralized config
pub use config::{AppConfig, DialectRegistration, ProfileConfig, RegistryConfig};

// Dialect contracts and registry
pub use dialect_registry::prelude::*;

// Limit binding
pub use limit_binder::{BindBuffer, BindLayout, LimitHandler, LimitParameter, ParameterSink};
