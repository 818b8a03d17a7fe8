//! Dialect and driver contracts
//!
//! Every registered dialect implementation exposes a `CapabilityProfile`.
//! Drivers are only consulted when a dialect is built through its
//! driver-aware constructor.

use std::fmt::Debug;
use std::sync::Arc;

use crate::capability::CapabilityProfile;

/// Database driver handed to driver-aware dialect constructors
pub trait Driver: Debug + Send + Sync {
    /// Fully qualified type name the driver was loaded under
    fn type_name(&self) -> &str;

    fn major_version(&self) -> u32;

    fn minor_version(&self) -> u32;
}

/// Per-engine behavior profile
pub trait Dialect: Debug + Send + Sync {
    fn profile(&self) -> &CapabilityProfile;

    /// Transform the zero-based first row into the value the engine expects
    fn convert_first_row(&self, zero_based_first_row: i64) -> i64 {
        zero_based_first_row
    }

    /// Driver injected at construction, if the driver-aware path was taken
    fn driver(&self) -> Option<&Arc<dyn Driver>> {
        None
    }
}

impl Dialect for CapabilityProfile {
    fn profile(&self) -> &CapabilityProfile {
        self
    }
}

/// Dialect defined purely by data, e.g. from a configuration file
#[derive(Debug, Clone)]
pub struct ProfileDialect {
    name: String,
    profile: CapabilityProfile,
}

impl ProfileDialect {
    pub fn new(name: impl Into<String>, profile: CapabilityProfile) -> Self {
        Self {
            name: name.into(),
            profile,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Dialect for ProfileDialect {
    fn profile(&self) -> &CapabilityProfile {
        &self.profile
    }
}
