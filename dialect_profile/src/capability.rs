//! Capability profile definitions
//!
//! A `CapabilityProfile` is the flag set that drives limit/offset
//! parameter binding for one database engine.

use serde::{Deserialize, Serialize};

/// Pagination semantics of one database engine
///
/// Profiles are built once (usually when a dialect is constructed) and are
/// never mutated afterwards; every accessor is a plain read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityProfile {
    supports_variable_limit: bool,
    supports_limit_offset: bool,
    force_limit_usage: bool,
    use_max_for_limit: bool,
    bind_limit_parameters_first: bool,
    bind_limit_parameters_in_reverse_order: bool,
}

impl CapabilityProfile {
    /// A profile with every flag off: pagination is never bound as parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// `LIMIT ? OFFSET ?` style: variable limit, offset supported, count bound before offset
    pub fn limit_offset() -> Self {
        Self::new()
            .with_variable_limit(true)
            .with_limit_offset(true)
            .with_reverse_order(true)
    }

    pub fn with_variable_limit(mut self, value: bool) -> Self {
        self.supports_variable_limit = value;
        self
    }

    pub fn with_limit_offset(mut self, value: bool) -> Self {
        self.supports_limit_offset = value;
        self
    }

    pub fn with_forced_limit(mut self, value: bool) -> Self {
        self.force_limit_usage = value;
        self
    }

    pub fn with_max_for_limit(mut self, value: bool) -> Self {
        self.use_max_for_limit = value;
        self
    }

    pub fn with_parameters_first(mut self, value: bool) -> Self {
        self.bind_limit_parameters_first = value;
        self
    }

    pub fn with_reverse_order(mut self, value: bool) -> Self {
        self.bind_limit_parameters_in_reverse_order = value;
        self
    }

    /// The engine accepts a limit that varies per query
    pub fn supports_variable_limit(&self) -> bool {
        self.supports_variable_limit
    }

    /// The engine supports an offset in addition to a row cap
    pub fn supports_limit_offset(&self) -> bool {
        self.supports_limit_offset
    }

    /// The offset clause is emitted even when the offset is zero
    pub fn force_limit_usage(&self) -> bool {
        self.force_limit_usage
    }

    /// The bound "limit" is the last row index (offset + count), not a count
    pub fn use_max_for_limit(&self) -> bool {
        self.use_max_for_limit
    }

    /// Limit parameters precede the statement's own parameters
    pub fn bind_limit_parameters_first(&self) -> bool {
        self.bind_limit_parameters_first
    }

    /// The row-count parameter is bound before the offset parameter
    pub fn bind_limit_parameters_in_reverse_order(&self) -> bool {
        self.bind_limit_parameters_in_reverse_order
    }
}
