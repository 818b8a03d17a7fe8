//! Parameter sinks
//!
//! A sink is whatever accepts integer parameters by position, usually a
//! prepared statement wrapper.

use std::collections::BTreeMap;
use std::convert::Infallible;

/// Positional integer binder
pub trait ParameterSink {
    type Error;

    fn bind_i64(&mut self, index: usize, value: i64) -> Result<(), Self::Error>;
}

/// In-memory sink recording every bound parameter by position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindBuffer {
    values: BTreeMap<usize, i64>,
}

impl BindBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<i64> {
        self.values.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bound (position, value) pairs in position order
    pub fn entries(&self) -> Vec<(usize, i64)> {
        self.values.iter().map(|(k, v)| (*k, *v)).collect()
    }
}

impl ParameterSink for BindBuffer {
    type Error = Infallible;

    fn bind_i64(&mut self, index: usize, value: i64) -> Result<(), Self::Error> {
        self.values.insert(index, value);
        Ok(())
    }
}
