//! Row selection
//!
//! The (offset, limit) pair a paginated query asks for.

use serde::{Deserialize, Serialize};

/// Page of rows requested by one query
///
/// `first_row` is zero based. A missing `limit` means "no cap"; negative
/// values are passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RowSelection {
    pub first_row: i64,
    pub limit: Option<i64>,
}

impl RowSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection starting at `first_row` capped at `limit` rows
    pub fn page(first_row: i64, limit: i64) -> Self {
        Self {
            first_row,
            limit: Some(limit),
        }
    }

    pub fn with_first_row(mut self, first_row: i64) -> Self {
        self.first_row = first_row;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a row cap is present (a cap of zero still counts)
    pub fn has_max_rows(&self) -> bool {
        self.limit.is_some()
    }
}
