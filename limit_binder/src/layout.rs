//! Bind layout computation
//!
//! `compute_bind_layout` is a pure function of the dialect, the row
//! selection and the first free parameter index.

use dialect_profile::{trace_log, Dialect, RowSelection};

/// Which half of the limit/offset pair a parameter carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitParameter {
    /// The (converted) first row
    FirstRow,
    /// Row count, or last row index when the dialect uses max-for-limit
    MaxOrLimit,
}

/// One pagination parameter slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundParameter {
    pub position: usize,
    pub value: i64,
    pub kind: LimitParameter,
}

/// Pagination parameters a statement needs, ordered by position
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BindLayout {
    start_index: usize,
    parameters: Vec<BoundParameter>,
}

impl BindLayout {
    /// Layout binding nothing
    pub fn empty(start_index: usize) -> Self {
        Self {
            start_index,
            parameters: Vec::new(),
        }
    }

    /// Number of parameters to bind: 0, 1 or 2
    pub fn count(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    pub fn parameters(&self) -> &[BoundParameter] {
        &self.parameters
    }

    pub fn positions(&self) -> Vec<usize> {
        self.parameters.iter().map(|p| p.position).collect()
    }

    pub fn values(&self) -> Vec<i64> {
        self.parameters.iter().map(|p| p.value).collect()
    }

    /// Value carried by the given half of the pair, if it is bound
    pub fn value_of(&self, kind: LimitParameter) -> Option<i64> {
        self.parameters
            .iter()
            .find(|p| p.kind == kind)
            .map(|p| p.value)
    }
}

/// Value bound for the row cap: `limit`, or `limit + first_row` for dialects
/// that bind the last row index. `None` when the selection has no cap.
pub fn max_or_limit<D>(dialect: &D, selection: &RowSelection) -> Option<i64>
where
    D: Dialect + ?Sized,
{
    let limit = selection.limit?;
    if dialect.profile().use_max_for_limit() {
        let first_row = dialect.convert_first_row(selection.first_row);
        Some(limit.saturating_add(first_row))
    } else {
        Some(limit)
    }
}

/// Compute the pagination parameters for `selection`, starting at `start_index`
pub fn compute_bind_layout<D>(dialect: &D, selection: &RowSelection, start_index: usize) -> BindLayout
where
    D: Dialect + ?Sized,
{
    let profile = dialect.profile();
    if !profile.supports_variable_limit() {
        return BindLayout::empty(start_index);
    }
    let Some(max_or_limit) = max_or_limit(dialect, selection) else {
        return BindLayout::empty(start_index);
    };

    let first_row = dialect.convert_first_row(selection.first_row);
    let has_first_row =
        profile.supports_limit_offset() && (first_row > 0 || profile.force_limit_usage());

    let parameters = if has_first_row {
        let offset = BoundParameter {
            position: 0,
            value: first_row,
            kind: LimitParameter::FirstRow,
        };
        let cap = BoundParameter {
            position: 0,
            value: max_or_limit,
            kind: LimitParameter::MaxOrLimit,
        };
        let ordered = if profile.bind_limit_parameters_in_reverse_order() {
            [cap, offset]
        } else {
            [offset, cap]
        };
        ordered
            .into_iter()
            .enumerate()
            .map(|(i, p)| BoundParameter {
                position: start_index + i,
                ..p
            })
            .collect()
    } else {
        vec![BoundParameter {
            position: start_index,
            value: max_or_limit,
            kind: LimitParameter::MaxOrLimit,
        }]
    };

    trace_log!(
        "pagination layout from index {}: {:?}",
        start_index,
        parameters
    );

    BindLayout {
        start_index,
        parameters,
    }
}
