//! Limit handler
//!
//! Splits pagination binding between the two places a statement can carry
//! its limit clause: before the query's own parameters or after them.

use dialect_profile::{debug_log, Dialect, RowSelection};

use crate::layout::{self, BindLayout};
use crate::sink::ParameterSink;

/// Binds limit/offset parameters for one dialect
#[derive(Debug, Clone, Copy)]
pub struct LimitHandler<'a, D: ?Sized> {
    dialect: &'a D,
}

impl<'a, D> LimitHandler<'a, D>
where
    D: Dialect + ?Sized,
{
    pub fn new(dialect: &'a D) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> &'a D {
        self.dialect
    }

    /// Full layout regardless of where the dialect places it
    pub fn bind_layout(&self, selection: &RowSelection, index: usize) -> BindLayout {
        layout::compute_bind_layout(self.dialect, selection, index)
    }

    pub fn max_or_limit(&self, selection: &RowSelection) -> Option<i64> {
        layout::max_or_limit(self.dialect, selection)
    }

    /// Layout for the start of the statement; empty unless the dialect binds limits first
    pub fn layout_at_start_of_query(&self, selection: &RowSelection, index: usize) -> BindLayout {
        if self.dialect.profile().bind_limit_parameters_first() {
            self.bind_layout(selection, index)
        } else {
            BindLayout::empty(index)
        }
    }

    /// Layout for the end of the statement; empty when the dialect binds limits first
    pub fn layout_at_end_of_query(&self, selection: &RowSelection, index: usize) -> BindLayout {
        if self.dialect.profile().bind_limit_parameters_first() {
            BindLayout::empty(index)
        } else {
            self.bind_layout(selection, index)
        }
    }

    /// Bind the start-of-query parameters, returning how many were bound
    pub fn bind_limit_parameters_at_start_of_query<S>(
        &self,
        selection: &RowSelection,
        sink: &mut S,
        index: usize,
    ) -> Result<usize, S::Error>
    where
        S: ParameterSink + ?Sized,
    {
        let layout = self.layout_at_start_of_query(selection, index);
        bind_layout(&layout, sink)
    }

    /// Bind the end-of-query parameters, returning how many were bound
    pub fn bind_limit_parameters_at_end_of_query<S>(
        &self,
        selection: &RowSelection,
        sink: &mut S,
        index: usize,
    ) -> Result<usize, S::Error>
    where
        S: ParameterSink + ?Sized,
    {
        let layout = self.layout_at_end_of_query(selection, index);
        bind_layout(&layout, sink)
    }
}

/// Write every parameter of `layout` into `sink`
pub fn bind_layout<S>(layout: &BindLayout, sink: &mut S) -> Result<usize, S::Error>
where
    S: ParameterSink + ?Sized,
{
    for parameter in layout.parameters() {
        sink.bind_i64(parameter.position, parameter.value)?;
    }
    if !layout.is_empty() {
        debug_log!(
            "bound {} pagination parameter(s) at {:?}",
            layout.count(),
            layout.positions()
        );
    }
    Ok(layout.count())
}
