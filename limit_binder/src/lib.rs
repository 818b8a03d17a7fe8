//! Limit/offset parameter binding
//!
//! This crate computes how many pagination bind parameters a statement
//! needs, in which order and at which position, from a dialect's
//! `CapabilityProfile` alone.

pub mod handler;
pub mod layout;
pub mod sink;


pub use handler::{bind_layout, LimitHandler};
pub use layout::{compute_bind_layout, max_or_limit, BindLayout, BoundParameter, LimitParameter};
pub use sink::{BindBuffer, ParameterSink};
