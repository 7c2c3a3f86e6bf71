//! Filter and aggregation engine behind the rankings explorer.
//!
//! The `data` module holds everything that transforms records; the viewer
//! binary only builds [`data::FilterCriteria`] snapshots and renders what
//! comes back.

pub mod config;
pub mod data;
