//! Run execution.
//!
//! This module drives a composition's validators against one value and
//! reports progress as snapshots.

pub mod progress;
pub(crate) mod runner;

pub use progress::{RunOptions, Validation, ValidationState};
