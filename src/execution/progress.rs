//! Per-run progress records and snapshot emission.

use crate::core::error::{RunId, RuntimeError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of one validator within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationState {
    /// Waiting for its turn.
    Pending,
    /// Predicate is being awaited.
    Validating,
    /// Predicate resolved true.
    Accepted,
    /// Predicate resolved false or failed.
    Rejected,
    /// Skipped because an earlier validator rejected.
    Canceled,
}

impl ValidationState {
    /// Whether no further transition can happen.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ValidationState::Accepted | ValidationState::Rejected | ValidationState::Canceled
        )
    }
}

impl fmt::Display for ValidationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationState::Pending => "PENDING",
            ValidationState::Validating => "VALIDATING",
            ValidationState::Accepted => "ACCEPTED",
            ValidationState::Rejected => "REJECTED",
            ValidationState::Canceled => "CANCELED",
        };
        f.write_str(name)
    }
}

/// One validator's record within a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    /// Type identifier of the validator.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Current state.
    pub state: ValidationState,
    /// Set only when the predicate failed at runtime.
    #[serde(rename = "runtimeError", default, skip_serializing_if = "Option::is_none")]
    pub runtime_error: Option<RuntimeError>,
}

impl Validation {
    /// A fresh pending record.
    pub fn pending(type_name: impl Into<String>) -> Self {
        Self::with_state(type_name, ValidationState::Pending)
    }

    /// A record in the given state, without runtime error.
    pub fn with_state(type_name: impl Into<String>, state: ValidationState) -> Self {
        Self {
            type_name: type_name.into(),
            state,
            runtime_error: None,
        }
    }

    /// A rejected record carrying a runtime error.
    pub fn failed(type_name: impl Into<String>, error: RuntimeError) -> Self {
        Self {
            type_name: type_name.into(),
            state: ValidationState::Rejected,
            runtime_error: Some(error),
        }
    }
}

/// Options accepted by the run entrypoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    /// Suppress every emission except the final `done = true` one.
    pub only_on_completed: bool,
}

impl RunOptions {
    /// Options emitting only the completed snapshot.
    pub fn only_on_completed() -> Self {
        Self {
            only_on_completed: true,
        }
    }
}

/// Owns the snapshot of one run and forwards it to the caller's callback.
pub(crate) struct SnapshotEmitter<F> {
    run_id: RunId,
    snapshot: Vec<Validation>,
    only_on_completed: bool,
    on_change: F,
    emitted: usize,
}

impl<F> SnapshotEmitter<F>
where
    F: FnMut(&[Validation], bool),
{
    pub(crate) fn new(
        run_id: RunId,
        snapshot: Vec<Validation>,
        options: RunOptions,
        on_change: F,
    ) -> Self {
        Self {
            run_id,
            snapshot,
            only_on_completed: options.only_on_completed,
            on_change,
            emitted: 0,
        }
    }

    /// Move record `index` to `state` and emit.
    pub(crate) fn transition(&mut self, index: usize, state: ValidationState) {
        if let Some(record) = self.snapshot.get_mut(index) {
            record.state = state;
        }
        self.emit(false);
    }

    /// Reject record `index` with a runtime error and emit.
    pub(crate) fn fail(&mut self, index: usize, error: RuntimeError) {
        if let Some(record) = self.snapshot.get_mut(index) {
            record.state = ValidationState::Rejected;
            record.runtime_error = Some(error);
        }
        self.emit(false);
    }

    pub(crate) fn emit(&mut self, done: bool) {
        if self.only_on_completed && !done {
            return;
        }
        self.emitted += 1;
        log::trace!("run {}: emission #{} (done={})", self.run_id, self.emitted, done);
        (self.on_change)(&self.snapshot, done);
    }

    /// Hand back the final snapshot.
    pub(crate) fn finish(self) -> Vec<Validation> {
        self.snapshot
    }
}
