//! Sequential pipeline runner.
//!
//! Drives a fully-final validator list against one value, one validator at a
//! time, emitting a snapshot at every state transition. The first rejection
//! cancels every validator after it.

use crate::core::error::{RunId, RuntimeError, Verdict};
use crate::core::types::Value;
use crate::execution::progress::{RunOptions, SnapshotEmitter, Validation, ValidationState};
use crate::validator::method::Predicate;
use futures::FutureExt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// A validator reduced to what the runner needs.
#[derive(Clone)]
pub(crate) struct Step {
    pub(crate) type_name: Arc<str>,
    pub(crate) predicate: Predicate,
}

/// Run `steps` against `value`, reporting through `on_change`.
///
/// Resolves to the final snapshot. Predicate errors and panics are captured
/// into the rejected record and never escape.
pub(crate) async fn run_pipeline<F>(
    steps: Vec<Step>,
    value: Value,
    options: RunOptions,
    on_change: F,
) -> Vec<Validation>
where
    F: FnMut(&[Validation], bool),
{
    let run_id = RunId::new();
    let snapshot = steps
        .iter()
        .map(|step| Validation::pending(&*step.type_name))
        .collect();
    let mut emitter = SnapshotEmitter::new(run_id, snapshot, options, on_change);

    log::debug!("run {}: starting with {} validator(s)", run_id, steps.len());

    if steps.is_empty() {
        emitter.emit(true);
        return emitter.finish();
    }
    emitter.emit(false);

    let mut rejected = false;
    for (index, step) in steps.iter().enumerate() {
        if rejected {
            log::debug!("run {}: {} canceled", run_id, step.type_name);
            emitter.transition(index, ValidationState::Canceled);
            continue;
        }

        emitter.transition(index, ValidationState::Validating);
        match invoke(&step.predicate, value.clone()).await {
            Ok(true) => {
                log::debug!("run {}: {} accepted", run_id, step.type_name);
                emitter.transition(index, ValidationState::Accepted);
            }
            Ok(false) => {
                log::debug!("run {}: {} rejected", run_id, step.type_name);
                rejected = true;
                emitter.transition(index, ValidationState::Rejected);
            }
            Err(error) => {
                log::debug!("run {}: {} failed: {}", run_id, step.type_name, error);
                rejected = true;
                emitter.fail(index, error);
            }
        }
    }

    // The last transition is replayed once more, now flagged as done.
    emitter.emit(true);
    emitter.finish()
}

/// Call a predicate and await it, turning panics into runtime errors.
async fn invoke(predicate: &Predicate, value: Value) -> Verdict {
    let future = match catch_unwind(AssertUnwindSafe(|| predicate(value))) {
        Ok(future) => future,
        Err(payload) => return Err(RuntimeError::from_panic(payload)),
    };

    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| Err(RuntimeError::from_panic(payload)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::method::{future_predicate, predicate};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn step(type_name: &str, predicate: Predicate) -> Step {
        Step {
            type_name: Arc::from(type_name),
            predicate,
        }
    }

    fn constant(type_name: &str, verdict: bool) -> Step {
        step(type_name, predicate(move |_| Ok(verdict)))
    }

    fn collect(steps: Vec<Step>, options: RunOptions) -> (Vec<(Vec<Validation>, bool)>, Vec<Validation>) {
        let mut calls = Vec::new();
        let last = pollster::block_on(run_pipeline(
            steps,
            Value::from("foo"),
            options,
            |snapshot: &[Validation], done: bool| calls.push((snapshot.to_vec(), done)),
        ));
        (calls, last)
    }

    fn states(snapshot: &[Validation]) -> Vec<ValidationState> {
        snapshot.iter().map(|v| v.state).collect()
    }

    #[test]
    fn test_empty_list_emits_once_done() {
        let (calls, last) = collect(vec![], RunOptions::default());
        assert_eq!(calls, vec![(vec![], true)]);
        assert!(last.is_empty());
    }

    #[test]
    fn test_single_validator_emission_sequence() {
        use crate::execution::progress::ValidationState::*;

        let (calls, _) = collect(vec![constant("IS_FOO", true)], RunOptions::default());
        let observed: Vec<_> = calls.iter().map(|(s, done)| (states(s), *done)).collect();
        assert_eq!(
            observed,
            vec![
                (vec![Pending], false),
                (vec![Validating], false),
                (vec![Accepted], false),
                (vec![Accepted], true),
            ]
        );
    }

    #[test]
    fn test_rejection_cancels_rest_without_invoking() {
        use crate::execution::progress::ValidationState::*;

        let invoked = Arc::new(AtomicUsize::new(0));
        let counter = invoked.clone();
        let tail = step(
            "C",
            predicate(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            }),
        );

        let (calls, last) = collect(
            vec![constant("A", true), constant("B", false), tail],
            RunOptions::default(),
        );
        assert_eq!(states(&last), vec![Accepted, Rejected, Canceled]);
        assert_eq!(invoked.load(Ordering::SeqCst), 0);
        // Pending, A validating/accepted, B validating/rejected, C canceled, done.
        assert_eq!(calls.len(), 7);
        assert_eq!(calls[5], (last.clone(), false));
        assert_eq!(calls[6], (last, true));
    }

    #[test]
    fn test_returned_error_becomes_runtime_error() {
        use crate::execution::progress::ValidationState::*;

        let bomb = step("IS_BOMB", predicate(|_| Err(RuntimeError::new("boom"))));
        let (_, last) = collect(
            vec![constant("A", true), bomb, constant("C", true)],
            RunOptions::only_on_completed(),
        );
        assert_eq!(states(&last), vec![Accepted, Rejected, Canceled]);
        assert_eq!(last[1].runtime_error, Some(RuntimeError::new("boom")));
        assert!(last[0].runtime_error.is_none());
        assert!(last[2].runtime_error.is_none());
    }

    #[test]
    fn test_panics_are_captured() {
        use crate::execution::progress::ValidationState::*;

        let sync_panic = step("SYNC_PANIC", Arc::new(|_: Value| -> crate::validator::PredicateFuture {
            panic!("sync boom")
        }));
        let (_, last) = collect(vec![sync_panic], RunOptions::default());
        assert_eq!(states(&last), vec![Rejected]);
        let error = last[0].runtime_error.clone().unwrap();
        assert!(error.panicked);
        assert_eq!(error.message, "sync boom");

        let async_panic = step(
            "ASYNC_PANIC",
            future_predicate(|_: Value| async move {
                if true {
                    panic!("async boom");
                }
                Ok::<_, RuntimeError>(true)
            }),
        );
        let (_, last) = collect(vec![async_panic, constant("NEXT", true)], RunOptions::default());
        assert_eq!(states(&last), vec![Rejected, Canceled]);
        assert_eq!(last[0].runtime_error.as_ref().map(|e| e.message.as_str()), Some("async boom"));
    }

    #[test]
    fn test_async_predicates_see_the_same_value() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let make = |name: &str| {
            let seen = seen.clone();
            step(
                name,
                future_predicate(move |value: Value| {
                    let seen = seen.clone();
                    async move {
                        seen.lock().push(value.clone());
                        Ok::<_, RuntimeError>(true)
                    }
                }),
            )
        };

        let (_, last) = collect(vec![make("A"), make("B")], RunOptions::default());
        assert!(last.iter().all(|v| v.state == ValidationState::Accepted));
        assert_eq!(*seen.lock(), vec![Value::from("foo"), Value::from("foo")]);
    }
}
