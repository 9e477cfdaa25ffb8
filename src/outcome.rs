//! Outcome classification of completed snapshots.

use crate::core::error::OutcomeError;
use crate::execution::progress::{Validation, ValidationState};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregate classification of a completed snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every validator accepted.
    Accepted,
    /// Some validator rejected.
    Rejected,
    /// Some validator failed at runtime.
    RuntimeError,
}

impl Outcome {
    /// Wire name of the outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Accepted => "accepted",
            Outcome::Rejected => "rejected",
            Outcome::RuntimeError => "runtime_error",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = OutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(Outcome::Accepted),
            "rejected" => Ok(Outcome::Rejected),
            "runtime_error" => Ok(Outcome::RuntimeError),
            other => Err(OutcomeError::OutComeTypeNotImplemented(other.to_string())),
        }
    }
}

/// Test a completed snapshot against an outcome.
///
/// An empty snapshot counts as rejected, and as neither accepted nor
/// failing at runtime.
pub fn check(validations: &[Validation], outcome: Outcome) -> bool {
    if validations.is_empty() {
        return outcome == Outcome::Rejected;
    }

    match outcome {
        Outcome::Rejected => validations
            .iter()
            .any(|v| v.state == ValidationState::Rejected),
        Outcome::RuntimeError => validations.iter().any(|v| v.runtime_error.is_some()),
        Outcome::Accepted => validations
            .iter()
            .all(|v| v.state == ValidationState::Accepted),
    }
}

/// Like [`check`], with the outcome given by name.
pub fn check_named(validations: &[Validation], outcome: &str) -> Result<bool, OutcomeError> {
    let outcome = outcome.parse::<Outcome>()?;
    Ok(check(validations, outcome))
}

/// Classify a completed snapshot.
///
/// Runtime errors take precedence over plain rejections. `None` when the
/// snapshot is neither accepted nor rejected (a run still in progress).
pub fn classify(validations: &[Validation]) -> Option<Outcome> {
    [Outcome::RuntimeError, Outcome::Rejected, Outcome::Accepted]
        .into_iter()
        .find(|outcome| check(validations, *outcome))
}

/// First rejected record of a snapshot, if any.
pub fn pick_rejected(validations: &[Validation]) -> Option<&Validation> {
    validations
        .iter()
        .find(|v| v.state == ValidationState::Rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::RuntimeError;
    use crate::execution::progress::ValidationState::*;

    fn snapshot(states: &[ValidationState]) -> Vec<Validation> {
        states
            .iter()
            .enumerate()
            .map(|(i, state)| Validation::with_state(((b'A' + i as u8) as char).to_string(), *state))
            .collect()
    }

    #[test]
    fn test_accepted_when_all_accepted() {
        assert!(!check(&[], Outcome::Accepted));
        assert!(check(&snapshot(&[Accepted, Accepted, Accepted]), Outcome::Accepted));
        assert!(!check(&snapshot(&[Accepted, Accepted, Pending]), Outcome::Accepted));
    }

    #[test]
    fn test_rejected_when_one_rejected() {
        assert!(check(&[], Outcome::Rejected));
        assert!(check(&snapshot(&[Accepted, Rejected, Pending]), Outcome::Rejected));
        assert!(!check(&snapshot(&[Accepted, Validating, Pending]), Outcome::Rejected));
    }

    #[test]
    fn test_runtime_error_when_one_carries_error() {
        assert!(!check(&[], Outcome::RuntimeError));

        let mut failing = snapshot(&[Accepted, Rejected, Pending]);
        failing[1].runtime_error = Some(RuntimeError::new("boom"));
        assert!(check(&failing, Outcome::RuntimeError));

        assert!(!check(&snapshot(&[Accepted, Rejected, Canceled]), Outcome::RuntimeError));
    }

    #[test]
    fn test_unknown_outcome_name() {
        let records = snapshot(&[Accepted, Validating, Pending]);
        assert_eq!(
            check_named(&records, "non_existing_outcome"),
            Err(OutcomeError::OutComeTypeNotImplemented("non_existing_outcome".to_string()))
        );
        assert!(check_named(&[], "unknown").is_err());
        assert_eq!(check_named(&[], "rejected"), Ok(true));
    }

    #[test]
    fn test_outcome_names_round_trip() {
        for outcome in [Outcome::Accepted, Outcome::Rejected, Outcome::RuntimeError] {
            assert_eq!(outcome.as_str().parse::<Outcome>(), Ok(outcome));
            assert_eq!(
                serde_json::to_string(&outcome).unwrap(),
                format!("\"{}\"", outcome)
            );
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&[]), Some(Outcome::Rejected));
        assert_eq!(classify(&snapshot(&[Accepted])), Some(Outcome::Accepted));
        assert_eq!(classify(&snapshot(&[Accepted, Rejected, Canceled])), Some(Outcome::Rejected));
        assert_eq!(classify(&snapshot(&[Validating])), None);

        let mut failing = snapshot(&[Rejected]);
        failing[0].runtime_error = Some(RuntimeError::new("boom"));
        assert_eq!(classify(&failing), Some(Outcome::RuntimeError));
    }

    #[test]
    fn test_pick_rejected() {
        assert!(pick_rejected(&[]).is_none());
        assert!(pick_rejected(&snapshot(&[Accepted, Accepted])).is_none());

        let records = snapshot(&[Accepted, Rejected, Rejected]);
        assert_eq!(pick_rejected(&records).map(|v| v.type_name.as_str()), Some("B"));
    }
}
