//! Error types for fieldcheck.
//!
//! Construction and API-misuse failures are `thiserror` enums grouped by the
//! phase that raises them. A predicate failing while a run is in progress is
//! not an error of the run: it becomes a [`RuntimeError`] attached to the
//! rejected record.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Identifier of a single run, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Create a new random run ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Top-level error type for fieldcheck.
#[derive(Error, Debug)]
pub enum FieldCheckError {
    #[error("Definition error: {0}")]
    Definition(#[from] DefinitionError),

    #[error("Init error: {0}")]
    Init(#[from] InitError),

    #[error("Run error: {0}")]
    Run(#[from] RunError),

    #[error("Outcome error: {0}")]
    Outcome(#[from] OutcomeError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while turning a descriptor into a validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("Identifier '{identifier}' must be uppercase words joined by single underscores")]
    InvalidIdentifierStyle { identifier: String },

    #[error("Method of '{identifier}' needs to be a function: {reason}")]
    MethodNeedsToBeAFunction { identifier: String, reason: String },
}

/// Errors raised while binding parameters to initable validators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InitError {
    #[error("Missing init values for '{type_name}' at position {position}")]
    MissingInit { type_name: String, position: usize },

    #[error("Init value for '{got}' given where '{expected}' (position {position}) expects one")]
    InitOrderTypeMismatch {
        expected: String,
        got: String,
        position: usize,
    },

    #[error("{remaining} init value(s) left over, first for '{first}'")]
    ExcessInit { first: String, remaining: usize },

    #[error("Invalid init parameters for '{type_name}': {message}")]
    InvalidParams { type_name: String, message: String },
}

/// Errors raised by the run entrypoint before any validator is invoked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    #[error("Call init first, then validate (uninitialized: {pending:?})")]
    CalledValidateOnInitable { pending: Vec<String> },
}

/// Errors raised by the outcome classifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OutcomeError {
    #[error("Outcome type '{0}' is not implemented")]
    OutComeTypeNotImplemented(String),
}

/// Errors raised by a validator catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Type '{0}' already exists in a strict catalog")]
    TypeExists(String),

    #[error("Type '{0}' is not registered")]
    UnknownType(String),

    #[error("Type '{0}' is not initable but parameters were given")]
    UnexpectedParams(String),
}

/// Errors raised while loading a chain configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read chain file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse chain config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A predicate that failed instead of producing a verdict.
///
/// Carried as data on a rejected record. `panicked` tells a returned error
/// apart from a captured panic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeError {
    /// Human-readable failure message.
    pub message: String,
    /// Whether the predicate panicked rather than returning `Err`.
    #[serde(default)]
    pub panicked: bool,
}

impl RuntimeError {
    /// Create a runtime error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            panicked: false,
        }
    }

    /// Build a runtime error from any error value, keeping its source chain.
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::new(message)
    }

    /// Build a runtime error from a caught panic payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        Self {
            message,
            panicked: true,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.panicked {
            write!(f, "panicked: {}", self.message)
        } else {
            f.write_str(&self.message)
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<anyhow::Error> for RuntimeError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(format!("{:#}", error))
    }
}

impl From<&str> for RuntimeError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for RuntimeError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Result type alias for fieldcheck operations.
pub type FieldCheckResult<T> = Result<T, FieldCheckError>;

/// Result type alias for a predicate verdict.
pub type Verdict = Result<bool, RuntimeError>;
