//! # Fieldcheck - Composable Field Validation
//!
//! Fieldcheck runs an ordered chain of validators against a single value and
//! reports progress as snapshots while the chain runs.
//!
//! ## Features
//!
//! - **Named rules**: Every validator carries a SCREAMING_SNAKE_CASE type identifier
//! - **Parametrized rules**: Initable validators bind their parameters with `init`
//! - **Progress snapshots**: A callback sees every state transition of a run
//! - **Short-circuit**: The first rejection cancels every validator after it
//! - **Failure capture**: Predicate errors and panics become data on the rejected record
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fieldcheck::prelude::*;
//!
//! let catalog = Catalog::with_builtins()?;
//!
//! let username = catalog.compose(&[
//!     RuleSpec::new("NOT_EMPTY"),
//!     RuleSpec::with_params("MIN_LENGTH", vec![Value::Integer(3)]),
//! ])?;
//!
//! let run = username.validate(Value::from("ab"), RunOptions::default(), |snapshot, done| {
//!     println!("{:?} done={}", snapshot, done);
//! })?;
//! let last = pollster::block_on(run);
//!
//! assert!(check(&last, Outcome::Rejected));
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Values, identifier style and error types
//! - [`validator`]: Predicate shapes and the validator factory
//! - [`composition`]: Ordered validator bundles with `init` and the run entrypoint
//! - [`execution`]: The sequential runner and snapshot records
//! - [`outcome`]: Classification of completed snapshots
//! - [`catalog`]: Named rule catalogs, built-in rules and chain files
//!
//! ## Defining Rules
//!
//! ```rust,ignore
//! use fieldcheck::prelude::*;
//!
//! let is_foo = validator(ValidatorConfig::new(
//!     "IS_FOO",
//!     Method::predicate(|v| Ok(v.as_string() == Some("foo"))),
//! ))?;
//!
//! let contains = validator(ValidatorConfig::new(
//!     "CONTAINS",
//!     Method::generator(|params: &[Value]| {
//!         let needle = params
//!             .first()
//!             .and_then(Value::as_string)
//!             .ok_or_else(|| RuntimeError::new("needle must be text"))?
//!             .to_string();
//!         Ok(move |v: &Value| -> Verdict {
//!             Ok(v.as_string().is_some_and(|s| s.contains(&needle)))
//!         })
//!     }),
//! ))?;
//!
//! let field = Composition::new(vec![is_foo, contains])
//!     .init(vec![("CONTAINS", vec![Value::from("oo")])])?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod composition;
pub mod core;
pub mod execution;
pub mod outcome;
pub mod validator;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use fieldcheck::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::Value;
    pub use crate::core::identifier::matches_style;

    // Errors
    pub use crate::core::error::{
        CatalogError, ConfigError, DefinitionError, FieldCheckError, FieldCheckResult, InitError,
        OutcomeError, RunError, RunId, RuntimeError, Verdict,
    };

    // Validators
    pub use crate::validator::factory::{
        validator, FinalValidator, InitableValidator, InitedValidator, Validator, ValidatorConfig,
    };
    pub use crate::validator::method::{
        future_predicate, predicate, Generator, Method, Predicate, PredicateFuture,
    };

    // Composition and runs
    pub use crate::composition::{run, Composition};
    pub use crate::execution::progress::{RunOptions, Validation, ValidationState};

    // Outcomes
    pub use crate::outcome::{check, check_named, classify, pick_rejected, Outcome};

    // Catalog
    pub use crate::catalog::chain::{ChainConfig, RuleSpec};
    pub use crate::catalog::registry::{Catalog, CatalogBuilder, CatalogEntry};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
