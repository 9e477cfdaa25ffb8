//! Core types shared by every stage of fieldcheck.
//!
//! This module contains:
//! - The dynamic [`Value`] handed to predicates and generators
//! - The identifier naming convention
//! - Error types and the [`RuntimeError`] carried by rejected records

pub mod error;
pub mod identifier;
pub mod types;

// Re-export commonly used types
pub use error::{
    CatalogError, ConfigError, DefinitionError, FieldCheckError, FieldCheckResult, InitError,
    OutcomeError, RunError, RunId, RuntimeError, Verdict,
};
pub use identifier::matches_style;
pub use types::Value;
