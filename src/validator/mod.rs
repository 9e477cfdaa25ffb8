//! Validator values and the factory that builds them.

pub mod factory;
pub mod method;

pub use factory::{
    validator, FinalValidator, InitableValidator, InitedValidator, Validator, ValidatorConfig,
};
pub use method::{Generator, Method, Predicate, PredicateFuture};
