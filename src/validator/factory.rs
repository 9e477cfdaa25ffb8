//! Validator factory.
//!
//! Turns a [`ValidatorConfig`] into a [`Validator`] value. Non-initable rules
//! become [`FinalValidator`]s straight away; initable rules become
//! [`InitableValidator`]s whose `init` produces a fresh [`InitedValidator`]
//! on every call.

use crate::core::error::{DefinitionError, InitError};
use crate::core::identifier::matches_style;
use crate::core::types::Value;
use crate::validator::method::{Generator, Method, Predicate, PredicateFuture};
use std::fmt;
use std::sync::Arc;

/// Descriptor of a rule, as supplied by the caller.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Type identifier, SCREAMING_SNAKE_CASE.
    pub identifier: String,
    /// The predicate, or predicate generator when `initable`.
    pub method: Option<Method>,
    /// Whether the rule needs init parameters before it can run.
    pub initable: bool,
}

impl ValidatorConfig {
    /// Create a descriptor, deriving `initable` from the method shape.
    pub fn new(identifier: impl Into<String>, method: Method) -> Self {
        let initable = method.is_generator();
        Self {
            identifier: identifier.into(),
            method: Some(method),
            initable,
        }
    }
}

/// A validator that can run as-is.
#[derive(Clone)]
pub struct FinalValidator {
    type_name: Arc<str>,
    predicate: Predicate,
}

impl FinalValidator {
    /// The type identifier.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Run the predicate against a value.
    pub fn validate(&self, value: Value) -> PredicateFuture {
        (self.predicate)(value)
    }
}

impl fmt::Debug for FinalValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinalValidator")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// A validator waiting for its init parameters.
#[derive(Clone)]
pub struct InitableValidator {
    type_name: Arc<str>,
    generator: Generator,
}

impl InitableValidator {
    /// The type identifier.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Bind parameters, producing a new independent validator.
    ///
    /// Never caches: two calls with the same parameters return two
    /// distinct instances.
    pub fn init(&self, params: Vec<Value>) -> Result<InitedValidator, InitError> {
        let predicate = (self.generator)(&params).map_err(|e| InitError::InvalidParams {
            type_name: self.type_name.to_string(),
            message: e.to_string(),
        })?;

        Ok(InitedValidator {
            inner: Arc::new(InitedInner {
                type_name: self.type_name.clone(),
                init_params: params,
                predicate,
            }),
        })
    }
}

impl fmt::Debug for InitableValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitableValidator")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

struct InitedInner {
    type_name: Arc<str>,
    init_params: Vec<Value>,
    predicate: Predicate,
}

/// An initable validator with its parameters bound.
#[derive(Clone)]
pub struct InitedValidator {
    inner: Arc<InitedInner>,
}

impl InitedValidator {
    /// The type identifier.
    pub fn type_name(&self) -> &str {
        &self.inner.type_name
    }

    /// The parameters this instance was inited with.
    pub fn init_params(&self) -> &[Value] {
        &self.inner.init_params
    }

    /// Run the bound predicate against a value.
    pub fn validate(&self, value: Value) -> PredicateFuture {
        (self.inner.predicate)(value)
    }

    /// Whether both handles point at the same inited instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for InitedValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitedValidator")
            .field("type", &self.inner.type_name)
            .field("init_params", &self.inner.init_params)
            .finish_non_exhaustive()
    }
}

/// Any validator value a composition can hold.
#[derive(Debug, Clone)]
pub enum Validator {
    /// Non-initable, ready to run.
    Final(FinalValidator),
    /// Initable, not yet inited.
    Initable(InitableValidator),
    /// Initable, parameters bound.
    Inited(InitedValidator),
}

impl Validator {
    /// The type identifier.
    pub fn type_name(&self) -> &str {
        match self {
            Validator::Final(v) => v.type_name(),
            Validator::Initable(v) => v.type_name(),
            Validator::Inited(v) => v.type_name(),
        }
    }

    /// Whether the rule was declared initable (inited or not).
    pub fn is_initable(&self) -> bool {
        !matches!(self, Validator::Final(_))
    }

    /// Whether the rule is initable and has been inited.
    pub fn was_inited(&self) -> bool {
        matches!(self, Validator::Inited(_))
    }

    /// Whether the rule still needs `init` before it can run.
    pub fn needs_init(&self) -> bool {
        matches!(self, Validator::Initable(_))
    }

    /// The runnable predicate, if the validator is final.
    pub fn predicate(&self) -> Option<&Predicate> {
        match self {
            Validator::Final(v) => Some(&v.predicate),
            Validator::Inited(v) => Some(&v.inner.predicate),
            Validator::Initable(_) => None,
        }
    }

    /// Borrow as an initable validator.
    pub fn as_initable(&self) -> Option<&InitableValidator> {
        if let Validator::Initable(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Borrow as an inited validator.
    pub fn as_inited(&self) -> Option<&InitedValidator> {
        if let Validator::Inited(v) = self {
            Some(v)
        } else {
            None
        }
    }
}

/// Build a validator from its descriptor.
pub fn validator(config: ValidatorConfig) -> Result<Validator, DefinitionError> {
    let ValidatorConfig {
        identifier,
        method,
        initable,
    } = config;

    if !matches_style(&identifier) {
        return Err(DefinitionError::InvalidIdentifierStyle { identifier });
    }

    let type_name: Arc<str> = Arc::from(identifier.as_str());
    match (method, initable) {
        (Some(Method::Predicate(predicate)), false) => {
            Ok(Validator::Final(FinalValidator { type_name, predicate }))
        }
        (Some(Method::Generator(generator)), true) => {
            Ok(Validator::Initable(InitableValidator { type_name, generator }))
        }
        (Some(Method::Predicate(_)), true) => Err(DefinitionError::MethodNeedsToBeAFunction {
            identifier,
            reason: "initable rules take a predicate generator".to_string(),
        }),
        (Some(Method::Generator(_)), false) => Err(DefinitionError::MethodNeedsToBeAFunction {
            identifier,
            reason: "non-initable rules take a predicate".to_string(),
        }),
        (None, _) => Err(DefinitionError::MethodNeedsToBeAFunction {
            identifier,
            reason: "no method given".to_string(),
        }),
    }
}
