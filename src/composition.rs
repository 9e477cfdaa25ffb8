//! Ordered, immutable validator bundles.
//!
//! A [`Composition`] holds the validators of one field in the order they run.
//! Initable members are bound with [`Composition::init`], which returns a new
//! composition, and the run entrypoint refuses to start until every member is
//! final.

use crate::core::error::{InitError, RunError};
use crate::core::types::Value;
use crate::execution::progress::{RunOptions, Validation};
use crate::execution::runner::{run_pipeline, Step};
use crate::validator::factory::Validator;
use std::future::Future;
use std::sync::Arc;

#[derive(Debug)]
struct CompositionInner {
    validators: Vec<Validator>,
    types: Vec<String>,
    is_initable: bool,
}

/// An ordered bundle of validators with init and run capabilities.
///
/// Cloning is cheap and clones share identity (see [`Composition::ptr_eq`]).
#[derive(Debug, Clone)]
pub struct Composition {
    inner: Arc<CompositionInner>,
}

impl Composition {
    /// Create a composition from validators, keeping their order.
    pub fn new(validators: Vec<Validator>) -> Self {
        let types = validators.iter().map(|v| v.type_name().to_string()).collect();
        let is_initable = validators.iter().any(Validator::needs_init);
        Self {
            inner: Arc::new(CompositionInner {
                validators,
                types,
                is_initable,
            }),
        }
    }

    /// Type identifiers, in run order.
    pub fn types(&self) -> &[String] {
        &self.inner.types
    }

    /// The validators, in run order.
    pub fn validators(&self) -> &[Validator] {
        &self.inner.validators
    }

    /// Whether some member still needs `init`.
    pub fn is_initable(&self) -> bool {
        self.inner.is_initable
    }

    /// Number of validators.
    pub fn len(&self) -> usize {
        self.inner.validators.len()
    }

    /// Whether the composition has no validators.
    pub fn is_empty(&self) -> bool {
        self.inner.validators.is_empty()
    }

    /// Whether both handles refer to the same composition instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Types still waiting for `init`, in order.
    pub fn pending_init(&self) -> Vec<&str> {
        self.inner
            .validators
            .iter()
            .filter(|v| v.needs_init())
            .map(Validator::type_name)
            .collect()
    }

    /// Bind init parameters to every initable member.
    ///
    /// `init_values` holds one `(type, params)` pair per member still needing
    /// init, in member order. Already-final members are kept as they are.
    /// When nothing needs init the same instance is returned and
    /// `init_values` is ignored.
    pub fn init<S>(&self, init_values: Vec<(S, Vec<Value>)>) -> Result<Composition, InitError>
    where
        S: Into<String>,
    {
        if !self.is_initable() {
            return Ok(self.clone());
        }

        let mut pending = init_values.into_iter().map(|(t, params)| (t.into(), params));
        let mut resolved = Vec::with_capacity(self.len());

        for (position, validator) in self.inner.validators.iter().enumerate() {
            let Some(initable) = validator.as_initable() else {
                resolved.push(validator.clone());
                continue;
            };

            let (type_name, params) = pending.next().ok_or_else(|| InitError::MissingInit {
                type_name: initable.type_name().to_string(),
                position,
            })?;

            if type_name != initable.type_name() {
                return Err(InitError::InitOrderTypeMismatch {
                    expected: initable.type_name().to_string(),
                    got: type_name,
                    position,
                });
            }

            log::debug!("init {} at position {} with {:?}", type_name, position, params);
            resolved.push(Validator::Inited(initable.init(params)?));
        }

        let leftover: Vec<String> = pending.map(|(t, _)| t).collect();
        if let Some(first) = leftover.first() {
            return Err(InitError::ExcessInit {
                first: first.clone(),
                remaining: leftover.len(),
            });
        }

        Ok(Composition::new(resolved))
    }

    /// Start a run of every validator against `value`.
    ///
    /// Fails immediately, before any validator runs, if some member was
    /// never inited. Otherwise returns the run future, which resolves to the
    /// final snapshot after `on_change` has seen the last emission.
    pub fn validate<F>(
        &self,
        value: Value,
        options: RunOptions,
        on_change: F,
    ) -> Result<impl Future<Output = Vec<Validation>> + Send + 'static, RunError>
    where
        F: FnMut(&[Validation], bool) + Send + 'static,
    {
        if self.is_initable() {
            return Err(RunError::CalledValidateOnInitable {
                pending: self.pending_init().into_iter().map(String::from).collect(),
            });
        }

        let steps = self
            .inner
            .validators
            .iter()
            .filter_map(|v| {
                v.predicate().map(|predicate| Step {
                    type_name: Arc::from(v.type_name()),
                    predicate: predicate.clone(),
                })
            })
            .collect();

        Ok(run_pipeline(steps, value, options, on_change))
    }
}

/// Run a composition against a value.
///
/// Thin layer over [`Composition::validate`].
pub fn run<F>(
    composition: &Composition,
    value: Value,
    options: RunOptions,
    on_change: F,
) -> Result<impl Future<Output = Vec<Validation>> + Send + 'static, RunError>
where
    F: FnMut(&[Validation], bool) + Send + 'static,
{
    composition.validate(value, options, on_change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{RuntimeError, Verdict};
    use crate::execution::progress::ValidationState;
    use crate::validator::{validator, Method, ValidatorConfig};

    fn equals(identifier: &str, expected: &'static str) -> Validator {
        validator(ValidatorConfig::new(
            identifier,
            Method::predicate(move |v| Ok(v.as_string() == Some(expected))),
        ))
        .unwrap()
    }

    fn contains() -> Validator {
        validator(ValidatorConfig::new(
            "CONTAINS",
            Method::generator(|params: &[Value]| {
                let needle = params
                    .first()
                    .and_then(Value::as_string)
                    .ok_or_else(|| RuntimeError::new("needle must be a string"))?
                    .to_string();
                Ok(move |v: &Value| -> Verdict {
                    Ok(v.as_string().is_some_and(|s| s.contains(&needle)))
                })
            }),
        ))
        .unwrap()
    }

    fn no_params() -> Vec<(&'static str, Vec<Value>)> {
        Vec::new()
    }

    #[test]
    fn test_types_and_initable_flag() {
        let plain = Composition::new(vec![equals("IS_FOO", "foo"), equals("IS_BAR", "bar")]);
        assert_eq!(plain.types(), &["IS_FOO".to_string(), "IS_BAR".to_string()]);
        assert!(!plain.is_initable());

        let mixed = Composition::new(vec![equals("IS_FOO", "foo"), contains()]);
        assert!(mixed.is_initable());
        assert_eq!(mixed.pending_init(), vec!["CONTAINS"]);
    }

    #[test]
    fn test_init_on_final_composition_preserves_identity() {
        let plain = Composition::new(vec![equals("IS_FOO", "foo")]);
        let same = plain.init(no_params()).unwrap();
        assert!(plain.ptr_eq(&same));

        let ignored = plain.init(vec![("ANYTHING", vec![Value::Integer(1)])]).unwrap();
        assert!(plain.ptr_eq(&ignored));
    }

    #[test]
    fn test_init_binds_in_order() {
        let composition = Composition::new(vec![contains(), equals("IS_FOO", "foo"), contains()]);
        let inited = composition
            .init(vec![
                ("CONTAINS", vec![Value::from("f")]),
                ("CONTAINS", vec![Value::from("o")]),
            ])
            .unwrap();

        assert!(!inited.is_initable());
        assert!(!inited.ptr_eq(&composition));
        assert!(composition.is_initable());
        assert_eq!(inited.types(), composition.types());
        assert_eq!(
            inited.validators()[0].as_inited().unwrap().init_params(),
            &[Value::from("f")]
        );
        assert!(matches!(inited.validators()[1], Validator::Final(_)));
        assert_eq!(
            inited.validators()[2].as_inited().unwrap().init_params(),
            &[Value::from("o")]
        );

        let again = inited.init(no_params()).unwrap();
        assert!(again.ptr_eq(&inited));
    }

    #[test]
    fn test_init_missing_values() {
        let composition = Composition::new(vec![contains(), contains()]);
        let err = composition
            .init(vec![("CONTAINS", vec![Value::from("a")])])
            .unwrap_err();
        assert_eq!(
            err,
            InitError::MissingInit {
                type_name: "CONTAINS".to_string(),
                position: 1,
            }
        );
    }

    #[test]
    fn test_init_type_mismatch() {
        let composition = Composition::new(vec![contains()]);
        let err = composition
            .init(vec![("MIN_LENGTH", vec![Value::Integer(3)])])
            .unwrap_err();
        assert_eq!(
            err,
            InitError::InitOrderTypeMismatch {
                expected: "CONTAINS".to_string(),
                got: "MIN_LENGTH".to_string(),
                position: 0,
            }
        );
    }

    #[test]
    fn test_init_excess_values() {
        let composition = Composition::new(vec![contains()]);
        let err = composition
            .init(vec![
                ("CONTAINS", vec![Value::from("a")]),
                ("CONTAINS", vec![Value::from("b")]),
            ])
            .unwrap_err();
        assert_eq!(
            err,
            InitError::ExcessInit {
                first: "CONTAINS".to_string(),
                remaining: 1,
            }
        );
    }

    #[test]
    fn test_sibling_compositions_do_not_interfere() {
        let shared = contains();
        let with_a = Composition::new(vec![shared.clone()])
            .init(vec![("CONTAINS", vec![Value::from("a")])])
            .unwrap();
        let with_b = Composition::new(vec![shared])
            .init(vec![("CONTAINS", vec![Value::from("b")])])
            .unwrap();

        let verdict = |c: &Composition| {
            let last = pollster::block_on(
                c.validate(Value::from("abc-a"), RunOptions::only_on_completed(), |_: &[Validation], _: bool| {})
                    .unwrap(),
            );
            last[0].state
        };
        assert_eq!(verdict(&with_a), ValidationState::Accepted);
        assert_eq!(verdict(&with_b), ValidationState::Accepted);

        let last = pollster::block_on(
            with_b
                .validate(Value::from("a"), RunOptions::default(), |_: &[Validation], _: bool| {})
                .unwrap(),
        );
        assert_eq!(last[0].state, ValidationState::Rejected);
    }

    #[test]
    fn test_validate_on_initable_fails_synchronously() {
        let composition = Composition::new(vec![contains(), equals("ENDS_BAZ", "baz")]);
        let err = run(
            &composition,
            Value::from("foobarbaz"),
            RunOptions::only_on_completed(),
            |_: &[Validation], _: bool| panic!("no emission expected"),
        )
        .err()
        .unwrap();
        assert_eq!(
            err,
            RunError::CalledValidateOnInitable {
                pending: vec!["CONTAINS".to_string()],
            }
        );
    }
}
