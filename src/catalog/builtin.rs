//! Built-in rules.
//!
//! Text rules fail at runtime (rather than reject) when handed a value that
//! is not text, so a misconfigured field shows up as a runtime error in the
//! snapshot instead of a silent rejection.

use crate::catalog::registry::Catalog;
use crate::core::error::{FieldCheckResult, RuntimeError, Verdict};
use crate::core::types::Value;
use crate::validator::factory::ValidatorConfig;
use crate::validator::method::Method;

/// Register all built-in rules.
pub fn register_all(catalog: &mut Catalog) -> FieldCheckResult<()> {
    catalog.define(
        ValidatorConfig::new("NOT_EMPTY", Method::predicate(|v| Ok(!v.is_empty()))),
        "Value is present and not blank",
    )?;
    catalog.define(
        ValidatorConfig::new("IS_NUMBER", Method::predicate(|v| Ok(numeric(v).is_some()))),
        "Value is a number or numeric text",
    )?;
    catalog.define(
        ValidatorConfig::new("IS_INTEGER", Method::predicate(|v| Ok(integral(v).is_some()))),
        "Value is an integer or integer text",
    )?;
    catalog.define(
        ValidatorConfig::new(
            "MIN_LENGTH",
            Method::generator(|params: &[Value]| {
                let min = length_param(params, "MIN_LENGTH")?;
                Ok(move |v: &Value| -> Verdict { Ok(length_of(v, "MIN_LENGTH")? >= min) })
            }),
        ),
        "Text or list has at least N items",
    )?;
    catalog.define(
        ValidatorConfig::new(
            "MAX_LENGTH",
            Method::generator(|params: &[Value]| {
                let max = length_param(params, "MAX_LENGTH")?;
                Ok(move |v: &Value| -> Verdict { Ok(length_of(v, "MAX_LENGTH")? <= max) })
            }),
        ),
        "Text or list has at most N items",
    )?;
    catalog.define(
        ValidatorConfig::new(
            "STARTS_WITH",
            Method::generator(|params: &[Value]| {
                let prefix = text_param(params, 0, "STARTS_WITH")?;
                Ok(move |v: &Value| -> Verdict { text_rule(v, "STARTS_WITH", |s| s.starts_with(&prefix)) })
            }),
        ),
        "Text starts with the given prefix",
    )?;
    catalog.define(
        ValidatorConfig::new(
            "ENDS_WITH",
            Method::generator(|params: &[Value]| {
                let suffix = text_param(params, 0, "ENDS_WITH")?;
                Ok(move |v: &Value| -> Verdict { text_rule(v, "ENDS_WITH", |s| s.ends_with(&suffix)) })
            }),
        ),
        "Text ends with the given suffix",
    )?;
    catalog.define(
        ValidatorConfig::new(
            "CONTAINS",
            Method::generator(|params: &[Value]| {
                let needle = text_param(params, 0, "CONTAINS")?;
                Ok(move |v: &Value| -> Verdict { text_rule(v, "CONTAINS", |s| s.contains(&needle)) })
            }),
        ),
        "Text contains the given substring",
    )?;
    catalog.define(
        ValidatorConfig::new(
            "IN_RANGE",
            Method::generator(|params: &[Value]| {
                let min = number_param(params, 0, "IN_RANGE")?;
                let max = number_param(params, 1, "IN_RANGE")?;
                if min > max {
                    return Err(RuntimeError::new(format!(
                        "IN_RANGE: min {} is greater than max {}",
                        min, max
                    )));
                }
                Ok(move |v: &Value| -> Verdict { Ok(numeric(v).is_some_and(|n| (min..=max).contains(&n))) })
            }),
        ),
        "Number lies within [min, max]",
    )?;
    catalog.define(
        ValidatorConfig::new(
            "ONE_OF",
            Method::generator(|params: &[Value]| {
                if params.is_empty() {
                    return Err(RuntimeError::new("ONE_OF: expected at least one choice"));
                }
                let choices = params.to_vec();
                Ok(move |v: &Value| -> Verdict { Ok(choices.contains(v)) })
            }),
        ),
        "Value equals one of the given choices",
    )?;
    Ok(())
}

/// Numeric reading of a value: numbers as-is, text if it parses.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        other => other.as_float(),
    }
}

fn integral(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => Some(*i),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn length_of(value: &Value, rule: &str) -> Result<usize, RuntimeError> {
    value.len().ok_or_else(|| {
        RuntimeError::new(format!("{}: {} value has no length", rule, value.kind()))
    })
}

fn text_rule(value: &Value, rule: &str, test: impl Fn(&str) -> bool) -> Verdict {
    value
        .as_string()
        .map(test)
        .ok_or_else(|| RuntimeError::new(format!("{}: expected text, got {}", rule, value.kind())))
}

fn length_param(params: &[Value], rule: &str) -> Result<usize, RuntimeError> {
    params
        .first()
        .and_then(Value::as_integer)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| RuntimeError::new(format!("{}: expected a non-negative integer", rule)))
}

fn text_param(params: &[Value], index: usize, rule: &str) -> Result<String, RuntimeError> {
    params
        .get(index)
        .and_then(Value::as_string)
        .map(String::from)
        .ok_or_else(|| RuntimeError::new(format!("{}: parameter {} must be text", rule, index)))
}

fn number_param(params: &[Value], index: usize, rule: &str) -> Result<f64, RuntimeError> {
    params
        .get(index)
        .and_then(Value::as_float)
        .ok_or_else(|| RuntimeError::new(format!("{}: parameter {} must be a number", rule, index)))
}
