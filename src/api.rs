//! Convenience entry points for the common "parse two JSON strings, apply a
//! rule, get a result" workflow.
//!
//! Grounded on the teacher's own `api.rs`: a handful of free functions, each
//! one entry point, doctested, built directly on top of the lower-level
//! pipeline (`parse` -> `apply` -> `stringify` here, `parse_and_lower` ->
//! `compile_with_cache` -> `Vm::run` there).

use crate::error::Error;
use crate::eval;
use crate::ops;
use crate::parse::parse_str;
use crate::registry::Registry;
use crate::stringify::stringify;
use crate::value::Value;

/// Parse `rule` and `data` as JSON, evaluate `rule` against `data` using the
/// default JsonLogic built-ins, and stringify the result.
///
/// # Example
///
/// ```
/// use jsonlogic::api::apply_json_str;
///
/// let result = apply_json_str(r#"{"+": [1, 2]}"#, "null").unwrap();
/// assert_eq!(result, "3");
/// ```
pub fn apply_json_str(rule: &str, data: &str) -> Result<String, Error> {
    let value = apply_json_value(rule, data)?;
    Ok(stringify(&value))
}

/// Parse `rule` and `data` as JSON and evaluate `rule` against `data` using
/// the default JsonLogic built-ins, returning the result `Value` directly
/// (preserving its type, rather than its string rendering).
pub fn apply_json_value(rule: &str, data: &str) -> Result<Value, Error> {
    let rule = parse_str(rule)?;
    let data = parse_str(data)?;
    Ok(eval::apply(&rule, &data))
}

/// Like [`apply_json_str`], but evaluates with the extras-extended JsonLogic
/// registry (`combinations`, `days`, `hours`, `now`, `zip` alongside the core
/// operators).
pub fn apply_json_str_with_extras(rule: &str, data: &str) -> Result<String, Error> {
    let rule = parse_str(rule)?;
    let data = parse_str(data)?;
    let value = ops::with_json_logic_extras(|registry| eval::apply_custom(&rule, &data, registry));
    Ok(stringify(&value))
}

/// Parse `rule` and `data` as JSON, evaluate `rule` against `data` using the
/// default CertLogic built-ins, and stringify the result.
///
/// # Example
///
/// ```
/// use jsonlogic::api::certlogic_apply_json_str;
///
/// let result = certlogic_apply_json_str(r#"{"var": "a"}"#, r#"{"a": 5}"#).unwrap();
/// assert_eq!(result, "5");
/// ```
pub fn certlogic_apply_json_str(rule: &str, data: &str) -> Result<String, Error> {
    let value = certlogic_apply_json_value(rule, data)?;
    Ok(stringify(&value))
}

/// Parse `rule` and `data` as JSON and evaluate `rule` against `data` using
/// the default CertLogic built-ins, returning the result `Value` directly.
pub fn certlogic_apply_json_value(rule: &str, data: &str) -> Result<Value, Error> {
    let rule = parse_str(rule)?;
    let data = parse_str(data)?;
    Ok(eval::certlogic_apply(&rule, &data))
}

/// Parse `rule` and `data` as JSON and evaluate `rule` against `data` using a
/// caller-supplied registry, for custom dialects built by layering
/// [`Registry::extend`] over a default registry.
pub fn apply_json_str_custom(rule: &str, data: &str, registry: &Registry) -> Result<String, Error> {
    let rule = parse_str(rule)?;
    let data = parse_str(data)?;
    Ok(stringify(&eval::apply_custom(&rule, &data, registry)))
}
