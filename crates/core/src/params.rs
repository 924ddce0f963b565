//! Helpers for reading typed overrides out of a `serde_json::Value` object.
//!
//! A missing key yields the default. A key that is present with the wrong
//! JSON type is an error, so a typo in a value is reported instead of being
//! silently replaced.

use crate::error::FieldError;
use serde_json::Value;

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(name: &str, expected: &str, got: &Value) -> FieldError {
    FieldError::ParamTypeMismatch {
        name: name.to_string(),
        expected: expected.to_string(),
        got: json_type_name(got).to_string(),
    }
}

/// Reads `params[name]` as `f32`. Integers are accepted.
pub fn param_f32(params: &Value, name: &str, default: f32) -> Result<f32, FieldError> {
    match params.get(name) {
        None => Ok(default),
        Some(v) => v
            .as_f64()
            .map(|n| n as f32)
            .ok_or_else(|| mismatch(name, "number", v)),
    }
}

/// Reads `params[name]` as a non-negative integer.
pub fn param_usize(params: &Value, name: &str, default: usize) -> Result<usize, FieldError> {
    match params.get(name) {
        None => Ok(default),
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| mismatch(name, "non-negative integer", v)),
    }
}

/// Reads `params[name]` as a two-element numeric array `[a, b]`.
pub fn param_pair(
    params: &Value,
    name: &str,
    default: [f32; 2],
) -> Result<[f32; 2], FieldError> {
    let Some(v) = params.get(name) else {
        return Ok(default);
    };
    match v.as_array().map(Vec::as_slice) {
        Some([a, b]) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => Ok([a as f32, b as f32]),
            _ => Err(mismatch(name, "[number, number]", v)),
        },
        _ => Err(mismatch(name, "[number, number]", v)),
    }
}

/// Fails with `ParamNotFound` for the first key of `params` not in `known`.
///
/// Non-object values are rejected as a type mismatch on the root.
pub fn reject_unknown(params: &Value, known: &[&str]) -> Result<(), FieldError> {
    let Some(map) = params.as_object() else {
        return Err(mismatch("<root>", "object", params));
    };
    match map.keys().find(|k| !known.contains(&k.as_str())) {
        Some(k) => Err(FieldError::ParamNotFound(k.clone())),
        None => Ok(()),
    }
}
