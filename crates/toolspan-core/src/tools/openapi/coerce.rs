//! Best-effort value coercion against a declared type
//!
//! Coercion never blocks a request. A value that cannot be converted to its
//! declared type is sent as-is, and the outcome type records whether a
//! conversion actually happened so callers can surface uncoerced fields in
//! diagnostics. The only fatal condition is an `anyOf` union nested past the
//! recursion budget.
//!
//! The scalar and union branches intentionally disagree on booleans: a
//! scalar `boolean` is a direct truthiness cast, while a `boolean` union
//! candidate only accepts the literal strings "true"/"1"/"false"/"0" and
//! otherwise skips to the next candidate.

use serde_json::Value;

use super::spec::{TypeKind, TypeSpec};
use crate::errors::InvocationError;

/// Nesting budget for `anyOf` unions.
pub const MAX_ANY_OF_DEPTH: usize = 10;

/// Outcome of a coercion attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Coercion {
    /// The value was converted to the declared type.
    Coerced(Value),
    /// No conversion applied; the original value is passed through.
    Unchanged(Value),
}

impl Coercion {
    pub fn into_value(self) -> Value {
        match self {
            Coercion::Coerced(value) | Coercion::Unchanged(value) => value,
        }
    }

    pub fn was_coerced(&self) -> bool {
        matches!(self, Coercion::Coerced(_))
    }
}

/// Coerce `value` towards the declared type.
pub fn coerce(spec: &TypeSpec, value: Value) -> Result<Coercion, InvocationError> {
    match &spec.kind {
        TypeKind::Integer => Ok(apply(as_integer(&value), value)),
        TypeKind::Number => Ok(apply(as_number(&value), value)),
        TypeKind::String => Ok(Coercion::Coerced(Value::String(plain_string(&value)))),
        TypeKind::Boolean => Ok(Coercion::Coerced(Value::Bool(is_truthy(&value)))),
        TypeKind::Null => {
            if value.is_null() {
                Ok(Coercion::Coerced(Value::Null))
            } else {
                Ok(Coercion::Unchanged(value))
            }
        }
        TypeKind::Object => match &value {
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(parsed) => Ok(Coercion::Coerced(parsed)),
                Err(_) => Ok(Coercion::Unchanged(value)),
            },
            _ => Ok(Coercion::Unchanged(value)),
        },
        TypeKind::AnyOf(options) => coerce_any_of(options, value, MAX_ANY_OF_DEPTH),
    }
}

/// Try each union candidate in declared order.
///
/// A nested union's outcome is returned directly, even when it fell through
/// to the original value. Exhausting all candidates is not an error; the
/// value passes through unchanged.
fn coerce_any_of(
    options: &[TypeSpec],
    value: Value,
    depth: usize,
) -> Result<Coercion, InvocationError> {
    if depth == 0 {
        return Err(InvocationError::RecursionLimit);
    }
    for option in options {
        match &option.kind {
            TypeKind::Integer => {
                if let Some(converted) = as_integer(&value) {
                    return Ok(Coercion::Coerced(converted));
                }
            }
            TypeKind::Number => {
                if let Some(converted) = as_number(&value) {
                    return Ok(Coercion::Coerced(converted));
                }
            }
            TypeKind::String => {
                return Ok(Coercion::Coerced(Value::String(plain_string(&value))));
            }
            TypeKind::Boolean => match plain_string(&value).to_ascii_lowercase().as_str() {
                "true" | "1" => return Ok(Coercion::Coerced(Value::Bool(true))),
                "false" | "0" => return Ok(Coercion::Coerced(Value::Bool(false))),
                _ => {}
            },
            TypeKind::Null => {
                if !is_truthy(&value) {
                    return Ok(Coercion::Coerced(Value::Null));
                }
            }
            TypeKind::Object => {}
            TypeKind::AnyOf(nested) => return coerce_any_of(nested, value, depth - 1),
        }
    }
    Ok(Coercion::Unchanged(value))
}

fn apply(converted: Option<Value>, original: Value) -> Coercion {
    match converted {
        Some(value) => Coercion::Coerced(value),
        None => Coercion::Unchanged(original),
    }
}

fn as_integer(value: &Value) -> Option<Value> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Value::from(i))
            } else {
                n.as_f64().map(|f| Value::from(f.trunc() as i64))
            }
        }
        Value::Bool(b) => Some(Value::from(*b as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
        _ => None,
    }
}

/// A decimal point in the textual form selects float parsing, otherwise the
/// value is parsed as an integer.
fn as_number(value: &Value) -> Option<Value> {
    let text = plain_string(value);
    if text.contains('.') {
        text.trim()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
    } else {
        text.trim().parse::<i64>().ok().map(Value::from)
    }
}

/// Plain (unquoted) textual form of a value, as used for path substitution,
/// query strings, and coercion checks.
pub(crate) fn plain_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
