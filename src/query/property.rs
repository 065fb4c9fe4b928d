//! Property access over arbitrary model types
//!
//! Models are reached through their serde-normalized form: an item is
//! serialized to a [`Value`] once and dotted paths (`author.name`, `tags.0`)
//! are walked on that value. This is the only place where the crate looks at
//! model objects structurally.

use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

use crate::error::{ContentError, Result};

/// Serialize an item into its normalized form
pub fn normalize<T: Serialize + ?Sized>(item: &T) -> Result<Value> {
    serde_json::to_value(item).map_err(|e| ContentError::Property {
        path: String::new(),
        message: format!("cannot normalize item: {}", e),
    })
}

/// Resolve a dotted property path inside a normalized value
///
/// A missing property is an error, not `null`.
pub fn resolve<'a>(root: &'a Value, path: &str) -> Result<&'a Value> {
    if path.is_empty() {
        return Err(property_error(path, "empty property path"));
    }

    let mut current = root;
    for part in path.split('.') {
        current = match current {
            Value::Object(map) => map
                .get(part)
                .ok_or_else(|| property_error(path, format!("no property \"{}\"", part)))?,
            Value::Array(items) => {
                let index = part.parse::<usize>().map_err(|_| {
                    property_error(path, format!("\"{}\" is not a sequence index", part))
                })?;
                items
                    .get(index)
                    .ok_or_else(|| property_error(path, format!("index {} out of bounds", index)))?
            }
            other => {
                return Err(property_error(
                    path,
                    format!("cannot read \"{}\" on {}", part, kind_name(other)),
                ))
            }
        };
    }

    Ok(current)
}

/// Whether a value counts as true in a filter
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Coercive equality used by mapping filters
///
/// Booleans and `null` compare against the truthiness of the other side,
/// numbers compare numerically (numeric strings included), containers
/// compare element-wise.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Bool(x), other) | (other, Value::Bool(x)) => is_truthy(other) == *x,
        (Value::Null, other) | (other, Value::Null) => !is_truthy(other),
        (Value::Number(_), Value::Number(_)) => {
            matches!(compare_numbers(a, b), Some(Ordering::Equal))
        }
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            match (n.as_f64(), s.trim().parse::<f64>()) {
                (Some(n), Ok(s)) => n == s,
                _ => false,
            }
        }
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| loose_eq(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, x)| y.get(key).map(|y| loose_eq(x, y)).unwrap_or(false))
        }
        _ => false,
    }
}

/// Order two property values
///
/// `null` sorts before everything else. Values of kinds that have no natural
/// order between them (a string and an object, a boolean and a number) are an
/// error rather than an arbitrary answer.
pub fn compare(a: &Value, b: &Value) -> Result<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Ok(Ordering::Equal),
        (Value::Null, _) => Ok(Ordering::Less),
        (_, Value::Null) => Ok(Ordering::Greater),
        (Value::Bool(x), Value::Bool(y)) => Ok(x.cmp(y)),
        (Value::Number(_), Value::Number(_)) => {
            compare_numbers(a, b).ok_or_else(|| incomparable(a, b))
        }
        (Value::String(x), Value::String(y)) => Ok(x.cmp(y)),
        (Value::Number(n), Value::String(s)) => {
            let s = s.trim().parse::<f64>().map_err(|_| incomparable(a, b))?;
            n.as_f64()
                .and_then(|n| n.partial_cmp(&s))
                .ok_or_else(|| incomparable(a, b))
        }
        (Value::String(_), Value::Number(_)) => compare(b, a).map(Ordering::reverse),
        (Value::Array(x), Value::Array(y)) => {
            for (x, y) in x.iter().zip(y) {
                let ordering = compare(x, y)?;
                if ordering != Ordering::Equal {
                    return Ok(ordering);
                }
            }
            Ok(x.len().cmp(&y.len()))
        }
        _ => Err(incomparable(a, b)),
    }
}

fn compare_numbers(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

fn property_error(path: &str, message: impl Into<String>) -> ContentError {
    ContentError::Property {
        path: path.to_string(),
        message: message.into(),
    }
}

fn incomparable(a: &Value, b: &Value) -> ContentError {
    ContentError::Incomparable {
        left: describe(a),
        right: describe(b),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Array(_) | Value::Object(_) => kind_name(value).to_string(),
        scalar => format!("{} {}", kind_name(value), scalar),
    }
}
