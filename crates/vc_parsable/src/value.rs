//! The boundary representation produced by serialization and consumed by parsing.
//!
//! Both directions speak `serde_json`'s dynamic [`Value`]; an object's
//! attributes travel as a [`Mapping`] from attribute names to values.

use alloc::format;
use alloc::string::String;

pub use serde_json::{Map, Value};

use crate::error::{ErrorKind, Result, report};

/// A mapping from attribute names to JSON-compatible values.
pub type Mapping = Map<String, Value>;

/// The key under which tagged serialization stores the type name.
///
/// No attribute may be registered under this name.
pub const TYPE_TAG_KEY: &str = "parsable_type";

/// Returns a short description of the JSON shape of `value`.
pub(crate) fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Returns `true` if `value` is or contains `null`.
pub(crate) fn contains_null(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.iter().any(contains_null),
        Value::Object(mapping) => mapping.values().any(contains_null),
        _ => false,
    }
}

#[track_caller]
pub(crate) fn expect_object(value: &Value) -> Result<&Mapping> {
    match value {
        Value::Object(mapping) => Ok(mapping),
        other => Err(report(
            ErrorKind::TypeMismatch,
            format!("expected object, found {}", shape_of(other)),
        )),
    }
}

#[track_caller]
pub(crate) fn expect_array(value: &Value) -> Result<&[Value]> {
    match value {
        Value::Array(items) => Ok(items.as_slice()),
        other => Err(report(
            ErrorKind::TypeMismatch,
            format!("expected array, found {}", shape_of(other)),
        )),
    }
}
