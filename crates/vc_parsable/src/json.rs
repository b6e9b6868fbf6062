//! JSON text in and out of registered objects.
//!
//! Thin wrappers around the drivers and `serde_json`. Malformed text, and
//! documents that are not JSON objects, fail with [`ErrorKind::Syntax`].

use alloc::format;
use alloc::string::{String, ToString};

use crate::Parsable;
use crate::driver::{ParseDriver, SerializeDriver};
use crate::error::{ErrorKind, Result, report};
use crate::registry::ParsableRegistry;
use crate::value::{Mapping, Value, shape_of};

/// Serializes `value` into compact JSON text.
pub fn to_string<T: Parsable>(value: &T, registry: &ParsableRegistry) -> Result<String> {
    let mapping = SerializeDriver::new(registry).serialize(value)?;
    Ok(Value::Object(mapping).to_string())
}

/// Serializes `value` into indented JSON text.
pub fn to_string_pretty<T: Parsable>(value: &T, registry: &ParsableRegistry) -> Result<String> {
    let mapping = SerializeDriver::new(registry).serialize(value)?;
    serde_json::to_string_pretty(&mapping)
        .map_err(|err| report(ErrorKind::Syntax, err.to_string()))
}

/// Parses a new `T` from JSON text.
///
/// # Examples
///
/// ```
/// use vc_parsable::{ErrorKind, Parsable, ParsableRegistry, Slot, TableBuilder, json};
///
/// #[derive(Default)]
/// struct Limits {
///     max: u32,
/// }
///
/// impl Parsable for Limits {
///     fn register_attributes(table: &mut TableBuilder<Self>) {
///         table.serializable("max", Slot::always(|l: &Limits| &l.max, |l, v| l.max = v));
///     }
/// }
///
/// let mut registry = ParsableRegistry::new();
/// registry.register::<Limits>().unwrap();
///
/// let limits: Limits = json::from_str(r#"{ "max": 8 }"#, &registry).unwrap();
/// assert_eq!(limits.max, 8);
/// assert_eq!(json::to_string(&limits, &registry).unwrap(), r#"{"max":8}"#);
///
/// let err = json::from_str::<Limits>("{ max: 8 }", &registry).err().unwrap();
/// assert_eq!(err.kind(), ErrorKind::Syntax);
/// ```
pub fn from_str<T: Parsable>(text: &str, registry: &ParsableRegistry) -> Result<T> {
    let input = parse_object(text)?;
    ParseDriver::new(registry).parse(&input)
}

/// Updates `target` from JSON text, in [`ParseMode::Initialize`](crate::ParseMode::Initialize).
///
/// Use a configured [`ParseDriver`] on a parsed [`Mapping`] for other modes.
pub fn update_from_str<T: Parsable>(
    target: &mut T,
    text: &str,
    registry: &ParsableRegistry,
) -> Result<()> {
    let input = parse_object(text)?;
    ParseDriver::new(registry).update(target, &input)
}

/// Reads JSON text that must hold an object.
pub fn parse_object(text: &str) -> Result<Mapping> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(mapping)) => Ok(mapping),
        Ok(other) => Err(report(
            ErrorKind::Syntax,
            format!("expected a JSON object, found {}", shape_of(&other)),
        )),
        Err(err) => Err(report(ErrorKind::Syntax, err.to_string())),
    }
}
