//! Attribute-wise access to registered objects.
//!
//! The by-name operations on [`AttributeTable`] and the [`ParsableExt`]
//! shorthand on objects.

use core::fmt;

use alloc::format;

use crate::Parsable;
use crate::driver::{Context, DEFAULT_MAX_DEPTH, ParseDriver, ParseMode, SerializeDriver};
use crate::error::{ErrorKind, Result, report};
use crate::registry::ParsableRegistry;
use crate::table::AttributeTable;
use crate::value::{Mapping, Value};

// -----------------------------------------------------------------------------
// Lifecycle

/// How far an object is from being fully populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// No attribute holds a value, and at least one is required.
    Unpopulated,
    /// Some attribute holds a value, but a required one does not.
    Populating,
    /// Every required attribute holds a value.
    Populated,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unpopulated => f.pad("unpopulated"),
            Self::Populating => f.pad("populating"),
            Self::Populated => f.pad("populated"),
        }
    }
}

// -----------------------------------------------------------------------------
// Access

impl<T> AttributeTable<T> {
    /// Returns `true` if the attribute `name` holds a value.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::Configuration`] if `name` is not registered.
    pub fn has(&self, target: &T, name: &str) -> Result<bool> {
        Ok(self.entry(name)?.ops.is_present(target))
    }

    /// Returns the encoded value of the attribute `name`.
    ///
    /// An unset optional attribute reads as [`Value::Null`].
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Configuration`] if `name` is not registered.
    /// - [`ErrorKind::UnsetAttribute`] if the attribute is required and unset.
    /// - Any error of the attribute's encoder.
    pub fn get(&self, target: &T, name: &str, registry: &ParsableRegistry) -> Result<Value> {
        let entry = self.entry(name)?;
        let name = entry.descriptor.name;
        let mut cx = Context::new(registry, DEFAULT_MAX_DEPTH, false);
        match entry.ops.encode(target, &mut cx) {
            Ok(Some(value)) => Ok(value),
            Ok(None) if entry.descriptor.required => Err(report(
                ErrorKind::UnsetAttribute,
                format!("required attribute `{name}` of `{}` is not set", self.type_name),
            )
            .within_attribute(name)),
            Ok(None) => Ok(Value::Null),
            Err(err) => Err(err.within_attribute(name)),
        }
    }

    /// Decodes `value` and stores it into the attribute `name`.
    ///
    /// [`Value::Null`] clears an optional attribute.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Configuration`] if `name` is not registered.
    /// - [`ErrorKind::TypeMismatch`] if `value` has the wrong shape, is
    ///   rejected by the attribute's validator, or is `null` for a required
    ///   attribute.
    /// - Any error of the attribute's decoder.
    pub fn set(
        &self,
        target: &mut T,
        name: &str,
        value: Value,
        registry: &ParsableRegistry,
    ) -> Result<()> {
        let entry = self.entry(name)?;
        let mut cx = Context::new(registry, DEFAULT_MAX_DEPTH, false);
        entry
            .ops
            .decode(target, &value, ParseMode::Initialize, &mut cx)
            .map_err(|err| err.within_attribute(entry.descriptor.name))
    }

    /// Computes the [`Lifecycle`] of `target`.
    pub fn lifecycle(&self, target: &T) -> Lifecycle {
        let mut any_present = false;
        let mut required_missing = false;
        for entry in &self.entries {
            if entry.ops.is_present(target) {
                any_present = true;
            } else if entry.descriptor.required {
                required_missing = true;
            }
        }
        match (required_missing, any_present) {
            (false, _) => Lifecycle::Populated,
            (true, true) => Lifecycle::Populating,
            (true, false) => Lifecycle::Unpopulated,
        }
    }

    /// Compares two objects attribute by attribute, through their encoded
    /// values. Unset attributes compare equal to each other.
    pub fn equals(&self, a: &T, b: &T, registry: &ParsableRegistry) -> Result<bool> {
        let mut cx = Context::new(registry, DEFAULT_MAX_DEPTH, false);
        for entry in self.serialize_entries() {
            let name = entry.descriptor.name;
            let left = entry
                .ops
                .encode(a, &mut cx)
                .map_err(|err| err.within_attribute(name))?;
            let right = entry
                .ops
                .encode(b, &mut cx)
                .map_err(|err| err.within_attribute(name))?;
            if left != right {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

// -----------------------------------------------------------------------------
// ParsableExt

/// Shorthand methods on every [`Parsable`] object.
///
/// Each method looks up the table of `Self` in the given registry and fails
/// with [`ErrorKind::Configuration`] if `Self` is not registered.
///
/// # Examples
///
/// ```
/// use vc_parsable::{ErrorKind, Parsable, ParsableExt, ParsableRegistry, Slot, TableBuilder};
/// use serde_json::json;
///
/// #[derive(Default)]
/// struct Account {
///     owner: Option<String>,
/// }
///
/// impl Parsable for Account {
///     fn register_attributes(table: &mut TableBuilder<Self>) {
///         table.serializable(
///             "owner",
///             Slot::required(|a: &Account| a.owner.as_ref(), |a, v| a.owner = Some(v)),
///         );
///     }
/// }
///
/// let mut registry = ParsableRegistry::new();
/// registry.register::<Account>().unwrap();
///
/// let mut account = Account::default();
/// let err = account.get_attribute("owner", &registry).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::UnsetAttribute);
///
/// account.set_attribute("owner", json!("ada"), &registry).unwrap();
/// assert_eq!(account.get_attribute("owner", &registry).unwrap(), json!("ada"));
/// ```
pub trait ParsableExt: Parsable {
    /// Serializes `self`. See [`SerializeDriver`].
    fn to_mapping(&self, registry: &ParsableRegistry) -> Result<Mapping> {
        SerializeDriver::new(registry).serialize(self)
    }

    /// Parses a new object in [`ParseMode::Initialize`]. See [`ParseDriver`].
    fn from_mapping(input: &Mapping, registry: &ParsableRegistry) -> Result<Self> {
        ParseDriver::new(registry).parse(input)
    }

    /// Updates `self` in [`ParseMode::Initialize`].
    fn update_from(&mut self, input: &Mapping, registry: &ParsableRegistry) -> Result<()> {
        ParseDriver::new(registry).update(self, input)
    }

    /// Updates `self` in [`ParseMode::Merge`].
    fn merge_from(&mut self, input: &Mapping, registry: &ParsableRegistry) -> Result<()> {
        ParseDriver::new(registry)
            .mode(ParseMode::Merge)
            .update(self, input)
    }

    /// See [`AttributeTable::has`].
    fn has_attribute(&self, name: &str, registry: &ParsableRegistry) -> Result<bool> {
        registry.table::<Self>()?.has(self, name)
    }

    /// See [`AttributeTable::get`].
    fn get_attribute(&self, name: &str, registry: &ParsableRegistry) -> Result<Value> {
        registry.table::<Self>()?.get(self, name, registry)
    }

    /// See [`AttributeTable::set`].
    fn set_attribute(&mut self, name: &str, value: Value, registry: &ParsableRegistry) -> Result<()> {
        registry.table::<Self>()?.set(self, name, value, registry)
    }

    /// See [`AttributeTable::lifecycle`].
    fn lifecycle(&self, registry: &ParsableRegistry) -> Result<Lifecycle> {
        Ok(registry.table::<Self>()?.lifecycle(self))
    }

    /// See [`AttributeTable::equals`].
    fn equals(&self, other: &Self, registry: &ParsableRegistry) -> Result<bool> {
        registry.table::<Self>()?.equals(self, other, registry)
    }
}

impl<T: Parsable> ParsableExt for T {}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use serde_json::json;

    use super::{Lifecycle, ParsableExt};
    use crate::fixtures::{Color, Point, Reading, Shape, registry};
    use crate::{ErrorKind, Value};

    #[test]
    fn unset_required_then_set() {
        let registry = registry();
        let mut point = Point::default();

        assert!(!point.has_attribute("x", &registry).unwrap());
        let err = point.get_attribute("x", &registry).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsetAttribute);
        assert_eq!(err.path(), "x");

        point.set_attribute("x", json!(4), &registry).unwrap();
        assert!(point.has_attribute("x", &registry).unwrap());
        assert_eq!(point.get_attribute("x", &registry).unwrap(), json!(4));
        assert_eq!(point.x, Some(4));
    }

    #[test]
    fn unset_optional_reads_null() {
        let registry = registry();
        let shape = Shape::default();
        assert_eq!(shape.get_attribute("label", &registry).unwrap(), Value::Null);
        assert_eq!(shape.get_attribute("origin", &registry).unwrap(), Value::Null);
        assert_eq!(shape.get_attribute("note", &registry).unwrap(), Value::Null);
        // Always present.
        assert!(shape.has_attribute("path", &registry).unwrap());
        assert_eq!(shape.get_attribute("path", &registry).unwrap(), json!([]));
    }

    #[test]
    fn set_through_every_category() {
        let registry = registry();
        let mut shape = Shape::default();

        shape.set_attribute("color", json!("Red"), &registry).unwrap();
        shape
            .set_attribute("origin", json!({ "x": 1, "y": 1 }), &registry)
            .unwrap();
        shape
            .set_attribute("anchors", json!({ "top": { "x": 0, "y": 9 } }), &registry)
            .unwrap();
        shape
            .set_attribute("path", json!([{ "x": 2, "y": 3 }]), &registry)
            .unwrap();
        shape.set_attribute("note", json!("wet"), &registry).unwrap();

        assert_eq!(shape.color, Some(Color::Red));
        assert_eq!(shape.origin, Some(Point::new(1, 1)));
        assert_eq!(shape.anchors["top"], Point::new(0, 9));
        assert_eq!(shape.path, [Point::new(2, 3)]);
        assert_eq!(shape.note.as_deref(), Some("wet"));
        assert_eq!(
            shape.get_attribute("anchors", &registry).unwrap(),
            json!({ "top": { "x": 0, "y": 9 } })
        );
    }

    #[test]
    fn set_failures() {
        let registry = registry();
        let mut shape = Shape::default();

        let err = shape
            .set_attribute("label", json!(12), &registry)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.path(), "label");

        let err = shape
            .set_attribute("id", Value::Null, &registry)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);

        let err = shape
            .set_attribute("color", json!("Purple"), &registry)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEnum);

        shape.label = Some(String::from("gone"));
        shape.set_attribute("label", Value::Null, &registry).unwrap();
        assert_eq!(shape.label, None);
    }

    #[test]
    fn unknown_attribute_names() {
        let registry = registry();
        let mut shape = Shape::default();

        let err = shape.has_attribute("volume", &registry).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.message(), "`Shape` has no attribute named `volume`");

        let err = shape.get_attribute("volume", &registry).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        let err = shape
            .set_attribute("volume", json!(1), &registry)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn lifecycle() {
        let registry = registry();

        let mut point = Point::default();
        assert_eq!(point.lifecycle(&registry).unwrap(), Lifecycle::Unpopulated);
        point.set_attribute("y", json!(0), &registry).unwrap();
        assert_eq!(point.lifecycle(&registry).unwrap(), Lifecycle::Populating);
        point.set_attribute("x", json!(0), &registry).unwrap();
        assert_eq!(point.lifecycle(&registry).unwrap(), Lifecycle::Populated);

        let reading = Reading::default();
        assert_eq!(reading.lifecycle(&registry).unwrap(), Lifecycle::Unpopulated);

        // Always-present attributes count as present.
        assert_eq!(
            Shape::default().lifecycle(&registry).unwrap(),
            Lifecycle::Populating
        );
        assert_eq!(
            Shape::sample().lifecycle(&registry).unwrap(),
            Lifecycle::Populated
        );
    }

    #[test]
    fn attribute_wise_equality() {
        let registry = registry();
        let a = Shape::sample();
        let mut b = Shape::sample();
        assert!(a.equals(&b, &registry).unwrap());

        b.path[2].y = Some(1);
        assert!(!a.equals(&b, &registry).unwrap());

        // Unset required attributes compare equal.
        assert!(Point::default().equals(&Point::default(), &registry).unwrap());
        assert!(!Point::default().equals(&Point::new(0, 0), &registry).unwrap());
    }

    #[test]
    fn mapping_shorthands() {
        let registry = registry();
        let shape = Shape::sample();
        let mapping = shape.to_mapping(&registry).unwrap();
        assert_eq!(Shape::from_mapping(&mapping, &registry).unwrap(), shape);

        let mut other = Shape::default();
        other.update_from(&mapping, &registry).unwrap();
        assert_eq!(other, shape);

        let extra = json!({ "tags": ["new"] });
        other
            .merge_from(extra.as_object().unwrap(), &registry)
            .unwrap();
        assert_eq!(other.tags.len(), 3);
    }
}
