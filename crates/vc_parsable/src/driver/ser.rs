use alloc::format;
use alloc::string::String;

use crate::Parsable;
use crate::driver::{Context, DEFAULT_MAX_DEPTH};
use crate::error::{ErrorKind, Result, report};
use crate::registry::ParsableRegistry;
use crate::table::AttributeTable;
use crate::value::{Mapping, TYPE_TAG_KEY, Value};

// -----------------------------------------------------------------------------
// SerializeDriver

/// Produces the mapping of a registered [`Parsable`] object.
///
/// # Serialization Rules
///
/// Attributes are visited by [`Category`](crate::Category) (`Serializable`,
/// `Enum`, `Parsable`, `DictOfParsables`, `ListOfParsables`, `Specialized`),
/// and within a category in registration order. For each attribute:
///
/// - a present value is encoded by its category handler;
/// - an absent optional attribute is left out;
/// - an absent required attribute fails with [`ErrorKind::UnsetAttribute`].
///
/// Any failure aborts the whole call, and the error names the path to the
/// failing attribute.
///
/// # Type Tags
///
/// With [`with_type_tag`](Self::with_type_tag), every emitted mapping,
/// nested ones included, also carries its type name under
/// [`TYPE_TAG_KEY`]:
///
/// ```text
/// {
///   "parsable_type": "Point",
///   "x": 1,
///   "y": 2
/// }
/// ```
///
/// Such mappings can be read back without naming the type, through
/// [`ParseDriver::parse_dynamic`](crate::ParseDriver::parse_dynamic).
///
/// # Examples
///
/// ```
/// use vc_parsable::{Parsable, ParsableRegistry, SerializeDriver, Slot, TableBuilder};
/// use serde_json::json;
///
/// #[derive(Default)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// impl Parsable for Point {
///     fn register_attributes(table: &mut TableBuilder<Self>) {
///         table
///             .serializable("x", Slot::always(|p: &Point| &p.x, |p, v| p.x = v))
///             .serializable("y", Slot::always(|p: &Point| &p.y, |p, v| p.y = v));
///     }
/// }
///
/// let mut registry = ParsableRegistry::new();
/// registry.register::<Point>().unwrap();
///
/// let output = SerializeDriver::new(&registry)
///     .serialize(&Point { x: 1, y: 2 })
///     .unwrap();
/// assert_eq!(serde_json::Value::Object(output), json!({ "x": 1, "y": 2 }));
/// ```
#[derive(Clone, Copy)]
pub struct SerializeDriver<'a> {
    registry: &'a ParsableRegistry,
    type_tag: bool,
    max_depth: usize,
}

impl<'a> SerializeDriver<'a> {
    /// Creates a serializer without type tags.
    #[inline]
    pub const fn new(registry: &'a ParsableRegistry) -> Self {
        Self {
            registry,
            type_tag: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Adds the type name to every emitted mapping.
    #[inline]
    pub const fn with_type_tag(self) -> Self {
        Self {
            type_tag: true,
            ..self
        }
    }

    /// Sets how deeply nested objects may be, [`DEFAULT_MAX_DEPTH`] by default.
    #[inline]
    pub const fn max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    /// Serializes `value` into a mapping.
    pub fn serialize<T: Parsable>(&self, value: &T) -> Result<Mapping> {
        let table = self.registry.table::<T>()?;
        let mut cx = Context::new(self.registry, self.max_depth, self.type_tag);
        serialize_table(table, value, &mut cx)
    }
}

pub(crate) fn serialize_table<T>(
    table: &AttributeTable<T>,
    target: &T,
    cx: &mut Context<'_>,
) -> Result<Mapping> {
    let mut out = Mapping::new();
    if cx.type_tag() {
        let tag = cx.registry().type_tag(table.type_name, table.type_path);
        out.insert(String::from(TYPE_TAG_KEY), Value::String(String::from(tag)));
    }

    for entry in table.serialize_entries() {
        let name = entry.descriptor.name;
        match entry.ops.encode(target, cx) {
            Ok(Some(value)) => {
                out.insert(String::from(name), value);
            }
            Ok(None) if entry.descriptor.required => {
                return Err(report(
                    ErrorKind::UnsetAttribute,
                    format!("required attribute `{name}` of `{}` is not set", table.type_name),
                )
                .within_attribute(name));
            }
            Ok(None) => {}
            Err(err) => return Err(err.within_attribute(name)),
        }
    }
    Ok(out)
}
