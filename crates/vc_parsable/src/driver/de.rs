use alloc::boxed::Box;
use alloc::format;
use core::any::Any;

use crate::Parsable;
use crate::driver::{Context, DEFAULT_MAX_DEPTH};
use crate::error::{ErrorKind, Result, report};
use crate::registry::ParsableRegistry;
use crate::table::AttributeTable;
use crate::value::{Mapping, TYPE_TAG_KEY, Value, shape_of};

// -----------------------------------------------------------------------------
// ParseMode

/// How decoded values are stored into the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParseMode {
    /// Every decoded value replaces the current one through the setter.
    #[default]
    Initialize,
    /// Attributes with a merge operation combine the decoded value with the
    /// current one; the others behave as in `Initialize`.
    Merge,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct UpdateOptions {
    pub mode: ParseMode,
    pub only_if_missing: bool,
}

impl UpdateOptions {
    /// Used for freshly constructed nested objects.
    pub const INITIALIZE: Self = Self {
        mode: ParseMode::Initialize,
        only_if_missing: false,
    };
}

// -----------------------------------------------------------------------------
// ParseDriver

/// Builds or updates registered [`Parsable`] objects from mappings.
///
/// # Parse Rules
///
/// Attributes are decoded in the type's parse order: attributes listed by
/// [`TableBuilder::order`](crate::TableBuilder::order) first, in that order,
/// then all others in registration order. Hence an attribute whose decoding
/// reads another attribute of the target can rely on it being set already.
///
/// - A key missing from the input leaves its attribute unchanged.
/// - A key naming no attribute is ignored.
/// - `null` clears an optional attribute and is rejected for a required one.
///
/// The first failure aborts the call. Attributes decoded before it stay
/// applied.
///
/// # Examples
///
/// ```
/// use vc_parsable::{Parsable, ParsableRegistry, ParseDriver, ParseMode, Slot, TableBuilder};
/// use serde_json::json;
///
/// #[derive(Default)]
/// struct Inventory {
///     items: Vec<String>,
/// }
///
/// impl Parsable for Inventory {
///     fn register_attributes(table: &mut TableBuilder<Self>) {
///         let items = Slot::always(|i: &Inventory| &i.items, |i, v| i.items = v)
///             .merge(|i, v| {
///                 i.items.extend(v);
///                 Ok(())
///             });
///         table.serializable("items", items);
///     }
/// }
///
/// let mut registry = ParsableRegistry::new();
/// registry.register::<Inventory>().unwrap();
///
/// let first = json!({ "items": ["rope"] });
/// let second = json!({ "items": ["lamp"] });
///
/// let driver = ParseDriver::new(&registry);
/// let mut inventory: Inventory = driver.parse(first.as_object().unwrap()).unwrap();
///
/// driver
///     .mode(ParseMode::Merge)
///     .update(&mut inventory, second.as_object().unwrap())
///     .unwrap();
/// assert_eq!(inventory.items, ["rope", "lamp"]);
/// ```
#[derive(Clone, Copy)]
pub struct ParseDriver<'a> {
    registry: &'a ParsableRegistry,
    options: UpdateOptions,
    max_depth: usize,
}

impl<'a> ParseDriver<'a> {
    /// Creates a parser in [`ParseMode::Initialize`].
    #[inline]
    pub const fn new(registry: &'a ParsableRegistry) -> Self {
        Self {
            registry,
            options: UpdateOptions::INITIALIZE,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets how the outermost object's attributes are stored.
    ///
    /// Nested objects are always freshly constructed and initialized.
    #[inline]
    pub const fn mode(self, mode: ParseMode) -> Self {
        Self {
            options: UpdateOptions {
                mode,
                only_if_missing: self.options.only_if_missing,
            },
            ..self
        }
    }

    /// Skips attributes of the outermost object that already hold a value.
    #[inline]
    pub const fn only_if_missing(self, only_if_missing: bool) -> Self {
        Self {
            options: UpdateOptions {
                mode: self.options.mode,
                only_if_missing,
            },
            ..self
        }
    }

    /// Sets how deeply nested objects may be, [`DEFAULT_MAX_DEPTH`] by default.
    #[inline]
    pub const fn max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    /// Constructs a `T` through [`Default`] and updates it from `input`.
    pub fn parse<T: Parsable>(&self, input: &Mapping) -> Result<T> {
        let mut out = T::default();
        self.update(&mut out, input)?;
        Ok(out)
    }

    /// Updates `target` from `input`.
    pub fn update<T: Parsable>(&self, target: &mut T, input: &Mapping) -> Result<()> {
        let table = self.registry.table::<T>()?;
        let mut cx = Context::new(self.registry, self.max_depth, false);
        update_table(table, target, input, self.options, &mut cx)
    }

    /// Constructs the object whose type is named by the input's
    /// [`TYPE_TAG_KEY`] entry, as written by
    /// [`SerializeDriver::with_type_tag`](crate::SerializeDriver::with_type_tag).
    ///
    /// Fails with [`ErrorKind::UnknownType`] if the tag is missing or names no
    /// registered type.
    pub fn parse_dynamic(&self, input: &Mapping) -> Result<Box<dyn Any>> {
        let tag = match input.get(TYPE_TAG_KEY) {
            Some(Value::String(tag)) => tag,
            Some(other) => {
                return Err(report(
                    ErrorKind::TypeMismatch,
                    format!("expected type name, found {}", shape_of(other)),
                )
                .within_attribute(TYPE_TAG_KEY));
            }
            None => {
                return Err(report(
                    ErrorKind::UnknownType,
                    format!("input has no `{TYPE_TAG_KEY}` entry"),
                ));
            }
        };
        let Some(construct) = self.registry.constructor(tag) else {
            return Err(report(
                ErrorKind::UnknownType,
                format!("`{tag}` does not name a registered type"),
            ));
        };
        construct(self, input)
    }
}

/// Type-erased [`ParseDriver::parse`], stored per registered type.
pub(crate) fn construct<T: Parsable>(driver: &ParseDriver<'_>, input: &Mapping) -> Result<Box<dyn Any>> {
    let out: T = driver.parse(input)?;
    Ok(Box::new(out))
}

pub(crate) fn update_table<T>(
    table: &AttributeTable<T>,
    target: &mut T,
    input: &Mapping,
    options: UpdateOptions,
    cx: &mut Context<'_>,
) -> Result<()> {
    for entry in table.parse_entries() {
        let name = entry.descriptor.name;
        let Some(value) = input.get(name) else {
            continue;
        };
        if options.only_if_missing && entry.ops.is_present(target) {
            log::debug!("kept present attribute `{name}` of `{}`", table.type_name);
            continue;
        }
        entry
            .ops
            .decode(target, value, options.mode, cx)
            .map_err(|err| err.within_attribute(name))?;
    }

    if log::log_enabled!(log::Level::Trace) {
        for key in input.keys() {
            if key != TYPE_TAG_KEY && !table.index.contains_key(key.as_str()) {
                log::trace!("ignored key `{key}` while parsing `{}`", table.type_name);
            }
        }
    }
    Ok(())
}
