use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;
use core::any::TypeId;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Parsable;
use crate::category::Category;
use crate::enums::ParsableEnum;
use crate::error::{ErrorKind, Result, report};
use crate::hash::{HashMap, HashSet};
use crate::registry::ParsableRegistry;
use crate::table::handler::{
    AttributeOps, DictCodec, EnumCodec, ListCodec, ParsableCodec, SerializableCodec, SlotOps,
};
use crate::table::{AttributeDescriptor, AttributeTable, Entry, ParsableDict, Slot, Specialized};
use crate::value::TYPE_TAG_KEY;

/// Registers a nested type into a registry, recording the types it adds.
pub(crate) type Dependency = fn(&mut ParsableRegistry, &mut Vec<TypeId>) -> Result<()>;

// -----------------------------------------------------------------------------
// TableBuilder

/// Collects the attributes of `T` while [`Parsable::register_attributes`] runs.
///
/// Each attribute is registered exactly once, into exactly one category, by
/// calling the method named after the category. Names are checked when the
/// table is built: a name registered twice, an order entry that names no
/// attribute, an order entry listed twice, or an attribute named
/// [`TYPE_TAG_KEY`] fails registration with [`ErrorKind::Configuration`].
///
/// Registering a nested object, dictionary or list also registers the nested
/// type itself.
///
/// # Examples
///
/// ```
/// use vc_parsable::{Parsable, ParsableRegistry, Slot, TableBuilder};
///
/// #[derive(Default)]
/// struct Point {
///     x: Option<i64>,
///     y: Option<i64>,
/// }
///
/// impl Parsable for Point {
///     fn register_attributes(table: &mut TableBuilder<Self>) {
///         table
///             .serializable("x", Slot::required(|p: &Point| p.x.as_ref(), |p, v| p.x = Some(v)))
///             .serializable("y", Slot::required(|p: &Point| p.y.as_ref(), |p, v| p.y = Some(v)))
///             .order(&["y"]);
///     }
/// }
///
/// let mut registry = ParsableRegistry::new();
/// registry.register::<Point>().unwrap();
///
/// let table = registry.table::<Point>().unwrap();
/// let order: Vec<_> = table.parse_order().map(|d| d.name()).collect();
/// assert_eq!(order, ["y", "x"]);
/// ```
pub struct TableBuilder<T> {
    entries: Vec<Entry<T>>,
    order: Vec<&'static str>,
    dependencies: Vec<Dependency>,
}

impl<T: 'static> TableBuilder<T> {
    #[inline]
    pub(crate) const fn new() -> Self {
        Self {
            entries: Vec::new(),
            order: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    fn push(
        &mut self,
        name: &'static str,
        category: Category,
        required: bool,
        ops: Box<dyn AttributeOps<T>>,
    ) -> &mut Self {
        self.entries.push(Entry {
            descriptor: AttributeDescriptor {
                name,
                category,
                required,
                order_rank: None,
            },
            ops,
        });
        self
    }

    /// Registers an attribute converted through its `serde` implementation.
    pub fn serializable<F>(&mut self, name: &'static str, slot: Slot<T, F>) -> &mut Self
    where
        F: Serialize + DeserializeOwned + 'static,
    {
        let required = slot.is_required();
        let ops = SlotOps::<T, F, SerializableCodec>::new(slot);
        self.push(name, Category::Serializable, required, Box::new(ops))
    }

    /// Registers an attribute holding a [`ParsableEnum`], encoded by variant name.
    pub fn enumeration<E: ParsableEnum>(&mut self, name: &'static str, slot: Slot<T, E>) -> &mut Self {
        let required = slot.is_required();
        let ops = SlotOps::<T, E, EnumCodec>::new(slot);
        self.push(name, Category::Enum, required, Box::new(ops))
    }

    /// Registers an attribute holding one nested parsable object.
    pub fn parsable<P: Parsable>(&mut self, name: &'static str, slot: Slot<T, P>) -> &mut Self {
        self.dependencies.push(ParsableRegistry::register_nested::<P>);
        let required = slot.is_required();
        let ops = SlotOps::<T, P, ParsableCodec>::new(slot);
        self.push(name, Category::Parsable, required, Box::new(ops))
    }

    /// Registers an attribute holding a map of nested parsable objects.
    pub fn dict_of_parsables<D: ParsableDict>(
        &mut self,
        name: &'static str,
        slot: Slot<T, D>,
    ) -> &mut Self {
        self.dependencies
            .push(ParsableRegistry::register_nested::<D::Item>);
        let required = slot.is_required();
        let ops = SlotOps::<T, D, DictCodec>::new(slot);
        self.push(name, Category::DictOfParsables, required, Box::new(ops))
    }

    /// Registers an attribute holding an ordered list of nested parsable objects.
    pub fn list_of_parsables<P: Parsable>(
        &mut self,
        name: &'static str,
        slot: Slot<T, Vec<P>>,
    ) -> &mut Self {
        self.dependencies.push(ParsableRegistry::register_nested::<P>);
        let required = slot.is_required();
        let ops = SlotOps::<T, Vec<P>, ListCodec>::new(slot);
        self.push(name, Category::ListOfParsables, required, Box::new(ops))
    }

    /// Registers an attribute converted by hand-written functions.
    pub fn specialized(&mut self, name: &'static str, handler: Specialized<T>) -> &mut Self {
        let required = handler.is_required();
        self.push(name, Category::Specialized, required, Box::new(handler))
    }

    /// Declares attributes that must be parsed first, in the given order.
    ///
    /// Repeated calls append. Attributes not listed are parsed afterwards in
    /// registration order. The order has no effect on serialization.
    pub fn order(&mut self, names: &[&'static str]) -> &mut Self {
        self.order.extend_from_slice(names);
        self
    }

    /// Validates the collected attributes and freezes them into a table.
    pub(crate) fn build(
        self,
        type_name: &'static str,
        type_path: &'static str,
    ) -> Result<(AttributeTable<T>, Vec<Dependency>)> {
        let Self {
            mut entries,
            order,
            dependencies,
        } = self;

        let mut index = HashMap::with_capacity_and_hasher(entries.len(), Default::default());
        for (position, entry) in entries.iter().enumerate() {
            let name = entry.descriptor.name;
            if name == TYPE_TAG_KEY {
                return Err(report(
                    ErrorKind::Configuration,
                    format!("`{type_name}` registers the reserved attribute name `{name}`"),
                ));
            }
            if index.insert(name, position).is_some() {
                return Err(report(
                    ErrorKind::Configuration,
                    format!("`{type_name}` registers attribute `{name}` more than once"),
                ));
            }
        }

        let mut parse_order = Vec::with_capacity(entries.len());
        let mut listed = HashSet::default();
        for (rank, &name) in order.iter().enumerate() {
            let Some(&position) = index.get(name) else {
                return Err(report(
                    ErrorKind::Configuration,
                    format!(
                        "parse order of `{type_name}` names `{name}`, which is not a registered attribute"
                    ),
                ));
            };
            if !listed.insert(name) {
                return Err(report(
                    ErrorKind::Configuration,
                    format!("parse order of `{type_name}` lists `{name}` more than once"),
                ));
            }
            entries[position].descriptor.order_rank = Some(rank);
            parse_order.push(position);
        }
        parse_order.extend(
            entries
                .iter()
                .enumerate()
                .filter(|(_, entry)| entry.descriptor.order_rank.is_none())
                .map(|(position, _)| position),
        );

        let mut serialize_order: Vec<usize> = (0..entries.len()).collect();
        serialize_order.sort_by_key(|&position| entries[position].descriptor.category);

        let table = AttributeTable {
            type_name,
            type_path,
            entries,
            index,
            parse_order,
            serialize_order,
        };
        Ok((table, dependencies))
    }
}
