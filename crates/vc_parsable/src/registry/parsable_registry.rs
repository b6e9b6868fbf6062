use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use crate::Parsable;
use crate::driver::{ParseDriver, construct};
use crate::error::{ErrorKind, Result, report};
use crate::hash::{FixedHashState, HashMap, HashSet};
use crate::table::{AttributeTable, TableBuilder};
use crate::value::Mapping;

/// Builds a type-erased object of one registered type.
pub(crate) type Constructor = fn(&ParseDriver<'_>, &Mapping) -> Result<Box<dyn Any>>;

struct TypeEntry {
    type_name: &'static str,
    type_path: &'static str,
    table: Box<dyn Any + Send + Sync>,
    construct: Constructor,
}

// -----------------------------------------------------------------------------
// ParsableRegistry

/// The store of attribute tables, one per registered [`Parsable`] type.
///
/// [Registering](Self::register) a type runs its
/// [`register_attributes`](Parsable::register_attributes) once and keeps the
/// validated, immutable [`AttributeTable`]. Nested parsable types named by
/// its attributes are registered along with it.
///
/// The registry is only mutated while registering. After that it can be
/// shared freely, e.g. by several threads serializing at once.
///
/// # Example
///
/// ```
/// use core::any::TypeId;
/// use vc_parsable::{Parsable, ParsableRegistry, Slot, TableBuilder};
///
/// #[derive(Default)]
/// struct Leaf {
///     weight: u32,
/// }
///
/// impl Parsable for Leaf {
///     fn register_attributes(table: &mut TableBuilder<Self>) {
///         table.serializable("weight", Slot::always(|l: &Leaf| &l.weight, |l, v| l.weight = v));
///     }
/// }
///
/// #[derive(Default)]
/// struct Branch {
///     leaves: Vec<Leaf>,
/// }
///
/// impl Parsable for Branch {
///     fn register_attributes(table: &mut TableBuilder<Self>) {
///         table.list_of_parsables("leaves", Slot::always(|b: &Branch| &b.leaves, |b, v| b.leaves = v));
///     }
/// }
///
/// let mut registry = ParsableRegistry::new();
/// registry.register::<Branch>().unwrap();
///
/// // The main type
/// assert!(registry.contains(TypeId::of::<Branch>()));
/// // Its nested type
/// assert!(registry.contains(TypeId::of::<Leaf>()));
/// assert_eq!(registry.get_type_path("Leaf"), Some(core::any::type_name::<Leaf>()));
/// ```
pub struct ParsableRegistry {
    tables: HashMap<TypeId, TypeEntry>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl Default for ParsableRegistry {
    /// See [`ParsableRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ParsableRegistry {
    /// Creates an empty registry.
    #[inline]
    pub const fn new() -> Self {
        Self {
            tables: HashMap::with_hasher(FixedHashState),
            type_path_to_id: HashMap::with_hasher(FixedHashState),
            type_name_to_id: HashMap::with_hasher(FixedHashState),
            ambiguous_names: HashSet::with_hasher(FixedHashState),
        }
    }

    // # Validity
    // The type must **not** already exist.
    fn add_new_type_indices(&mut self, type_id: TypeId, type_name: &'static str, type_path: &'static str) {
        if !self.ambiguous_names.contains(type_name) {
            if self.type_name_to_id.remove(type_name).is_some() {
                log::warn!(
                    "type name `{type_name}` is ambiguous, use full type paths such as `{type_path}` instead"
                );
                self.ambiguous_names.insert(type_name);
            } else {
                self.type_name_to_id.insert(type_name, type_id);
            }
        }

        // Full paths of distinct types are assumed to be distinct.
        self.type_path_to_id.insert(type_path, type_id);
    }

    /// Registers `T` if it has not been registered yet, then its nested types.
    ///
    /// If `T` is already registered, neither it nor its nested types are
    /// visited again. Hence self-referential types register fine.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::Configuration`] if the attribute table of `T`,
    /// or of a nested type, is inconsistent. See [`TableBuilder`] for the
    /// checks. On failure, every type added by this call is removed again,
    /// so registering `T` a second time fails the same way.
    pub fn register<T: Parsable>(&mut self) -> Result<()> {
        let mut added = Vec::new();
        let result = self.register_nested::<T>(&mut added);
        if result.is_err() && !added.is_empty() {
            self.remove_types(&added);
        }
        result
    }

    /// Registers `T` and its nested types, recording every new [`TypeId`]
    /// in `added`.
    pub(crate) fn register_nested<T: Parsable>(&mut self, added: &mut Vec<TypeId>) -> Result<()> {
        let type_id = TypeId::of::<T>();
        if self.tables.contains_key(&type_id) {
            return Ok(());
        }

        let mut builder = TableBuilder::<T>::new();
        T::register_attributes(&mut builder);
        let (table, dependencies) = builder.build(T::type_name(), T::type_path())?;

        log::debug!(
            "registered `{}` with {} attributes",
            T::type_path(),
            table.len()
        );

        self.add_new_type_indices(type_id, T::type_name(), T::type_path());
        self.tables.insert(
            type_id,
            TypeEntry {
                type_name: T::type_name(),
                type_path: T::type_path(),
                table: Box::new(table),
                construct: construct::<T>,
            },
        );
        added.push(type_id);

        for register in dependencies {
            register(self, added)?;
        }
        Ok(())
    }

    fn remove_types(&mut self, type_ids: &[TypeId]) {
        for type_id in type_ids {
            if let Some(entry) = self.tables.remove(type_id) {
                log::debug!("unregistered `{}`", entry.type_path);
                self.type_path_to_id.remove(entry.type_path);
            }
        }

        // A name stays ambiguous only while two remaining types share it.
        self.type_name_to_id.clear();
        self.ambiguous_names.clear();
        for (type_id, entry) in &self.tables {
            if self.ambiguous_names.contains(entry.type_name) {
                continue;
            }
            if self.type_name_to_id.remove(entry.type_name).is_some() {
                self.ambiguous_names.insert(entry.type_name);
            } else {
                self.type_name_to_id.insert(entry.type_name, *type_id);
            }
        }
    }

    /// Registers every type declared through
    /// [`impl_auto_register!`](crate::impl_auto_register).
    ///
    /// Equivalent to calling [`register`](Self::register) for each declared
    /// type. Repeated calls are cheap, since registered types are skipped.
    ///
    /// # Errors
    ///
    /// Stops at the first declared type that fails to register. Types added
    /// before it stay registered, and the next call visits all types again.
    ///
    /// ## Return Value
    ///
    /// Returns `Ok(true)` if static registration works on the current
    /// platform, `Ok(false)` otherwise or when the `auto_register` feature is
    /// disabled.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use core::any::TypeId;
    /// use vc_parsable::{Parsable, ParsableRegistry, TableBuilder, impl_auto_register};
    ///
    /// #[derive(Default)]
    /// struct Marker;
    ///
    /// impl Parsable for Marker {
    ///     fn register_attributes(_: &mut TableBuilder<Self>) {}
    /// }
    ///
    /// impl_auto_register!(Marker);
    ///
    /// let mut registry = ParsableRegistry::new();
    /// assert!(registry.auto_register().unwrap());
    /// assert!(registry.contains(TypeId::of::<Marker>()));
    /// ```
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> Result<bool> {
        crate::__macro_exports::auto_register::register_static_types(self)
    }

    /// Whether the type with the given [`TypeId`] has been registered.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.tables.contains_key(&type_id)
    }

    /// Returns the number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` if no type is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Returns the attribute table of `T`, if registered.
    pub fn get_table<T: 'static>(&self) -> Option<&AttributeTable<T>> {
        match self.tables.get(&TypeId::of::<T>()) {
            Some(entry) => entry.table.downcast_ref(),
            None => None,
        }
    }

    /// Returns the attribute table of `T`.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::Configuration`] if `T` is not registered.
    #[track_caller]
    pub fn table<T: Parsable>(&self) -> Result<&AttributeTable<T>> {
        match self.get_table::<T>() {
            Some(table) => Ok(table),
            None => Err(report(
                ErrorKind::Configuration,
                format!("`{}` is not registered", T::type_path()),
            )),
        }
    }

    /// Returns `true` if several registered types share the short `type_name`.
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// Returns the full type path of the type registered under `type_name`.
    ///
    /// Returns `None` if the name is ambiguous or unknown.
    pub fn get_type_path(&self, type_name: &str) -> Option<&'static str> {
        match self.type_name_to_id.get(type_name) {
            Some(id) => self.tables.get(id).map(|entry| entry.type_path),
            None => None,
        }
    }

    /// Iterates over the `(type name, type path)` pairs of all registered types.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&'static str, &'static str)> {
        self.tables
            .values()
            .map(|entry| (entry.type_name, entry.type_path))
    }

    /// Returns the tag written for a type: its short name, or its full path
    /// if the short name is ambiguous.
    pub(crate) fn type_tag(&self, type_name: &'static str, type_path: &'static str) -> &'static str {
        if self.is_ambiguous(type_name) {
            type_path
        } else {
            type_name
        }
    }

    /// Resolves a type tag by short name first, then by full path.
    pub(crate) fn constructor(&self, tag: &str) -> Option<Constructor> {
        let id = match self.type_name_to_id.get(tag) {
            Some(id) => id,
            None => self.type_path_to_id.get(tag)?,
        };
        self.tables.get(id).map(|entry| entry.construct)
    }
}
