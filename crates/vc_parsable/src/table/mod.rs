//! Per-type attribute tables.
//!
//! A [`Parsable`](crate::Parsable) type describes its attributes once through
//! a [`TableBuilder`]. The resulting [`AttributeTable`] is immutable and
//! drives serialization, parsing and attribute access for that type.

mod builder;
mod descriptor;
mod dict;
mod handler;
mod slot;

pub use builder::TableBuilder;
pub use descriptor::AttributeDescriptor;
pub use dict::{DictKey, ParsableDict};
pub use handler::Specialized;
pub use slot::Slot;

pub(crate) use handler::AttributeOps;

use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;

use crate::error::{ErrorKind, Result, report};
use crate::hash::HashMap;

pub(crate) struct Entry<T> {
    pub descriptor: AttributeDescriptor,
    pub ops: Box<dyn AttributeOps<T>>,
}

// -----------------------------------------------------------------------------
// AttributeTable

/// The frozen attribute table of one type.
///
/// Obtained from [`ParsableRegistry::table`](crate::ParsableRegistry::table).
pub struct AttributeTable<T> {
    pub(crate) type_name: &'static str,
    pub(crate) type_path: &'static str,
    pub(crate) entries: Vec<Entry<T>>,
    pub(crate) index: HashMap<&'static str, usize>,
    pub(crate) parse_order: Vec<usize>,
    pub(crate) serialize_order: Vec<usize>,
}

impl<T> AttributeTable<T> {
    /// Returns the short type name, as given by [`Parsable::type_name`](crate::Parsable::type_name).
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the full type path.
    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Returns the number of registered attributes.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the type registers no attribute.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the descriptor of the attribute called `name`.
    pub fn descriptor(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.index
            .get(name)
            .map(|&position| &self.entries[position].descriptor)
    }

    /// Iterates over all descriptors in registration order.
    pub fn descriptors(&self) -> impl ExactSizeIterator<Item = &AttributeDescriptor> {
        self.entries.iter().map(|entry| &entry.descriptor)
    }

    /// Iterates over all descriptors in the order they are parsed: the
    /// declared order first, then the rest in registration order.
    pub fn parse_order(&self) -> impl ExactSizeIterator<Item = &AttributeDescriptor> {
        self.parse_entries().map(|entry| &entry.descriptor)
    }

    /// Iterates over all descriptors in the order they are serialized:
    /// by [`Category`](crate::Category), then registration order.
    pub fn serialize_order(&self) -> impl ExactSizeIterator<Item = &AttributeDescriptor> {
        self.serialize_entries().map(|entry| &entry.descriptor)
    }

    pub(crate) fn parse_entries(&self) -> impl ExactSizeIterator<Item = &Entry<T>> {
        self.parse_order.iter().map(|&position| &self.entries[position])
    }

    pub(crate) fn serialize_entries(&self) -> impl ExactSizeIterator<Item = &Entry<T>> {
        self.serialize_order
            .iter()
            .map(|&position| &self.entries[position])
    }

    /// Looks up an attribute, failing if `name` is not registered.
    #[track_caller]
    pub(crate) fn entry(&self, name: &str) -> Result<&Entry<T>> {
        match self.index.get(name) {
            Some(&position) => Ok(&self.entries[position]),
            None => Err(report(
                ErrorKind::Configuration,
                format!("`{}` has no attribute named `{name}`", self.type_name),
            )),
        }
    }
}
