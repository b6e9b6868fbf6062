#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod access;
mod category;
mod enums;
mod error;
mod parsable;
mod value;

pub mod driver;
pub mod hash;
pub mod json;
pub mod registry;
pub mod table;

#[cfg(test)]
mod fixtures;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use access::{Lifecycle, ParsableExt};
pub use category::Category;
pub use driver::{DEFAULT_MAX_DEPTH, ParseDriver, ParseMode, SerializeDriver};
pub use enums::ParsableEnum;
pub use error::{Error, ErrorKind, PathSegment, Result, report};
pub use parsable::Parsable;
pub use registry::ParsableRegistry;
pub use table::{
    AttributeDescriptor, AttributeTable, DictKey, ParsableDict, Slot, Specialized, TableBuilder,
};
pub use value::{Map, Mapping, TYPE_TAG_KEY, Value};
