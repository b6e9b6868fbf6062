//! Serialization and parsing of registered types.
//!
//! - [`SerializeDriver`]: object to [`Mapping`](crate::Mapping).
//! - [`ParseDriver`]: [`Mapping`](crate::Mapping) to object, or into an existing object.

mod context;
mod de;
mod ser;

pub use context::DEFAULT_MAX_DEPTH;
pub use de::{ParseDriver, ParseMode};
pub use ser::SerializeDriver;

pub(crate) use context::Context;
pub(crate) use de::{UpdateOptions, construct, update_table};
pub(crate) use ser::serialize_table;
