use crate::table::TableBuilder;

// -----------------------------------------------------------------------------
// Parsable

/// A type whose attributes are described once and then serialized, parsed
/// and accessed by name.
///
/// Implementors register each attribute, in exactly one category, in
/// [`register_attributes`](Self::register_attributes). The registration runs
/// once per [`ParsableRegistry`](crate::ParsableRegistry).
///
/// Parsing constructs objects through [`Default`], so a fresh object has all
/// attributes unset, or holding their constructor-initialized values.
///
/// # Examples
///
/// ```
/// use vc_parsable::{Parsable, Slot, TableBuilder};
///
/// #[derive(Default)]
/// struct Sensor {
///     id: Option<u64>,
///     label: Option<String>,
/// }
///
/// impl Parsable for Sensor {
///     fn register_attributes(table: &mut TableBuilder<Self>) {
///         table
///             .serializable("id", Slot::required(|s: &Sensor| s.id.as_ref(), |s, v| s.id = Some(v)))
///             .serializable("label", Slot::optional(|s: &Sensor| s.label.as_ref(), |s, v| s.label = v));
///     }
/// }
///
/// assert_eq!(Sensor::type_name(), "Sensor");
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a parsable type",
    note = "implement `Parsable` and register its attributes in `register_attributes`"
)]
pub trait Parsable: Default + 'static {
    /// Registers every attribute of `Self`.
    fn register_attributes(table: &mut TableBuilder<Self>);

    /// Returns the name written as type tag, the last path segment of the
    /// type by default. Generic arguments are dropped.
    fn type_name() -> &'static str {
        short_type_name(core::any::type_name::<Self>())
    }

    /// Returns the full type path.
    fn type_path() -> &'static str {
        core::any::type_name::<Self>()
    }
}

fn short_type_name(path: &'static str) -> &'static str {
    let path = match path.find('<') {
        Some(generics) => &path[..generics],
        None => path,
    };
    match path.rfind("::") {
        Some(separator) => &path[separator + 2..],
        None => path,
    }
}
