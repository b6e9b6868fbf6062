use alloc::format;
use alloc::string::String;

use crate::error::{ErrorKind, Result, report};
use crate::value::{Value, shape_of};

// -----------------------------------------------------------------------------
// ParsableEnum

/// A fieldless enum that travels as its variant name.
///
/// Usually implemented through [`impl_parsable_enum!`](crate::impl_parsable_enum).
///
/// Decoding accepts either a variant name or the variant's position in
/// [`VARIANTS`](Self::VARIANTS); encoding always produces the name.
///
/// # Examples
///
/// ```
/// use vc_parsable::{ParsableEnum, impl_parsable_enum};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Unit { Celsius, Fahrenheit }
///
/// impl_parsable_enum!(Unit { Celsius, Fahrenheit });
///
/// assert_eq!(Unit::Fahrenheit.name(), "Fahrenheit");
/// assert_eq!(Unit::from_name("Celsius"), Some(Unit::Celsius));
/// assert_eq!(Unit::from_index(1), Some(Unit::Fahrenheit));
/// assert_eq!(Unit::from_name("Kelvin"), None);
/// ```
pub trait ParsableEnum: Copy + PartialEq + 'static {
    /// Every variant, in declaration order.
    const VARIANTS: &'static [Self];

    /// Returns the symbolic name of this variant.
    fn name(&self) -> &'static str;

    /// Looks up a variant by its symbolic name.
    fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.name() == name)
    }

    /// Looks up a variant by its position in [`VARIANTS`](Self::VARIANTS).
    fn from_index(index: usize) -> Option<Self> {
        Self::VARIANTS.get(index).copied()
    }
}

/// Implements [`ParsableEnum`] for a fieldless enum.
///
/// The listed variants become [`ParsableEnum::VARIANTS`] in the given order,
/// and each variant's name is its identifier.
///
/// ```
/// # use vc_parsable::impl_parsable_enum;
/// #[derive(Clone, Copy, PartialEq)]
/// enum Mode { Fast, Exact }
///
/// impl_parsable_enum!(Mode { Fast, Exact });
/// ```
#[macro_export]
macro_rules! impl_parsable_enum {
    ($ty:ty { $($variant:ident),+ $(,)? }) => {
        impl $crate::ParsableEnum for $ty {
            const VARIANTS: &'static [Self] = &[$(Self::$variant),+];

            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => ::core::stringify!($variant),)+
                }
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Codec helpers

pub(crate) fn encode_enum<E: ParsableEnum>(value: &E) -> Value {
    Value::String(String::from(value.name()))
}

#[track_caller]
pub(crate) fn decode_enum<E: ParsableEnum>(value: &Value) -> Result<E> {
    match value {
        Value::String(name) => E::from_name(name).ok_or_else(|| {
            report(
                ErrorKind::InvalidEnum,
                format!(
                    "`{name}` is not a variant of `{}`",
                    core::any::type_name::<E>()
                ),
            )
        }),
        Value::Number(number) => number
            .as_u64()
            .and_then(|index| usize::try_from(index).ok())
            .and_then(E::from_index)
            .ok_or_else(|| {
                report(
                    ErrorKind::InvalidEnum,
                    format!(
                        "{number} is not a variant index of `{}` ({} variants)",
                        core::any::type_name::<E>(),
                        E::VARIANTS.len(),
                    ),
                )
            }),
        other => Err(report(
            ErrorKind::TypeMismatch,
            format!("expected variant name, found {}", shape_of(other)),
        )),
    }
}
