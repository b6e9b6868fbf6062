//! Items used by exported macros. Not public API.

#[cfg(feature = "auto_register")]
pub mod auto_register {
    use crate::Parsable;
    use crate::error::Result;
    use crate::registry::ParsableRegistry;
    use crate::table::TableBuilder;

    pub use inventory;

    pub struct __AutoRegisterFunc(pub fn(&mut ParsableRegistry) -> Result<()>);

    inventory::collect!(__AutoRegisterFunc);

    /// Registered by this crate itself, so its presence after a pass shows
    /// that static registration works on this platform.
    #[derive(Default)]
    pub struct __AvailFlag;

    impl Parsable for __AvailFlag {
        fn register_attributes(_: &mut TableBuilder<Self>) {}
    }

    inventory::submit! {
        __AutoRegisterFunc(ParsableRegistry::register::<__AvailFlag>)
    }

    // Every pass visits all declared types, so a type skipped by an earlier
    // failing pass is still registered, or fails again.
    pub(crate) fn register_static_types(registry: &mut ParsableRegistry) -> Result<bool> {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry)?;
        }
        Ok(registry.contains(core::any::TypeId::of::<__AvailFlag>()))
    }

    /// See [`impl_auto_register!`](crate::impl_auto_register).
    #[doc(hidden)]
    #[macro_export]
    macro_rules! __impl_auto_register {
        ($ty:ty) => {
            const _: () = {
                $crate::__macro_exports::auto_register::inventory::submit! {
                    $crate::__macro_exports::auto_register::__AutoRegisterFunc(
                        $crate::ParsableRegistry::register::<$ty>
                    )
                }
            };
        };
    }
}

#[cfg(not(feature = "auto_register"))]
pub mod auto_register {
    use crate::error::Result;
    use crate::registry::ParsableRegistry;

    #[inline(always)]
    pub(crate) fn register_static_types(_: &mut ParsableRegistry) -> Result<bool> {
        Ok(false)
    }

    #[doc(hidden)]
    #[macro_export]
    macro_rules! __impl_auto_register {
        ($ty:ty) => {};
    }
}

/// Declares a [`Parsable`](crate::Parsable) type for
/// [`ParsableRegistry::auto_register`](crate::ParsableRegistry::auto_register).
///
/// Only works for concrete types, and does nothing when the `auto_register`
/// feature is disabled.
///
/// ```
/// use vc_parsable::{Parsable, TableBuilder, impl_auto_register};
///
/// #[derive(Default)]
/// struct Settings;
///
/// impl Parsable for Settings {
///     fn register_attributes(_: &mut TableBuilder<Self>) {}
/// }
///
/// impl_auto_register!(Settings);
/// ```
#[macro_export]
macro_rules! impl_auto_register {
    ($ty:ty) => {
        $crate::__impl_auto_register!($ty);
    };
}
