//! The type registry holding one attribute table per registered type.
//!
//! ## auto_register
//!
//! See [`ParsableRegistry::auto_register`] .
//!
//! We use the [`inventory`] crate to implement static registration.
//! Not all platforms support it (although major platforms do); where it is
//! unsupported, `auto_register` does nothing and returns `Ok(false)`.
//!
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod parsable_registry;

// -----------------------------------------------------------------------------
// Exports

pub use parsable_registry::ParsableRegistry;
