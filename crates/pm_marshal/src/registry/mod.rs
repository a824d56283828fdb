//! Process-wide type tables consulted while decoding.
//!
//! ## Menu
//!
//! - [`ClassId`]: the stable identifier written in front of polymorphic values.
//! - [`ClassMeta`]: id, type name and zero-value factory of a concrete type.
//! - [`ClassRegistry`]: id → [`ClassMeta`], consulted when a slot's static
//!   type is abstract.
//! - [`WireEnum`], [`EnumInfo`]: name ↔ code tables of enums.
//! - [`EnumRegistry`]: enum name → [`EnumInfo`], for lookups by name at runtime.
//! - [`init`], [`global`], [`classes`]: the one-time initialization barrier
//!   for the global [`Registries`].
//!
//! ## auto_register
//!
//! See [`ClassRegistry::auto_register`].
//!
//! We use [`inventory`] crate to implement static registration,
//! not all platforms support it (although major platforms do).
//! Types are submitted with [`auto_register_class!`](crate::auto_register_class)
//! and [`auto_register_enum!`](crate::auto_register_enum).
//!
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod class_id;
mod class_registry;
mod enum_info;
mod enum_registry;
mod global;

// -----------------------------------------------------------------------------
// Exports

pub use class_id::ClassId;
pub use class_registry::{ClassMeta, ClassRegistry};
pub use enum_info::{EnumInfo, EnumVariant, WireEnum};
pub use enum_registry::EnumRegistry;
pub use global::{Registries, classes, global, init};
