//! Runtime polymorphism without inheritance.
//!
//! A concrete type that may sit behind an abstract slot implements [`Class`]
//! with a stable [`ClassId`]. Every `Class` is a [`Polymorphic`]: the
//! object-safe capability stored as `Box<dyn Polymorphic>` in polymorphic
//! fields and heterogeneous sequences.
//!
//! On the wire a polymorphic value carries its class id in front of its own
//! fields:
//!
//! - associative: `{"$class": 7, "floors": 5}`
//! - positional: `[7, 5]`
//!
//! Decoding reads the id and builds the value through the factory registered
//! in the [`ClassRegistry`](crate::ClassRegistry).

// -----------------------------------------------------------------------------
// Modules

mod container;
mod polymorphic;

// -----------------------------------------------------------------------------
// Exports

pub use polymorphic::{Class, Polymorphic};

/// The reserved key holding the class id in associative encoding.
pub const CLASS_KEY: &str = "$class";
