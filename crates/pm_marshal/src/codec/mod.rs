//! The field codec contract.
//!
//! A type becomes serializable by implementing [`Marshal`]: one body that
//! lists its fields in declaration order through a [`WriteContext`], and
//! the mirror body through a [`ReadContext`]. The contexts decide the wire
//! shape, so the same bodies serve associative and positional encoding.
//!
//! ## Menu
//!
//! - [`Marshal`]: the per-type contract.
//! - [`Field`]: a field name plus whether it may fall back to its default.
//! - [`WriteContext`], [`ReadContext`]: the field operations handed to the
//!   bodies (scalars, enums, nested objects, polymorphic values, sequences
//!   of each, and the base part of a derived type).
//!
//! ## Inheritance
//!
//! A derived type holds its base and calls `ctx.base(..)` before its own
//! fields, in both bodies. The base fields land in the same container,
//! ahead of the derived ones:
//!
//! ```
//! use pm_marshal::{Marshal, MarshalError, ReadContext, WriteContext};
//!
//! #[derive(Default, Debug, PartialEq)]
//! struct Base { f1: i32, f2: i32 }
//!
//! #[derive(Default, Debug, PartialEq)]
//! struct Derived { base: Base, f3: i32 }
//!
//! impl Marshal for Base {
//!     fn write_fields(&self, ctx: &mut WriteContext<'_>) -> Result<(), MarshalError> {
//!         ctx.scalar("f1", &self.f1)?;
//!         ctx.scalar("f2", &self.f2)
//!     }
//!     fn read_fields(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), MarshalError> {
//!         ctx.scalar("f1", &mut self.f1)?;
//!         ctx.scalar("f2", &mut self.f2)
//!     }
//! }
//!
//! impl Marshal for Derived {
//!     fn write_fields(&self, ctx: &mut WriteContext<'_>) -> Result<(), MarshalError> {
//!         ctx.base(&self.base)?;
//!         ctx.scalar("f3", &self.f3)
//!     }
//!     fn read_fields(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), MarshalError> {
//!         ctx.base(&mut self.base)?;
//!         ctx.scalar("f3", &mut self.f3)
//!     }
//! }
//!
//! let value = Derived { base: Base { f1: 1, f2: 2 }, f3: 3 };
//! assert_eq!(pm_marshal::to_bytes(&value, false).unwrap(), b"[1,2,3]");
//! assert_eq!(
//!     pm_marshal::to_bytes(&value, true).unwrap(),
//!     br#"{"f1":1,"f2":2,"f3":3}"#,
//! );
//! ```

// -----------------------------------------------------------------------------
// Modules

mod field;
mod path;
mod read_context;
mod trace;
mod write_context;

// -----------------------------------------------------------------------------
// Exports

pub use field::Field;
pub use read_context::ReadContext;
pub use write_context::WriteContext;

use crate::error::MarshalError;
use crate::port::{Reader, Writer};
use crate::registry::ClassRegistry;

// -----------------------------------------------------------------------------
// Marshal

/// A type with a generated Read/Write contract.
pub trait Marshal {
    /// Writes every field, base fields first, in declaration order.
    fn write_fields(&self, ctx: &mut WriteContext<'_>) -> Result<(), MarshalError>;

    /// Reads every field in the same order as [`write_fields`](Marshal::write_fields).
    fn read_fields(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), MarshalError>;

    /// Writes `self` as one root container.
    ///
    /// `associative` selects keyed (`{..}`) or positional (`[..]`) encoding
    /// for this value and everything nested in it. `path` prefixes the
    /// diagnostic path of errors.
    fn write(
        &self,
        writer: &mut dyn Writer,
        path: &str,
        associative: bool,
    ) -> Result<(), MarshalError> {
        WriteContext::new(writer, path, associative).write_root(self)
    }

    /// Reads `self` from the current value of `reader`, resolving classes
    /// through the global registry.
    fn read(&mut self, reader: &mut dyn Reader, path: &str) -> Result<(), MarshalError> {
        self.read_in(reader, path, crate::registry::classes())
    }

    /// Reads `self` from the current value of `reader`, resolving classes
    /// through `classes`.
    fn read_in(
        &mut self,
        reader: &mut dyn Reader,
        path: &str,
        classes: &ClassRegistry,
    ) -> Result<(), MarshalError> {
        ReadContext::new(reader, path, classes).read_root(self)
    }
}
