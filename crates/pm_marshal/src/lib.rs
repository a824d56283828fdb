//! Polymorphism-aware object serialization runtime.
//!
//! Generated data-transfer types implement [`Marshal`]: a pair of
//! `write_fields`/`read_fields` bodies driven through a [`WriteContext`] or a
//! [`ReadContext`]. The same bodies produce two wire shapes:
//!
//! - associative (keyed): `{"id":10,"version":"v1","gold":255}`
//! - positional: `[10,"v1",255]`
//!
//! Types reachable through an abstract slot implement [`Class`], get a stable
//! [`ClassId`] and are registered in a [`ClassRegistry`], which the decoder
//! consults to rebuild the concrete value.
//!
//! ## Menu
//!
//! - [`port`]: the [`Writer`]/[`Reader`] cursors the runtime talks to.
//! - [`json`]: the JSON implementation of the ports.
//! - [`codec`]: [`Marshal`] and the field contexts.
//! - [`poly`]: [`Polymorphic`] values and [`Class`] types.
//! - [`registry`]: class and enum registries and the global init barrier.
//!
//! ## Example
//!
//! ```
//! use pm_marshal::{Marshal, MarshalError, ReadContext, WriteContext};
//!
//! #[derive(Default, Debug, PartialEq)]
//! struct Player {
//!     id: u32,
//!     version: String,
//!     gold: u64,
//! }
//!
//! impl Marshal for Player {
//!     fn write_fields(&self, ctx: &mut WriteContext<'_>) -> Result<(), MarshalError> {
//!         ctx.scalar("id", &self.id)?;
//!         ctx.scalar("version", &self.version)?;
//!         ctx.scalar("gold", &self.gold)
//!     }
//!
//!     fn read_fields(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), MarshalError> {
//!         ctx.scalar("id", &mut self.id)?;
//!         ctx.scalar("version", &mut self.version)?;
//!         ctx.scalar("gold", &mut self.gold)
//!     }
//! }
//!
//! let player = Player { id: 1, version: "Mike".into(), gold: 5 };
//!
//! let bytes = pm_marshal::to_bytes(&player, false).unwrap();
//! assert_eq!(bytes, br#"[1,"Mike",5]"#);
//!
//! let output: Player = pm_marshal::from_bytes(&bytes).unwrap();
//! assert_eq!(output, player);
//! ```

// -----------------------------------------------------------------------------
// alloc paths

// Streams, files and the global registries need `std`; everything else
// names its containers through `alloc`.
extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod io;
mod macros;
mod value;

pub mod codec;
pub mod json;
pub mod poly;
pub mod port;
pub mod registry;

#[doc(hidden)]
pub mod __macro_exports;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use codec::{Field, Marshal, ReadContext, WriteContext};
pub use error::{ErrorKind, MarshalError, RegistryError};
pub use io::{from_bytes, from_bytes_in, from_file, from_reader, read_into};
pub use io::{to_bytes, to_bytes_pretty, to_file, to_writer};
pub use poly::{Class, Polymorphic};
pub use port::{Reader, Writer};
pub use registry::{ClassId, ClassRegistry, EnumRegistry, WireEnum};
pub use value::{Scalar, ScalarValue, ValueKind};
