//! Small containers shared by the `polymarshal` crates.
//!
//! - [`hash`]: `hashbrown` containers with a fixed-seed `foldhash` state,
//!   so iteration order and hash results only depend on the input.
//! - [`IdMap`]: a map keyed by stable `u32` class identifiers.
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod id_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use id_map::IdMap;
