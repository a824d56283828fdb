//! The boundary between the codec and the byte-encoding layer.
//!
//! - [`Writer`]: a sequential emitter of framed scalar values.
//! - [`Reader`]: a sequential cursor over a decoded payload.
//!
//! Both are transient and single-use: one instance is bound to one encode or
//! decode operation and must be driven in structural order. They know nothing
//! about fields, classes or enums, only about objects, arrays, keys and
//! [`Scalar`](crate::Scalar)s. Failures are reported as bare
//! [`ErrorKind`](crate::ErrorKind)s, the codec attaches the path.
//!
//! [`crate::json`] provides the JSON implementation of both.

// -----------------------------------------------------------------------------
// Modules

mod reader;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use reader::Reader;
pub use writer::Writer;
