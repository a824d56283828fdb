//! JSON implementation of the [`port`](crate::port) traits.
//!
//! The writer assembles an ordered [`Node`] tree and hands it to `serde_json`
//! once framing is complete; the reader parses the whole payload into the same
//! tree and walks it. Keys keep their insertion order, so a given object
//! graph always produces the same bytes.
//!
//! ```
//! use pm_marshal::json::{JsonReader, JsonWriter};
//! use pm_marshal::{Reader, Scalar, Writer};
//!
//! let mut writer = JsonWriter::new();
//! writer.begin_object().unwrap();
//! writer.write_field("id", Scalar::Uint(10)).unwrap();
//! writer.write_field("version", Scalar::from("v1")).unwrap();
//! writer.end_object().unwrap();
//!
//! let bytes = writer.get_data().unwrap();
//! assert_eq!(bytes, br#"{"id":10,"version":"v1"}"#);
//!
//! let mut reader = JsonReader::from_bytes(&bytes).unwrap();
//! reader.begin_object().unwrap();
//! assert_eq!(reader.read_field("version").unwrap(), Scalar::from("v1"));
//! ```

// -----------------------------------------------------------------------------
// Modules

mod node;
mod reader;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use node::Node;
pub use reader::JsonReader;
pub use writer::JsonWriter;
