//! Byte, stream and file entry points over the JSON port.

use alloc::string::ToString;
use alloc::vec::Vec;
use std::io::{Read, Write};
use std::path::Path;

use crate::codec::Marshal;
use crate::error::{ErrorKind, MarshalError};
use crate::json::{JsonReader, JsonWriter};
use crate::registry::ClassRegistry;

const ROOT: &str = "";

#[inline]
fn io_error(err: std::io::Error, path: impl AsRef<Path>) -> MarshalError {
    MarshalError::new(ErrorKind::Io(err.to_string()), path.as_ref().display().to_string())
}

fn encode<T: Marshal + ?Sized>(
    value: &T,
    mut writer: JsonWriter,
    associative: bool,
) -> Result<Vec<u8>, MarshalError> {
    value.write(&mut writer, ROOT, associative)?;
    writer.get_data()
}

// -----------------------------------------------------------------------------
// Bytes

/// Encodes `value` as compact JSON.
///
/// `associative` selects keyed (`{..}`) or positional (`[..]`) objects.
pub fn to_bytes<T: Marshal + ?Sized>(value: &T, associative: bool) -> Result<Vec<u8>, MarshalError> {
    encode(value, JsonWriter::new(), associative)
}

/// Encodes `value` as indented JSON.
pub fn to_bytes_pretty<T: Marshal + ?Sized>(
    value: &T,
    associative: bool,
) -> Result<Vec<u8>, MarshalError> {
    encode(value, JsonWriter::new().pretty(), associative)
}

/// Decodes a `T`, resolving classes through the global registry.
pub fn from_bytes<T: Marshal + Default>(bytes: &[u8]) -> Result<T, MarshalError> {
    from_bytes_in(bytes, crate::registry::classes())
}

/// Decodes a `T`, resolving classes through `classes`.
pub fn from_bytes_in<T: Marshal + Default>(
    bytes: &[u8],
    classes: &ClassRegistry,
) -> Result<T, MarshalError> {
    let mut value = T::default();
    let mut reader = JsonReader::from_bytes(bytes)?;
    value.read_in(&mut reader, ROOT, classes)?;
    Ok(value)
}

/// Decodes into an existing value.
///
/// Fields missing from the payload are reset to their defaults, so the
/// result does not depend on the previous content.
pub fn read_into<T: Marshal + ?Sized>(value: &mut T, bytes: &[u8]) -> Result<(), MarshalError> {
    let mut reader = JsonReader::from_bytes(bytes)?;
    value.read(&mut reader, ROOT)
}

// -----------------------------------------------------------------------------
// Streams

/// Encodes `value` into `sink`.
pub fn to_writer<T: Marshal + ?Sized>(
    value: &T,
    mut sink: impl Write,
    associative: bool,
) -> Result<(), MarshalError> {
    let bytes = to_bytes(value, associative)?;
    sink.write_all(&bytes)
        .and_then(|()| sink.flush())
        .map_err(|err| io_error(err, ROOT))
}

/// Decodes a `T` from everything left in `source`.
pub fn from_reader<T: Marshal + Default>(mut source: impl Read) -> Result<T, MarshalError> {
    let mut bytes = Vec::new();
    source
        .read_to_end(&mut bytes)
        .map_err(|err| io_error(err, ROOT))?;
    from_bytes(&bytes)
}

// -----------------------------------------------------------------------------
// Files

/// Encodes `value` and writes it to `path`, replacing the file.
pub fn to_file<T: Marshal + ?Sized>(
    value: &T,
    path: impl AsRef<Path>,
    associative: bool,
) -> Result<(), MarshalError> {
    let bytes = to_bytes(value, associative)?;
    std::fs::write(path.as_ref(), bytes).map_err(|err| io_error(err, path))
}

/// Reads and decodes the file at `path`.
pub fn from_file<T: Marshal + Default>(path: impl AsRef<Path>) -> Result<T, MarshalError> {
    let bytes = std::fs::read(path.as_ref()).map_err(|err| io_error(err, &path))?;
    from_bytes(&bytes)
}
