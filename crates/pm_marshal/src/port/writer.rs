use crate::error::ErrorKind;
use crate::value::Scalar;

/// A stateful emitter of framed values.
///
/// Keyed mode uses [`begin_object`](Writer::begin_object) and
/// [`write_field`](Writer::write_field); positional mode uses
/// [`begin_array`](Writer::begin_array) and [`write_value`](Writer::write_value).
/// A nested frame inside an object must be preceded by
/// [`write_key`](Writer::write_key).
///
/// Finishing the buffer is not part of the trait since it consumes the writer,
/// see `JsonWriter::get_data`.
pub trait Writer {
    /// Opens a keyed frame.
    fn begin_object(&mut self) -> Result<(), ErrorKind>;

    /// Closes the innermost keyed frame.
    fn end_object(&mut self) -> Result<(), ErrorKind>;

    /// Opens a positional frame.
    ///
    /// With `Some(len)` the frame reserves exactly `len` slots: writing more is
    /// a structural error, and so is closing it with slots left unwritten.
    /// `None` leaves the length unspecified.
    fn begin_array(&mut self, len: Option<usize>) -> Result<(), ErrorKind>;

    /// Closes the innermost positional frame.
    fn end_array(&mut self) -> Result<(), ErrorKind>;

    /// Emits the key of the next value of the innermost keyed frame.
    fn write_key(&mut self, name: &str) -> Result<(), ErrorKind>;

    /// Emits one scalar into the innermost frame.
    fn write_value(&mut self, value: Scalar) -> Result<(), ErrorKind>;

    /// Number of currently open frames.
    fn depth(&self) -> usize;

    /// Emits `name: value` into the innermost keyed frame.
    #[inline]
    fn write_field(&mut self, name: &str, value: Scalar) -> Result<(), ErrorKind> {
        self.write_key(name)?;
        self.write_value(value)
    }

    #[inline]
    fn write_uint(&mut self, value: u64) -> Result<(), ErrorKind> {
        self.write_value(Scalar::Uint(value))
    }

    #[inline]
    fn write_int(&mut self, value: i64) -> Result<(), ErrorKind> {
        self.write_value(Scalar::Int(value))
    }

    #[inline]
    fn write_float(&mut self, value: f64) -> Result<(), ErrorKind> {
        self.write_value(Scalar::Float(value))
    }

    #[inline]
    fn write_string(&mut self, value: &str) -> Result<(), ErrorKind> {
        self.write_value(Scalar::from(value))
    }

    #[inline]
    fn write_bool(&mut self, value: bool) -> Result<(), ErrorKind> {
        self.write_value(Scalar::Bool(value))
    }

    #[inline]
    fn write_null(&mut self) -> Result<(), ErrorKind> {
        self.write_value(Scalar::Null)
    }
}
