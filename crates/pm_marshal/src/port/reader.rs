use alloc::vec::Vec;

use crate::error::ErrorKind;
use crate::value::{Scalar, ValueKind};

/// A stateful cursor over a decoded payload.
///
/// The *current value* is:
/// - the root, before any frame is opened;
/// - inside an object, the value selected by the last
///   [`seek_field`](Reader::seek_field);
/// - inside an array, the next unread element.
///
/// [`read_value`](Reader::read_value), [`begin_object`](Reader::begin_object)
/// and [`begin_array`](Reader::begin_array) consume the current value.
pub trait Reader {
    /// The kind of the current value, without consuming it.
    fn peek_kind(&mut self) -> Result<ValueKind, ErrorKind>;

    /// Consumes the current value, which must be an object, and enters it.
    fn begin_object(&mut self) -> Result<(), ErrorKind>;

    /// Leaves the innermost object.
    fn end_object(&mut self) -> Result<(), ErrorKind>;

    /// Consumes the current value, which must be an array, and enters it.
    ///
    /// Returns the number of elements.
    fn begin_array(&mut self) -> Result<usize, ErrorKind>;

    /// Leaves the innermost array, unread elements are skipped.
    fn end_array(&mut self) -> Result<(), ErrorKind>;

    /// Whether the innermost object still holds an unread `name` key.
    fn has_field(&self, name: &str) -> bool;

    /// Selects the next unread occurrence of `name` in the innermost object.
    ///
    /// Returns `false` if there is none.
    fn seek_field(&mut self, name: &str) -> Result<bool, ErrorKind>;

    /// The declared keys of the innermost object, in payload order.
    fn field_names(&self) -> Result<Vec<&str>, ErrorKind>;

    /// Element count of the innermost array.
    fn array_length(&self) -> Result<usize, ErrorKind>;

    /// Unread elements of the innermost array.
    fn remaining(&self) -> Result<usize, ErrorKind>;

    /// Consumes the current value, which must be a scalar.
    fn read_value(&mut self) -> Result<Scalar, ErrorKind>;

    /// Reads the `name` field of the innermost object.
    fn read_field(&mut self, name: &str) -> Result<Scalar, ErrorKind> {
        if self.seek_field(name)? {
            self.read_value()
        } else {
            Err(ErrorKind::structural(alloc::format!("no field `{name}`")))
        }
    }

    /// Reads the next element of the innermost array.
    #[inline]
    fn next_value(&mut self) -> Result<Scalar, ErrorKind> {
        self.read_value()
    }
}
