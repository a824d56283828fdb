use alloc::string::ToString;

use super::path::FieldPath;
use super::trace::TypeTrace;
use super::{Field, Marshal};
use crate::error::{ErrorKind, MarshalError};
use crate::port::Writer;
use crate::registry::WireEnum;
use crate::value::{Scalar, ScalarValue};

// -----------------------------------------------------------------------------
// WriteContext

/// The field operations available to [`Marshal::write_fields`].
///
/// In associative mode every operation emits `name: value`; in positional
/// mode only the value. The mode is chosen once at the root and applies to
/// every nested object.
pub struct WriteContext<'a> {
    writer: &'a mut dyn Writer,
    associative: bool,
    path: FieldPath,
    trace: TypeTrace,
}

impl<'a> WriteContext<'a> {
    /// Creates a context that writes into `writer`.
    pub fn new(writer: &'a mut dyn Writer, path: &str, associative: bool) -> Self {
        Self {
            writer,
            associative,
            path: FieldPath::new(path),
            trace: TypeTrace::default(),
        }
    }

    /// Whether fields are written with their names.
    #[inline]
    pub fn is_associative(&self) -> bool {
        self.associative
    }

    /// Direct access to the underlying port.
    #[inline]
    pub fn writer(&mut self) -> &mut dyn Writer {
        &mut *self.writer
    }

    // -------------------------------------------------------------------------
    // Internal

    pub(crate) fn fail(&self, kind: ErrorKind) -> MarshalError {
        MarshalError::new(kind, self.path.to_string()).with_trace(self.trace.render())
    }

    #[inline]
    pub(crate) fn lift<T>(&self, result: Result<T, ErrorKind>) -> Result<T, MarshalError> {
        result.map_err(|kind| self.fail(kind))
    }

    /// Runs `f` with `name` appended to the path, after emitting the key.
    pub(crate) fn field<R>(
        &mut self,
        field: Field,
        f: impl FnOnce(&mut Self) -> Result<R, MarshalError>,
    ) -> Result<R, MarshalError> {
        self.path.push_field(field.name);
        let result = self.key(field.name).and_then(|()| f(self));
        self.path.pop();
        result
    }

    pub(crate) fn element<R>(
        &mut self,
        index: usize,
        f: impl FnOnce(&mut Self) -> Result<R, MarshalError>,
    ) -> Result<R, MarshalError> {
        self.path.push_index(index);
        let result = f(self);
        self.path.pop();
        result
    }

    fn key(&mut self, name: &str) -> Result<(), MarshalError> {
        if self.associative {
            let result = self.writer.write_key(name);
            self.lift(result)?;
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn value(&mut self, value: Scalar) -> Result<(), MarshalError> {
        let result = self.writer.write_value(value);
        self.lift(result)
    }

    /// Opens the container of an object in the current mode.
    pub(crate) fn open(&mut self) -> Result<(), MarshalError> {
        let result = if self.associative {
            self.writer.begin_object()
        } else {
            self.writer.begin_array(None)
        };
        self.lift(result)
    }

    pub(crate) fn close(&mut self) -> Result<(), MarshalError> {
        let result = if self.associative {
            self.writer.end_object()
        } else {
            self.writer.end_array()
        };
        self.lift(result)
    }

    fn open_sequence(&mut self, len: usize) -> Result<(), MarshalError> {
        let result = self.writer.begin_array(Some(len));
        self.lift(result)
    }

    fn close_sequence(&mut self) -> Result<(), MarshalError> {
        let result = self.writer.end_array();
        self.lift(result)
    }

    fn nested<T: Marshal + ?Sized>(
        &mut self,
        type_name: &'static str,
        value: &T,
    ) -> Result<(), MarshalError> {
        self.trace.push(type_name);
        let result = self
            .open()
            .and_then(|()| value.write_fields(self))
            .and_then(|()| self.close());
        self.trace.pop();
        result
    }

    pub(crate) fn write_root<T: Marshal + ?Sized>(mut self, value: &T) -> Result<(), MarshalError> {
        self.nested(core::any::type_name::<T>(), value)
    }

    pub(crate) fn with_type<R>(
        &mut self,
        type_name: &'static str,
        f: impl FnOnce(&mut Self) -> Result<R, MarshalError>,
    ) -> Result<R, MarshalError> {
        self.trace.push(type_name);
        let result = f(self);
        self.trace.pop();
        result
    }

    // -------------------------------------------------------------------------
    // Field operations

    /// Writes a scalar field.
    pub fn scalar<T: ScalarValue>(
        &mut self,
        field: impl Into<Field>,
        value: &T,
    ) -> Result<(), MarshalError> {
        self.field(field.into(), |ctx| ctx.value(value.to_scalar()))
    }

    /// Writes an enum field as its integer code.
    pub fn enumeration<E: WireEnum>(
        &mut self,
        field: impl Into<Field>,
        value: E,
    ) -> Result<(), MarshalError> {
        self.field(field.into(), |ctx| ctx.value(Scalar::Int(value.code())))
    }

    /// Writes a nested object in the current mode.
    pub fn object<T: Marshal + ?Sized>(
        &mut self,
        field: impl Into<Field>,
        value: &T,
    ) -> Result<(), MarshalError> {
        self.field(field.into(), |ctx| {
            ctx.nested(core::any::type_name::<T>(), value)
        })
    }

    /// Writes the fields of the base part into the current container.
    ///
    /// Must come before the derived type's own fields.
    pub fn base<T: Marshal + ?Sized>(&mut self, value: &T) -> Result<(), MarshalError> {
        self.with_type(core::any::type_name::<T>(), |ctx| value.write_fields(ctx))
    }

    /// Writes a sequence of scalars.
    pub fn scalars<T: ScalarValue>(
        &mut self,
        field: impl Into<Field>,
        values: &[T],
    ) -> Result<(), MarshalError> {
        self.sequence(field.into(), values, |ctx, value| {
            ctx.value(value.to_scalar())
        })
    }

    /// Writes a sequence of enum codes.
    pub fn enumerations<E: WireEnum>(
        &mut self,
        field: impl Into<Field>,
        values: &[E],
    ) -> Result<(), MarshalError> {
        self.sequence(field.into(), values, |ctx, value| {
            ctx.value(Scalar::Int(value.code()))
        })
    }

    /// Writes a sequence of nested objects.
    pub fn objects<T: Marshal>(
        &mut self,
        field: impl Into<Field>,
        values: &[T],
    ) -> Result<(), MarshalError> {
        self.sequence(field.into(), values, |ctx, value| {
            ctx.nested(core::any::type_name::<T>(), value)
        })
    }

    /// Writes `values` as an array of known length, one element per item.
    pub(crate) fn sequence<T>(
        &mut self,
        field: Field,
        values: &[T],
        mut each: impl FnMut(&mut Self, &T) -> Result<(), MarshalError>,
    ) -> Result<(), MarshalError> {
        self.field(field, |ctx| {
            ctx.open_sequence(values.len())?;
            for (index, value) in values.iter().enumerate() {
                ctx.element(index, |ctx| each(ctx, value))?;
            }
            ctx.close_sequence()
        })
    }
}
