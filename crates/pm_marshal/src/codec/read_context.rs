use alloc::string::ToString;
use alloc::vec::Vec;

use super::path::FieldPath;
use super::trace::TypeTrace;
use super::{Field, Marshal};
use crate::error::{ErrorKind, MarshalError};
use crate::port::Reader;
use crate::registry::{ClassRegistry, WireEnum};
use crate::value::{Scalar, ScalarValue, ValueKind};

// -----------------------------------------------------------------------------
// Frame

/// An object being read: keyed when it arrived as `{..}`, positional when
/// it arrived as `[..]`.
#[derive(Debug, Clone, Copy)]
struct Frame {
    associative: bool,
    index: usize,
    len: usize,
}

// -----------------------------------------------------------------------------
// ReadContext

/// The field operations available to [`Marshal::read_fields`].
///
/// The shape of each object on the wire decides how its fields are located:
///
/// - keyed: by name. Unknown keys are ignored; a missing optional field is
///   reset to its default, a missing required one fails with
///   [`ErrorKind::MissingField`].
/// - positional: strictly in order. Surplus trailing values are ignored;
///   once the array is exhausted optional fields are reset to their default
///   and required ones fail with [`ErrorKind::ShortArray`].
pub struct ReadContext<'a> {
    reader: &'a mut dyn Reader,
    classes: &'a ClassRegistry,
    frames: Vec<Frame>,
    path: FieldPath,
    trace: TypeTrace,
}

impl<'a> ReadContext<'a> {
    /// Creates a context reading from `reader` and resolving polymorphic
    /// values through `classes`.
    pub fn new(reader: &'a mut dyn Reader, path: &str, classes: &'a ClassRegistry) -> Self {
        Self {
            reader,
            classes,
            frames: Vec::new(),
            path: FieldPath::new(path),
            trace: TypeTrace::default(),
        }
    }

    /// The registry used to build polymorphic values.
    #[inline]
    pub fn classes(&self) -> &'a ClassRegistry {
        self.classes
    }

    /// Whether the object being read arrived in keyed form.
    #[inline]
    pub fn is_associative(&self) -> bool {
        self.frames.last().is_some_and(|frame| frame.associative)
    }

    /// Direct access to the underlying port.
    #[inline]
    pub fn reader(&mut self) -> &mut dyn Reader {
        &mut *self.reader
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

    #[inline]
    pub(crate) fn peek(&mut self) -> Result<ValueKind, MarshalError> {
        let result = self.reader.peek_kind();
        self.lift(result)
    }

    #[inline]
    pub(crate) fn value(&mut self) -> Result<Scalar, MarshalError> {
        let result = self.reader.read_value();
        self.lift(result)
    }

    pub(crate) fn decode<T: ScalarValue>(&mut self) -> Result<T, MarshalError> {
        let scalar = self.value()?;
        self.lift(T::from_scalar(scalar))
    }

    /// Selects the value of `field` in the innermost object.
    ///
    /// Returns `false` when the field is absent and may take its default.
    fn locate(&mut self, field: Field) -> Result<bool, MarshalError> {
        let Some(frame) = self.frames.last_mut() else {
            return Err(self.fail(ErrorKind::structural("field read outside of an object")));
        };

        if frame.associative {
            let result = self.reader.seek_field(field.name);
            if self.lift(result)? {
                return Ok(true);
            }
            if field.required {
                return Err(self.fail(ErrorKind::MissingField(field.name)));
            }
            return Ok(false);
        }

        if frame.index < frame.len {
            frame.index += 1;
            return Ok(true);
        }
        if field.required {
            let (needed, found) = (frame.index + 1, frame.len);
            return Err(self.fail(ErrorKind::ShortArray { needed, found }));
        }
        Ok(false)
    }

    /// Runs `f` with the field's value selected, or `absent` if it is missing.
    pub(crate) fn field<R>(
        &mut self,
        field: Field,
        absent: impl FnOnce() -> R,
        f: impl FnOnce(&mut Self) -> Result<R, MarshalError>,
    ) -> Result<R, MarshalError> {
        self.path.push_field(field.name);
        let result = match self.locate(field) {
            Ok(true) => f(self),
            Ok(false) => Ok(absent()),
            Err(err) => Err(err),
        };
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

    /// Enters the current value as an object container.
    pub(crate) fn open(&mut self) -> Result<(), MarshalError> {
        match self.peek()? {
            ValueKind::Object => {
                let result = self.reader.begin_object();
                self.lift(result)?;
                self.frames.push(Frame {
                    associative: true,
                    index: 0,
                    len: 0,
                });
                Ok(())
            }
            ValueKind::Array => {
                let result = self.reader.begin_array();
                let len = self.lift(result)?;
                self.frames.push(Frame {
                    associative: false,
                    index: 0,
                    len,
                });
                Ok(())
            }
            kind => Err(self.fail(ErrorKind::mismatch("object", kind))),
        }
    }

    /// Enters a container whose leading value is already consumed,
    /// e.g. the class id of a polymorphic value.
    pub(crate) fn skip_leading(&mut self) {
        if let Some(frame) = self.frames.last_mut()
            && !frame.associative
        {
            frame.index += 1;
        }
    }

    pub(crate) fn close(&mut self) -> Result<(), MarshalError> {
        let Some(frame) = self.frames.pop() else {
            return Err(self.fail(ErrorKind::structural("no object to close")));
        };
        let result = if frame.associative {
            self.reader.end_object()
        } else {
            self.reader.end_array()
        };
        self.lift(result)
    }

    fn nested<T: Marshal + ?Sized>(
        &mut self,
        type_name: &'static str,
        value: &mut T,
    ) -> Result<(), MarshalError> {
        self.with_type(type_name, |ctx| {
            ctx.open()?;
            value.read_fields(ctx)?;
            ctx.close()
        })
    }

    pub(crate) fn read_root<T: Marshal + ?Sized>(mut self, value: &mut T) -> Result<(), MarshalError> {
        self.nested(core::any::type_name::<T>(), value)
    }

    /// Enters the current value as a sequence, returning its length.
    fn open_sequence(&mut self) -> Result<usize, MarshalError> {
        match self.peek()? {
            ValueKind::Array => {
                let result = self.reader.begin_array();
                self.lift(result)
            }
            kind => Err(self.fail(ErrorKind::mismatch("array", kind))),
        }
    }

    fn close_sequence(&mut self) -> Result<(), MarshalError> {
        let result = self.reader.end_array();
        self.lift(result)
    }

    /// Replaces `target` with the elements of the sequence in `field`.
    ///
    /// An absent sequence leaves `target` empty.
    pub(crate) fn sequence<T>(
        &mut self,
        field: Field,
        target: &mut Vec<T>,
        mut each: impl FnMut(&mut Self) -> Result<T, MarshalError>,
    ) -> Result<(), MarshalError> {
        target.clear();
        self.field(
            field,
            || (),
            |ctx| {
                let len = ctx.open_sequence()?;
                target.reserve(len);
                for index in 0..len {
                    let item = ctx.element(index, &mut each)?;
                    target.push(item);
                }
                ctx.close_sequence()
            },
        )
    }

    pub(crate) fn code<E: WireEnum>(&mut self) -> Result<E, MarshalError> {
        let code = self.decode::<i64>()?;
        E::from_code(code).ok_or_else(|| {
            self.fail(ErrorKind::UnknownEnumCode {
                enum_name: E::info().name(),
                code,
            })
        })
    }

    // -------------------------------------------------------------------------
    // Field operations

    /// Reads a scalar field.
    pub fn scalar<T: ScalarValue>(
        &mut self,
        field: impl Into<Field>,
        target: &mut T,
    ) -> Result<(), MarshalError> {
        *target = self.field(field.into(), T::default, Self::decode)?;
        Ok(())
    }

    /// Reads an enum field from its integer code.
    pub fn enumeration<E: WireEnum>(
        &mut self,
        field: impl Into<Field>,
        target: &mut E,
    ) -> Result<(), MarshalError> {
        *target = self.field(field.into(), E::default, Self::code)?;
        Ok(())
    }

    /// Reads a nested object, in whichever shape it arrived.
    pub fn object<T: Marshal + Default>(
        &mut self,
        field: impl Into<Field>,
        target: &mut T,
    ) -> Result<(), MarshalError> {
        let found = self.field(field.into(), || false, |ctx| {
            ctx.nested(core::any::type_name::<T>(), target)?;
            Ok(true)
        })?;
        if !found {
            *target = T::default();
        }
        Ok(())
    }

    /// Reads the fields of the base part from the current container.
    ///
    /// Must come before the derived type's own fields.
    pub fn base<T: Marshal + ?Sized>(&mut self, target: &mut T) -> Result<(), MarshalError> {
        self.with_type(core::any::type_name::<T>(), |ctx| target.read_fields(ctx))
    }

    /// Reads a sequence of scalars.
    pub fn scalars<T: ScalarValue>(
        &mut self,
        field: impl Into<Field>,
        target: &mut Vec<T>,
    ) -> Result<(), MarshalError> {
        self.sequence(field.into(), target, Self::decode)
    }

    /// Reads a sequence of enum codes.
    pub fn enumerations<E: WireEnum>(
        &mut self,
        field: impl Into<Field>,
        target: &mut Vec<E>,
    ) -> Result<(), MarshalError> {
        self.sequence(field.into(), target, Self::code)
    }

    /// Reads a sequence of nested objects.
    pub fn objects<T: Marshal + Default>(
        &mut self,
        field: impl Into<Field>,
        target: &mut Vec<T>,
    ) -> Result<(), MarshalError> {
        self.sequence(field.into(), target, |ctx| {
            let mut item = T::default();
            ctx.nested(core::any::type_name::<T>(), &mut item)?;
            Ok(item)
        })
    }
}
