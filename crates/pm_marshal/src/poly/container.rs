use alloc::boxed::Box;
use alloc::vec::Vec;

use super::{CLASS_KEY, Polymorphic};
use crate::codec::{Field, ReadContext, WriteContext};
use crate::error::{ErrorKind, MarshalError};
use crate::registry::ClassId;
use crate::value::{Scalar, ValueKind};

// -----------------------------------------------------------------------------
// Write

impl WriteContext<'_> {
    /// Writes a value whose static type is abstract.
    ///
    /// The class id precedes the fields: `{"$class": id, ..}` or `[id, ..]`.
    /// `None` is written as the bare [`ClassId::NONE`].
    pub fn polymorphic(
        &mut self,
        field: impl Into<Field>,
        value: Option<&dyn Polymorphic>,
    ) -> Result<(), MarshalError> {
        self.field(field.into(), |ctx| ctx.write_polymorphic(value))
    }

    /// Writes a heterogeneous sequence, each element with its own class id.
    pub fn polymorphics(
        &mut self,
        field: impl Into<Field>,
        values: &[Box<dyn Polymorphic>],
    ) -> Result<(), MarshalError> {
        self.sequence(field.into(), values, |ctx, value| {
            ctx.write_polymorphic(Some(&**value))
        })
    }

    fn write_polymorphic(&mut self, value: Option<&dyn Polymorphic>) -> Result<(), MarshalError> {
        let Some(value) = value else {
            return self.value(Scalar::Uint(u64::from(ClassId::NONE.get())));
        };

        let id = value.class_id();
        if id.is_none() {
            return Err(self.fail(ErrorKind::UnknownClass(id)));
        }

        self.with_type(value.type_name(), |ctx| {
            ctx.open()?;
            if ctx.is_associative() {
                let result = ctx.writer().write_key(CLASS_KEY);
                ctx.lift(result)?;
            }
            ctx.value(Scalar::Uint(u64::from(id.get())))?;
            value.write_fields(ctx)?;
            ctx.close()
        })
    }
}

// -----------------------------------------------------------------------------
// Read

impl ReadContext<'_> {
    /// Reads a value whose static type is abstract.
    ///
    /// The class id on the wire selects the factory. [`ClassId::NONE`] or
    /// `null` yield `None`; an unregistered id fails with
    /// [`ErrorKind::UnknownClass`].
    pub fn polymorphic(
        &mut self,
        field: impl Into<Field>,
        target: &mut Option<Box<dyn Polymorphic>>,
    ) -> Result<(), MarshalError> {
        *target = self.field(field.into(), || None, Self::read_polymorphic)?;
        Ok(())
    }

    /// Reads a heterogeneous sequence.
    ///
    /// Elements cannot be absent: a [`ClassId::NONE`] element fails with
    /// [`ErrorKind::UnknownClass`].
    pub fn polymorphics(
        &mut self,
        field: impl Into<Field>,
        target: &mut Vec<Box<dyn Polymorphic>>,
    ) -> Result<(), MarshalError> {
        self.sequence(field.into(), target, |ctx| match ctx.read_polymorphic()? {
            Some(value) => Ok(value),
            None => Err(ctx.fail(ErrorKind::UnknownClass(ClassId::NONE))),
        })
    }

    fn read_polymorphic(&mut self) -> Result<Option<Box<dyn Polymorphic>>, MarshalError> {
        match self.peek()? {
            ValueKind::Null => {
                self.value()?;
                Ok(None)
            }
            ValueKind::Int | ValueKind::Uint => {
                let id = ClassId::new(self.decode::<u32>()?);
                if id.is_none() {
                    Ok(None)
                } else {
                    Err(self.fail(ErrorKind::mismatch("polymorphic object", "bare class id")))
                }
            }
            ValueKind::Object | ValueKind::Array => {
                self.open()?;
                let id = self.class_id()?;
                if id.is_none() {
                    self.close()?;
                    return Ok(None);
                }

                let Some(mut value) = self.classes().create(id) else {
                    return Err(self.fail(ErrorKind::UnknownClass(id)));
                };
                self.with_type(value.type_name(), |ctx| value.read_fields(ctx))?;
                self.close()?;
                Ok(Some(value))
            }
            kind => Err(self.fail(ErrorKind::mismatch("polymorphic object", kind))),
        }
    }

    /// Consumes the class id at the front of the innermost container.
    fn class_id(&mut self) -> Result<ClassId, MarshalError> {
        if self.is_associative() {
            let result = self.reader().seek_field(CLASS_KEY);
            if !self.lift(result)? {
                let msg = alloc::format!("missing `{CLASS_KEY}` key");
                return Err(self.fail(ErrorKind::structural(msg)));
            }
        } else {
            let result = self.reader().remaining();
            if self.lift(result)? == 0 {
                return Err(self.fail(ErrorKind::structural("missing class id")));
            }
            self.skip_leading();
        }
        Ok(ClassId::new(self.decode::<u32>()?))
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::codec::{Marshal, ReadContext, WriteContext};
    use crate::error::{ErrorKind, MarshalError};
    use crate::json::{JsonReader, JsonWriter};
    use crate::poly::{Class, Polymorphic};
    use crate::registry::{ClassId, ClassRegistry};

    #[derive(Default, Clone, PartialEq, Debug)]
    struct Shape {
        sides: u8,
    }

    impl Marshal for Shape {
        fn write_fields(&self, ctx: &mut WriteContext<'_>) -> Result<(), MarshalError> {
            ctx.scalar("sides", &self.sides)
        }

        fn read_fields(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), MarshalError> {
            ctx.scalar("sides", &mut self.sides)
        }
    }

    impl Class for Shape {
        const CLASS_ID: ClassId = ClassId::new(1);
    }

    #[derive(Default, Clone, PartialEq, Debug)]
    struct Circle {
        shape: Shape,
        radius: f64,
    }

    impl Marshal for Circle {
        fn write_fields(&self, ctx: &mut WriteContext<'_>) -> Result<(), MarshalError> {
            ctx.base(&self.shape)?;
            ctx.scalar("radius", &self.radius)
        }

        fn read_fields(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), MarshalError> {
            ctx.base(&mut self.shape)?;
            ctx.scalar("radius", &mut self.radius)
        }
    }

    impl Class for Circle {
        const CLASS_ID: ClassId = ClassId::new(2);
    }

    #[derive(Default, Debug, PartialEq)]
    struct Canvas {
        focus: Option<Box<dyn Polymorphic>>,
        shapes: Vec<Box<dyn Polymorphic>>,
    }

    impl Marshal for Canvas {
        fn write_fields(&self, ctx: &mut WriteContext<'_>) -> Result<(), MarshalError> {
            ctx.polymorphic("focus", self.focus.as_deref())?;
            ctx.polymorphics("shapes", &self.shapes)
        }

        fn read_fields(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), MarshalError> {
            ctx.polymorphic("focus", &mut self.focus)?;
            ctx.polymorphics("shapes", &mut self.shapes)
        }
    }

    // A class claiming the reserved id.
    #[derive(Default, Clone, PartialEq, Debug)]
    struct Void;

    impl Marshal for Void {
        fn write_fields(&self, _: &mut WriteContext<'_>) -> Result<(), MarshalError> {
            Ok(())
        }

        fn read_fields(&mut self, _: &mut ReadContext<'_>) -> Result<(), MarshalError> {
            Ok(())
        }
    }

    impl Class for Void {
        const CLASS_ID: ClassId = ClassId::NONE;
    }

    fn registry() -> ClassRegistry {
        let mut classes = ClassRegistry::new();
        classes.register::<Shape>().unwrap();
        classes.register::<Circle>().unwrap();
        classes
    }

    fn encode(value: &Canvas, associative: bool) -> Vec<u8> {
        let mut writer = JsonWriter::new();
        value.write(&mut writer, "canvas", associative).unwrap();
        writer.get_data().unwrap()
    }

    fn decode(bytes: &[u8], classes: &ClassRegistry) -> Result<Canvas, MarshalError> {
        let mut reader = JsonReader::from_bytes(bytes).unwrap();
        let mut canvas = Canvas::default();
        canvas.read_in(&mut reader, "canvas", classes)?;
        Ok(canvas)
    }

    fn sample() -> Canvas {
        Canvas {
            focus: Some(Box::new(Circle {
                shape: Shape { sides: 0 },
                radius: 1.5,
            })),
            shapes: vec![
                Box::new(Shape { sides: 3 }),
                Box::new(Circle {
                    shape: Shape { sides: 0 },
                    radius: 2.0,
                }),
            ],
        }
    }

    #[test]
    fn keyed_encoding() {
        let bytes = encode(&sample(), true);
        assert_eq!(
            bytes,
            br#"{"focus":{"$class":2,"sides":0,"radius":1.5},"shapes":[{"$class":1,"sides":3},{"$class":2,"sides":0,"radius":2.0}]}"#
        );
        assert_eq!(decode(&bytes, &registry()).unwrap(), sample());
    }

    #[test]
    fn positional_encoding() {
        let bytes = encode(&sample(), false);
        assert_eq!(bytes, br#"[[2,0,1.5],[[1,3],[2,0,2.0]]]"#);
        assert_eq!(decode(&bytes, &registry()).unwrap(), sample());
    }

    #[test]
    fn absent_value() {
        let canvas = Canvas::default();
        let bytes = encode(&canvas, false);
        assert_eq!(bytes, b"[4294967295,[]]");
        assert_eq!(decode(&bytes, &registry()).unwrap(), canvas);
        assert_eq!(decode(br#"{"focus":null}"#, &registry()).unwrap(), canvas);
    }

    #[test]
    fn unknown_class() {
        let err = decode(br#"[[7,1]]"#, &registry()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnknownClass(ClassId::new(7)));
        assert_eq!(err.path(), "canvas.focus");

        let err = decode(br#"[null,[[1,3],4294967295]]"#, &registry()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnknownClass(ClassId::NONE));
        assert_eq!(err.path(), "canvas.shapes[1]");

        let err = decode(br#"[[2,0,1.5]]"#, &ClassRegistry::new()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnknownClass(ClassId::new(2)));
    }

    #[test]
    fn malformed_containers() {
        let err = decode(br#"{"focus":{"sides":3}}"#, &registry()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Structural(_)));

        let err = decode(br#"[[]]"#, &registry()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Structural(_)));

        let err = decode(br#"[5]"#, &registry()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn reserved_id_is_not_written() {
        let canvas = Canvas {
            focus: None,
            shapes: vec![Box::new(Shape { sides: 4 }), Box::new(Void)],
        };
        for associative in [true, false] {
            let mut writer = JsonWriter::new();
            let err = canvas.write(&mut writer, "canvas", associative).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::UnknownClass(ClassId::NONE));
            assert_eq!(err.path(), "canvas.shapes[1]");
        }
    }
}
