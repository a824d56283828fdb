use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use super::Node;
use crate::error::{ErrorKind, MarshalError};
use crate::port::Writer;
use crate::value::Scalar;

// -----------------------------------------------------------------------------
// Frame

enum Frame {
    Object {
        entries: Vec<(String, Node)>,
        key: Option<String>,
    },
    Array {
        items: Vec<Node>,
        reserved: Option<usize>,
    },
}

// -----------------------------------------------------------------------------
// JsonWriter

/// A [`Writer`] producing JSON text.
///
/// Framing is validated eagerly: a value outside of any frame after the root,
/// a key inside an array or a value without key inside an object fail
/// immediately with [`ErrorKind::Structural`].
#[derive(Default)]
pub struct JsonWriter {
    frames: Vec<Frame>,
    root: Option<Node>,
    pretty: bool,
}

impl JsonWriter {
    /// Creates a writer producing compact JSON.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Produces indented JSON instead.
    #[inline]
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Finishes the buffer.
    ///
    /// Fails if a frame is still open or nothing was written.
    pub fn get_data(self) -> Result<Vec<u8>, MarshalError> {
        let depth = self.depth();
        if depth != 0 {
            return Err(MarshalError::new(
                ErrorKind::structural(format!("{depth} unclosed frame(s)")),
                "",
            ));
        }
        let Some(root) = self.root else {
            return Err(MarshalError::new(
                ErrorKind::structural("nothing was written"),
                "",
            ));
        };

        let output = if self.pretty {
            serde_json::to_vec_pretty(&root)
        } else {
            serde_json::to_vec(&root)
        };
        output.map_err(|e| MarshalError::new(ErrorKind::Format(e.to_string()), ""))
    }

    /// Places a finished value into the innermost frame, or as the root.
    fn place(&mut self, node: Node) -> Result<(), ErrorKind> {
        match self.frames.last_mut() {
            None => {
                if self.root.is_some() {
                    return Err(ErrorKind::structural("more than one root value"));
                }
                self.root = Some(node);
            }
            Some(Frame::Object { entries, key }) => match key.take() {
                Some(key) => entries.push((key, node)),
                None => return Err(ErrorKind::structural("object value written without a key")),
            },
            Some(Frame::Array { items, reserved }) => {
                if let Some(len) = *reserved
                    && items.len() >= len
                {
                    return Err(ErrorKind::structural(format!(
                        "no reserved space: array was opened for {len} value(s)"
                    )));
                }
                items.push(node);
            }
        }
        Ok(())
    }

    /// Checks a new frame can be placed before it is opened.
    fn check_slot(&self) -> Result<(), ErrorKind> {
        match self.frames.last() {
            None if self.root.is_some() => Err(ErrorKind::structural("more than one root value")),
            Some(Frame::Object { key: None, .. }) => {
                Err(ErrorKind::structural("nested frame opened without a key"))
            }
            Some(Frame::Array {
                items,
                reserved: Some(len),
            }) if items.len() >= *len => Err(ErrorKind::structural(format!(
                "no reserved space: array was opened for {len} value(s)"
            ))),
            _ => Ok(()),
        }
    }
}

impl Writer for JsonWriter {
    fn begin_object(&mut self) -> Result<(), ErrorKind> {
        self.check_slot()?;
        self.frames.push(Frame::Object {
            entries: Vec::new(),
            key: None,
        });
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), ErrorKind> {
        match self.frames.last() {
            Some(Frame::Object { key: None, .. }) => {}
            Some(Frame::Object { key: Some(key), .. }) => {
                return Err(ErrorKind::structural(format!(
                    "object closed after key `{key}` without a value"
                )));
            }
            Some(Frame::Array { .. }) => {
                return Err(ErrorKind::structural("end_object called on an open array"));
            }
            None => {
                return Err(ErrorKind::structural(
                    "end_object called without an open object",
                ));
            }
        }
        match self.frames.pop() {
            Some(Frame::Object { entries, .. }) => self.place(Node::Object(entries)),
            _ => Err(ErrorKind::structural("end_object called without an open object")),
        }
    }

    fn begin_array(&mut self, len: Option<usize>) -> Result<(), ErrorKind> {
        self.check_slot()?;
        self.frames.push(Frame::Array {
            items: Vec::with_capacity(len.unwrap_or(0)),
            reserved: len,
        });
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), ErrorKind> {
        match self.frames.last() {
            Some(Frame::Array { items, reserved }) => {
                if let Some(len) = *reserved
                    && items.len() != len
                {
                    return Err(ErrorKind::structural(format!(
                        "dangling data: {} of {len} reserved value(s) not written",
                        len - items.len()
                    )));
                }
            }
            Some(Frame::Object { .. }) => {
                return Err(ErrorKind::structural("end_array called on an open object"));
            }
            None => {
                return Err(ErrorKind::structural(
                    "end_array called without an open array",
                ));
            }
        }
        match self.frames.pop() {
            Some(Frame::Array { items, .. }) => self.place(Node::Array(items)),
            _ => Err(ErrorKind::structural("end_array called without an open array")),
        }
    }

    fn write_key(&mut self, name: &str) -> Result<(), ErrorKind> {
        match self.frames.last_mut() {
            Some(Frame::Object { key, .. }) => {
                if let Some(prev) = key {
                    return Err(ErrorKind::structural(format!(
                        "key `{name}` written after key `{prev}` without a value"
                    )));
                }
                *key = Some(name.into());
                Ok(())
            }
            _ => Err(ErrorKind::structural(format!(
                "key `{name}` written outside of an object"
            ))),
        }
    }

    fn write_value(&mut self, value: Scalar) -> Result<(), ErrorKind> {
        // JSON has no literal for these; serde_json would emit `null`.
        if let Scalar::Float(v) = value
            && !v.is_finite()
        {
            return Err(ErrorKind::mismatch("finite float", v));
        }
        self.place(Node::Scalar(value))
    }

    #[inline]
    fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::JsonWriter;
    use crate::error::ErrorKind;
    use crate::port::Writer;
    use crate::value::Scalar;

    #[test]
    fn keyed_and_positional() {
        let mut w = JsonWriter::new();
        w.begin_object().unwrap();
        w.write_field("id", Scalar::Uint(10)).unwrap();
        w.write_key("tags").unwrap();
        w.begin_array(Some(2)).unwrap();
        w.write_string("a").unwrap();
        w.write_bool(false).unwrap();
        w.end_array().unwrap();
        w.end_object().unwrap();
        assert_eq!(w.depth(), 0);
        assert_eq!(w.get_data().unwrap(), br#"{"id":10,"tags":["a",false]}"#);
    }

    #[test]
    fn unbalanced_framing_fails_on_get_data() {
        let mut w = JsonWriter::new();
        w.begin_array(None).unwrap();
        w.write_int(-1).unwrap();
        let err = w.get_data().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Structural(_)));
    }

    #[test]
    fn empty_writer_fails_on_get_data() {
        assert!(JsonWriter::new().get_data().is_err());
    }

    #[test]
    fn reserved_space_is_enforced() {
        let mut w = JsonWriter::new();
        w.begin_array(Some(1)).unwrap();
        w.write_uint(1).unwrap();
        assert!(w.write_uint(2).is_err());
        w.end_array().unwrap();

        let mut w = JsonWriter::new();
        w.begin_array(Some(2)).unwrap();
        w.write_uint(1).unwrap();
        let err = w.end_array().unwrap_err();
        assert!(matches!(err, ErrorKind::Structural(msg) if msg.starts_with("dangling data")));
    }

    #[test]
    fn misplaced_calls() {
        let mut w = JsonWriter::new();
        assert!(w.write_key("x").is_err());
        assert!(w.end_object().is_err());

        w.begin_object().unwrap();
        assert!(w.write_uint(1).is_err());
        assert!(w.begin_array(None).is_err());
        assert!(w.end_array().is_err());
        w.write_key("x").unwrap();
        assert!(w.write_key("y").is_err());
        assert!(w.end_object().is_err());
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        let mut w = JsonWriter::new();
        w.begin_array(None).unwrap();
        for v in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let err = w.write_float(v).unwrap_err();
            assert!(matches!(err, ErrorKind::TypeMismatch { expected: "finite float", .. }));
        }
        w.write_float(1.5).unwrap();
        w.end_array().unwrap();
        assert_eq!(w.get_data().unwrap(), b"[1.5]");
    }

    #[test]
    fn single_root() {
        let mut w = JsonWriter::new();
        w.write_uint(1).unwrap();
        assert!(w.write_uint(2).is_err());
        assert!(w.begin_object().is_err());
        assert_eq!(w.get_data().unwrap(), b"1");
    }

    #[test]
    fn pretty_output() {
        let mut w = JsonWriter::new().pretty();
        w.begin_array(None).unwrap();
        w.write_uint(1).unwrap();
        w.end_array().unwrap();
        assert_eq!(w.get_data().unwrap(), b"[\n  1\n]");
    }
}
