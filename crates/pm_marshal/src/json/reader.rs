use alloc::collections::VecDeque;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::{self, Vec};
use core::iter::Peekable;

use pm_utils::hash::HashMap;

use super::Node;
use crate::error::{ErrorKind, MarshalError};
use crate::port::Reader;
use crate::value::{Scalar, ValueKind};

// -----------------------------------------------------------------------------
// Frame

enum Frame {
    Object {
        keys: Vec<String>,
        fields: HashMap<String, VecDeque<Node>>,
        current: Option<Node>,
    },
    Array {
        items: Peekable<vec::IntoIter<Node>>,
        len: usize,
        read: usize,
    },
}

// -----------------------------------------------------------------------------
// JsonReader

/// A [`Reader`] over a JSON payload.
///
/// The payload is parsed once, eagerly, so malformed text is rejected by
/// [`from_bytes`](Self::from_bytes) before any field is decoded.
pub struct JsonReader {
    root: Option<Node>,
    frames: Vec<Frame>,
}

impl JsonReader {
    /// Parses a payload.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MarshalError> {
        let root: Node = serde_json::from_slice(bytes).map_err(|e| {
            MarshalError::new(
                ErrorKind::structural(format!("malformed payload: {e}")),
                "",
            )
        })?;
        Ok(Self::from_node(root))
    }

    /// Walks an already built tree.
    #[inline]
    pub fn from_node(root: Node) -> Self {
        Self {
            root: Some(root),
            frames: Vec::new(),
        }
    }

    fn current(&mut self) -> Result<&Node, ErrorKind> {
        match self.frames.last_mut() {
            None => self
                .root
                .as_ref()
                .ok_or_else(|| ErrorKind::structural("payload already consumed")),
            Some(Frame::Object { current, .. }) => current
                .as_ref()
                .ok_or_else(|| ErrorKind::structural("no field selected")),
            Some(Frame::Array { items, .. }) => items
                .peek()
                .ok_or_else(|| ErrorKind::structural("array exhausted")),
        }
    }

    fn take(&mut self) -> Result<Node, ErrorKind> {
        match self.frames.last_mut() {
            None => self
                .root
                .take()
                .ok_or_else(|| ErrorKind::structural("payload already consumed")),
            Some(Frame::Object { current, .. }) => current
                .take()
                .ok_or_else(|| ErrorKind::structural("no field selected")),
            Some(Frame::Array { items, read, .. }) => {
                let node = items
                    .next()
                    .ok_or_else(|| ErrorKind::structural("array exhausted"))?;
                *read += 1;
                Ok(node)
            }
        }
    }

    fn expect_kind(&mut self, expected: ValueKind) -> Result<(), ErrorKind> {
        let kind = self.current()?.kind();
        if kind == expected {
            Ok(())
        } else {
            Err(ErrorKind::TypeMismatch {
                expected: match expected {
                    ValueKind::Object => "object",
                    _ => "array",
                },
                found: kind.to_string(),
            })
        }
    }
}

impl Reader for JsonReader {
    #[inline]
    fn peek_kind(&mut self) -> Result<ValueKind, ErrorKind> {
        self.current().map(Node::kind)
    }

    fn begin_object(&mut self) -> Result<(), ErrorKind> {
        self.expect_kind(ValueKind::Object)?;
        let Node::Object(entries) = self.take()? else {
            return Err(ErrorKind::structural("object vanished while entering it"));
        };

        let mut keys = Vec::with_capacity(entries.len());
        let mut fields: HashMap<String, VecDeque<Node>> = HashMap::default();
        for (key, value) in entries {
            keys.push(key.clone());
            fields.entry(key).or_default().push_back(value);
        }

        self.frames.push(Frame::Object {
            keys,
            fields,
            current: None,
        });
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), ErrorKind> {
        match self.frames.last() {
            Some(Frame::Object { .. }) => {
                self.frames.pop();
                Ok(())
            }
            Some(Frame::Array { .. }) => {
                Err(ErrorKind::structural("end_object called on an open array"))
            }
            None => Err(ErrorKind::structural(
                "end_object called without an open object",
            )),
        }
    }

    fn begin_array(&mut self) -> Result<usize, ErrorKind> {
        self.expect_kind(ValueKind::Array)?;
        let Node::Array(items) = self.take()? else {
            return Err(ErrorKind::structural("array vanished while entering it"));
        };

        let len = items.len();
        self.frames.push(Frame::Array {
            items: items.into_iter().peekable(),
            len,
            read: 0,
        });
        Ok(len)
    }

    fn end_array(&mut self) -> Result<(), ErrorKind> {
        match self.frames.last() {
            Some(Frame::Array { len, read, .. }) => {
                if read < len {
                    log::trace!("skipping {} trailing array value(s)", len - read);
                }
                self.frames.pop();
                Ok(())
            }
            Some(Frame::Object { .. }) => {
                Err(ErrorKind::structural("end_array called on an open object"))
            }
            None => Err(ErrorKind::structural(
                "end_array called without an open array",
            )),
        }
    }

    fn has_field(&self, name: &str) -> bool {
        match self.frames.last() {
            Some(Frame::Object { fields, .. }) => {
                fields.get(name).is_some_and(|values| !values.is_empty())
            }
            _ => false,
        }
    }

    fn seek_field(&mut self, name: &str) -> Result<bool, ErrorKind> {
        match self.frames.last_mut() {
            Some(Frame::Object {
                fields, current, ..
            }) => {
                *current = fields.get_mut(name).and_then(VecDeque::pop_front);
                Ok(current.is_some())
            }
            _ => Err(ErrorKind::structural(format!(
                "field `{name}` requested outside of an object"
            ))),
        }
    }

    fn field_names(&self) -> Result<Vec<&str>, ErrorKind> {
        match self.frames.last() {
            Some(Frame::Object { keys, .. }) => Ok(keys.iter().map(String::as_str).collect()),
            _ => Err(ErrorKind::structural("field names requested outside of an object")),
        }
    }

    fn array_length(&self) -> Result<usize, ErrorKind> {
        match self.frames.last() {
            Some(Frame::Array { len, .. }) => Ok(*len),
            _ => Err(ErrorKind::structural("array length requested outside of an array")),
        }
    }

    fn remaining(&self) -> Result<usize, ErrorKind> {
        match self.frames.last() {
            Some(Frame::Array { len, read, .. }) => Ok(len - read),
            _ => Err(ErrorKind::structural("remaining requested outside of an array")),
        }
    }

    fn read_value(&mut self) -> Result<Scalar, ErrorKind> {
        let kind = self.current()?.kind();
        if kind.is_container() {
            return Err(ErrorKind::mismatch("scalar", kind));
        }
        match self.take()? {
            Node::Scalar(value) => Ok(value),
            _ => Err(ErrorKind::mismatch("scalar", kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::JsonReader;
    use crate::error::ErrorKind;
    use crate::port::Reader;
    use crate::value::{Scalar, ValueKind};

    #[test]
    fn keyed_lookup() {
        let mut r = JsonReader::from_bytes(br#"{"id":10,"version":"v1","gold":255}"#).unwrap();
        assert_eq!(r.peek_kind().unwrap(), ValueKind::Object);
        r.begin_object().unwrap();
        assert_eq!(r.field_names().unwrap(), vec!["id", "version", "gold"]);
        assert!(r.has_field("gold"));
        assert!(!r.has_field("silver"));
        assert_eq!(r.read_field("gold").unwrap(), Scalar::Uint(255));
        assert_eq!(r.read_field("id").unwrap(), Scalar::Uint(10));
        assert!(!r.seek_field("silver").unwrap());
        r.end_object().unwrap();
    }

    #[test]
    fn positional_cursor() {
        let mut r = JsonReader::from_bytes(br#"[1,"Mike",[true]]"#).unwrap();
        assert_eq!(r.begin_array().unwrap(), 3);
        assert_eq!(r.next_value().unwrap(), Scalar::Uint(1));
        assert_eq!(r.remaining().unwrap(), 2);
        assert_eq!(r.next_value().unwrap(), Scalar::Str("Mike".into()));
        assert_eq!(r.begin_array().unwrap(), 1);
        assert_eq!(r.next_value().unwrap(), Scalar::Bool(true));
        r.end_array().unwrap();
        assert_eq!(r.array_length().unwrap(), 3);
        assert_eq!(r.remaining().unwrap(), 0);
        assert!(r.next_value().is_err());
        r.end_array().unwrap();
    }

    #[test]
    fn duplicate_keys_are_taken_in_order() {
        let mut r = JsonReader::from_bytes(br#"{"a":1,"a":2}"#).unwrap();
        r.begin_object().unwrap();
        assert_eq!(r.read_field("a").unwrap(), Scalar::Uint(1));
        assert_eq!(r.read_field("a").unwrap(), Scalar::Uint(2));
        assert!(!r.has_field("a"));
    }

    #[test]
    fn kind_mismatches_do_not_consume() {
        let mut r = JsonReader::from_bytes(br#"[{"a":1}]"#).unwrap();
        r.begin_array().unwrap();
        assert!(matches!(
            r.read_value(),
            Err(ErrorKind::TypeMismatch { expected: "scalar", .. })
        ));
        assert!(matches!(
            r.begin_array(),
            Err(ErrorKind::TypeMismatch { expected: "array", .. })
        ));
        r.begin_object().unwrap();
        assert!(r.end_array().is_err());
        r.end_object().unwrap();
        r.end_array().unwrap();
    }

    #[test]
    fn malformed_payload() {
        let err = JsonReader::from_bytes(br#"{"id":"#).err().unwrap();
        assert!(matches!(err.kind(), ErrorKind::Structural(_)));
    }

    #[test]
    fn trailing_values_are_skipped() {
        let mut r = JsonReader::from_bytes(b"[1,2,3]").unwrap();
        r.begin_array().unwrap();
        assert_eq!(r.next_value().unwrap(), Scalar::Uint(1));
        r.end_array().unwrap();
        assert!(r.peek_kind().is_err());
    }
}
