use alloc::string::String;
use core::fmt;

use thiserror::Error;

use crate::registry::ClassId;

// -----------------------------------------------------------------------------
// ErrorKind

/// What went wrong while encoding or decoding, without the location.
///
/// Port implementations return bare kinds; the codec contexts attach the
/// diagnostic path and produce a [`MarshalError`].
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Framing imbalance, an unexpected token or a malformed payload.
    #[error("structural error: {0}")]
    Structural(String),

    /// The wire value cannot be coerced to the declared type.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    /// The decoded class id has no registered factory.
    #[error("unknown class id {0}")]
    UnknownClass(ClassId),

    /// A name lookup missed the variants of an enum.
    #[error("unknown enum name `{name}` for `{enum_name}`")]
    UnknownEnumName {
        enum_name: &'static str,
        name: String,
    },

    /// A decoded integer is not the code of any variant.
    #[error("unknown enum code {code} for `{enum_name}`")]
    UnknownEnumCode { enum_name: &'static str, code: i64 },

    /// A positional array ended before a required field.
    #[error("array too short: required field at position {needed} but only {found} values")]
    ShortArray { needed: usize, found: usize },

    /// A keyed object lacks a required field.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// The byte layer failed to produce or parse text.
    #[error("format error: {0}")]
    Format(String),

    /// Reading or writing the underlying stream failed.
    #[error("io error: {0}")]
    Io(String),
}

impl ErrorKind {
    #[inline]
    pub(crate) fn structural(msg: impl Into<String>) -> Self {
        Self::Structural(msg.into())
    }

    #[inline]
    pub(crate) fn mismatch(expected: &'static str, found: impl fmt::Display) -> Self {
        use alloc::string::ToString;
        Self::TypeMismatch {
            expected,
            found: found.to_string(),
        }
    }
}

// -----------------------------------------------------------------------------
// MarshalError

/// A codec failure annotated with the path of the deepest failing field.
///
/// The path is a human readable prefix such as `player.inventory[2].name`;
/// it carries no semantic weight.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} (at `{path}`){trace}")]
pub struct MarshalError {
    kind: ErrorKind,
    path: String,
    trace: TraceNote,
}

impl MarshalError {
    /// Creates an error at the given path.
    #[inline]
    pub fn new(kind: ErrorKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            trace: TraceNote(String::new()),
        }
    }

    #[inline]
    pub(crate) fn with_trace(mut self, trace: String) -> Self {
        self.trace = TraceNote(trace);
        self
    }

    /// The reason of the failure.
    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The diagnostic path of the failing field.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Consumes the error, returning the reason.
    #[inline]
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }
}

/// Rendered type stack, empty unless the `debug` feature collected one.
#[derive(Debug, Clone, PartialEq, Default)]
struct TraceNote(String);

impl fmt::Display for TraceNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            Ok(())
        } else {
            write!(f, " (stack:\n{})", self.0)
        }
    }
}

// -----------------------------------------------------------------------------
// RegistryError

/// Configuration errors detected while the registries are built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("class id {id} is already bound to `{existing}`, cannot bind `{incoming}`")]
    ConflictingClass {
        id: ClassId,
        existing: &'static str,
        incoming: &'static str,
    },

    #[error("class id {0} is reserved")]
    ReservedClassId(ClassId),

    #[error("factory registered under class id {expected} produces `{type_name}` with class id {actual}")]
    ClassIdMismatch {
        expected: ClassId,
        actual: ClassId,
        type_name: &'static str,
    },

    #[error("enum `{0}` is already registered with different variants")]
    ConflictingEnum(&'static str),

    #[error("enum `{enum_name}` declares the name `{name}` twice")]
    DuplicateEnumName {
        enum_name: &'static str,
        name: &'static str,
    },

    #[error("enum `{enum_name}` declares the code {code} twice")]
    DuplicateEnumCode { enum_name: &'static str, code: i64 },

    #[error("the global registries are already initialized")]
    AlreadyInitialized,
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{ErrorKind, MarshalError};

    #[test]
    fn display_includes_path() {
        let err = MarshalError::new(ErrorKind::MissingField("gold"), "player");
        assert_eq!(
            err.to_string(),
            "missing required field `gold` (at `player`)"
        );
        assert_eq!(err.path(), "player");
        assert_eq!(err.kind(), &ErrorKind::MissingField("gold"));
    }

    #[test]
    fn display_appends_trace() {
        let err = MarshalError::new(ErrorKind::structural("oops"), "a.b")
            .with_trace("`A`\n -> `B`\n".into());
        assert!(err.to_string().ends_with("(stack:\n`A`\n -> `B`\n)"));
    }
}
