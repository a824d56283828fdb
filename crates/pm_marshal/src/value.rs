use alloc::string::String;
use core::fmt;

use crate::error::ErrorKind;

// -----------------------------------------------------------------------------
// Scalar

/// A primitive value crossing the port boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// The kind of the token this scalar is written as.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Scalar::Null => ValueKind::Null,
            Scalar::Bool(_) => ValueKind::Bool,
            Scalar::Int(_) => ValueKind::Int,
            Scalar::Uint(_) => ValueKind::Uint,
            Scalar::Float(_) => ValueKind::Float,
            Scalar::Str(_) => ValueKind::Str,
        }
    }

    /// Interprets the value as a signed integer.
    pub fn as_i64(&self) -> Result<i64, ErrorKind> {
        match *self {
            Scalar::Int(v) => Ok(v),
            Scalar::Uint(v) => {
                i64::try_from(v).map_err(|_| ErrorKind::mismatch("i64", format_args!("{v}")))
            }
            _ => Err(ErrorKind::mismatch("integer", self.kind())),
        }
    }

    /// Interprets the value as an unsigned integer.
    pub fn as_u64(&self) -> Result<u64, ErrorKind> {
        match *self {
            Scalar::Uint(v) => Ok(v),
            Scalar::Int(v) => {
                u64::try_from(v).map_err(|_| ErrorKind::mismatch("u64", format_args!("{v}")))
            }
            _ => Err(ErrorKind::mismatch("unsigned integer", self.kind())),
        }
    }

    /// Interprets the value as a float, integers are widened.
    pub fn as_f64(&self) -> Result<f64, ErrorKind> {
        match *self {
            Scalar::Float(v) => Ok(v),
            Scalar::Int(v) => Ok(v as f64),
            Scalar::Uint(v) => Ok(v as f64),
            _ => Err(ErrorKind::mismatch("float", self.kind())),
        }
    }

    /// Interprets the value as a bool, integers are `true` when non-zero.
    pub fn as_bool(&self) -> Result<bool, ErrorKind> {
        match *self {
            Scalar::Bool(v) => Ok(v),
            Scalar::Int(v) => Ok(v != 0),
            Scalar::Uint(v) => Ok(v != 0),
            _ => Err(ErrorKind::mismatch("bool", self.kind())),
        }
    }
}

impl From<bool> for Scalar {
    #[inline]
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    #[inline]
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<u64> for Scalar {
    #[inline]
    fn from(value: u64) -> Self {
        Scalar::Uint(value)
    }
}

impl From<f64> for Scalar {
    #[inline]
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    #[inline]
    fn from(value: &str) -> Self {
        Scalar::Str(value.into())
    }
}

impl From<String> for Scalar {
    #[inline]
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

// -----------------------------------------------------------------------------
// ValueKind

/// The kind of a wire token, used for peeking and for mismatch messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Uint,
    Float,
    Str,
    Object,
    Array,
}

impl ValueKind {
    /// Whether a token of this kind opens a frame.
    #[inline]
    pub fn is_container(self) -> bool {
        matches!(self, ValueKind::Object | ValueKind::Array)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "integer",
            ValueKind::Uint => "unsigned integer",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::Object => "object",
            ValueKind::Array => "array",
        })
    }
}

// -----------------------------------------------------------------------------
// ScalarValue

/// A field type stored as a single scalar token.
///
/// Implemented for `bool`, the fixed-size integers, `f32`, `f64` and [`String`].
/// The [`Default`] value is the zero value used for absent fields.
pub trait ScalarValue: Default + Sized {
    /// Name used in mismatch messages.
    const NAME: &'static str;

    fn to_scalar(&self) -> Scalar;

    fn from_scalar(value: Scalar) -> Result<Self, ErrorKind>;
}

macro_rules! impl_signed {
    ($($ty:ident),*) => {$(
        impl ScalarValue for $ty {
            const NAME: &'static str = stringify!($ty);

            #[inline]
            fn to_scalar(&self) -> Scalar {
                Scalar::Int(i64::from(*self))
            }

            fn from_scalar(value: Scalar) -> Result<Self, ErrorKind> {
                let v = value.as_i64().map_err(|_| ErrorKind::mismatch(Self::NAME, value.kind()))?;
                <$ty>::try_from(v).map_err(|_| ErrorKind::mismatch(Self::NAME, format_args!("{v}")))
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($ty:ident),*) => {$(
        impl ScalarValue for $ty {
            const NAME: &'static str = stringify!($ty);

            #[inline]
            fn to_scalar(&self) -> Scalar {
                Scalar::Uint(u64::from(*self))
            }

            fn from_scalar(value: Scalar) -> Result<Self, ErrorKind> {
                let v = match value {
                    Scalar::Int(v) if v < 0 => {
                        return Err(ErrorKind::mismatch(Self::NAME, format_args!("{v}")));
                    }
                    _ => value.as_u64().map_err(|_| ErrorKind::mismatch(Self::NAME, value.kind()))?,
                };
                <$ty>::try_from(v).map_err(|_| ErrorKind::mismatch(Self::NAME, format_args!("{v}")))
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64);
impl_unsigned!(u8, u16, u32, u64);

impl ScalarValue for bool {
    const NAME: &'static str = "bool";

    #[inline]
    fn to_scalar(&self) -> Scalar {
        Scalar::Bool(*self)
    }

    #[inline]
    fn from_scalar(value: Scalar) -> Result<Self, ErrorKind> {
        value.as_bool()
    }
}

impl ScalarValue for f64 {
    const NAME: &'static str = "f64";

    #[inline]
    fn to_scalar(&self) -> Scalar {
        Scalar::Float(*self)
    }

    #[inline]
    fn from_scalar(value: Scalar) -> Result<Self, ErrorKind> {
        value.as_f64()
    }
}

impl ScalarValue for f32 {
    const NAME: &'static str = "f32";

    #[inline]
    fn to_scalar(&self) -> Scalar {
        Scalar::Float(f64::from(*self))
    }

    #[inline]
    fn from_scalar(value: Scalar) -> Result<Self, ErrorKind> {
        // Narrowing is lossy by nature, the value was widened from `f32` when written.
        value.as_f64().map(|v| v as f32)
    }
}

impl ScalarValue for String {
    const NAME: &'static str = "string";

    #[inline]
    fn to_scalar(&self) -> Scalar {
        Scalar::Str(self.clone())
    }

    fn from_scalar(value: Scalar) -> Result<Self, ErrorKind> {
        match value {
            Scalar::Str(s) => Ok(s),
            other => Err(ErrorKind::mismatch(Self::NAME, other.kind())),
        }
    }
}
