/// A field descriptor as seen by the codec.
///
/// Plain names convert into optional fields: when the wire omits them the
/// target is reset to its default. Required fields fail instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub required: bool,
}

impl Field {
    #[inline]
    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
        }
    }

    #[inline]
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
        }
    }
}

impl From<&'static str> for Field {
    #[inline]
    fn from(name: &'static str) -> Self {
        Self::optional(name)
    }
}
