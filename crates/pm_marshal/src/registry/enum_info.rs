use alloc::string::ToString;
use core::fmt::Debug;

use crate::error::{ErrorKind, RegistryError};

// -----------------------------------------------------------------------------
// EnumVariant

/// One name ↔ code pair of a wire enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumVariant {
    pub name: &'static str,
    pub code: i64,
}

impl EnumVariant {
    #[inline]
    pub const fn new(name: &'static str, code: i64) -> Self {
        Self { name, code }
    }
}

// -----------------------------------------------------------------------------
// EnumInfo

/// The static variant table of a wire enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumInfo {
    name: &'static str,
    variants: &'static [EnumVariant],
}

impl EnumInfo {
    #[inline]
    pub const fn new(name: &'static str, variants: &'static [EnumVariant]) -> Self {
        Self { name, variants }
    }

    /// The enum's name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Variants in declaration order.
    #[inline]
    pub const fn variants(&self) -> &'static [EnumVariant] {
        self.variants
    }

    /// Case-sensitive name lookup.
    pub fn code_of(&self, name: &str) -> Option<i64> {
        self.variants
            .iter()
            .find(|variant| variant.name == name)
            .map(|variant| variant.code)
    }

    pub fn name_of(&self, code: i64) -> Option<&'static str> {
        self.variants
            .iter()
            .find(|variant| variant.code == code)
            .map(|variant| variant.name)
    }

    /// Rejects tables that declare a name or a code twice.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for (index, variant) in self.variants.iter().enumerate() {
            for earlier in &self.variants[..index] {
                if earlier.name == variant.name {
                    return Err(RegistryError::DuplicateEnumName {
                        enum_name: self.name,
                        name: variant.name,
                    });
                }
                if earlier.code == variant.code {
                    return Err(RegistryError::DuplicateEnumCode {
                        enum_name: self.name,
                        code: variant.code,
                    });
                }
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// WireEnum

/// An enum written as its integer code.
///
/// Usually implemented through [`wire_enum!`](crate::wire_enum).
pub trait WireEnum: Copy + Default + Eq + Debug + Send + Sync + 'static {
    fn info() -> &'static EnumInfo;

    /// The integer written on the wire.
    fn code(self) -> i64;

    /// The variant with the given code.
    fn from_code(code: i64) -> Option<Self>;

    /// The declared name of the variant.
    fn name(self) -> &'static str {
        Self::info().name_of(self.code()).unwrap_or("")
    }

    /// Resolves a variant by its exact, case-sensitive name.
    fn by_name(name: &str) -> Result<Self, ErrorKind> {
        let info = Self::info();
        info.code_of(name)
            .and_then(Self::from_code)
            .ok_or_else(|| ErrorKind::UnknownEnumName {
                enum_name: info.name(),
                name: name.to_string(),
            })
    }
}
