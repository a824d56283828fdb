use alloc::string::ToString;
use core::fmt;

use pm_utils::hash::HashMap;

use crate::error::{ErrorKind, RegistryError};
use crate::registry::{EnumInfo, WireEnum};

/// Enum name → variant table, for lookups when the enum is only known by name.
pub struct EnumRegistry {
    enums: HashMap<&'static str, &'static EnumInfo>,
}

impl Default for EnumRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl EnumRegistry {
    #[inline]
    pub const fn new() -> Self {
        Self {
            enums: HashMap::with_hasher(pm_utils::hash::FixedHashState),
        }
    }

    /// Registers the table of `E`.
    ///
    /// Returns `Ok(false)` if an identical table is already registered.
    #[inline]
    pub fn register<E: WireEnum>(&mut self) -> Result<bool, RegistryError> {
        self.register_info(E::info())
    }

    /// Registers a validated variant table under its name.
    pub fn register_info(&mut self, info: &'static EnumInfo) -> Result<bool, RegistryError> {
        info.validate()?;

        if let Some(existing) = self.enums.get(info.name()) {
            if *existing == info {
                return Ok(false);
            }
            log::error!("enum `{}` is registered twice with different variants", info.name());
            return Err(RegistryError::ConflictingEnum(info.name()));
        }

        log::debug!("register enum `{}` ({} variants)", info.name(), info.variants().len());
        self.enums.insert(info.name(), info);
        Ok(true)
    }

    /// Automatically registers every enum submitted with
    /// [`auto_register_enum!`](crate::auto_register_enum).
    ///
    /// See [`ClassRegistry::auto_register`](crate::ClassRegistry::auto_register).
    #[inline]
    pub fn auto_register(&mut self) -> Result<bool, RegistryError> {
        crate::__macro_exports::auto_register::register_enums(self)
    }

    #[inline]
    pub fn get(&self, enum_name: &str) -> Option<&'static EnumInfo> {
        self.enums.get(enum_name).copied()
    }

    /// The code of `variant` in the enum called `enum_name`.
    pub fn code_of(&self, enum_name: &str, variant: &str) -> Result<i64, ErrorKind> {
        let info = self
            .get(enum_name)
            .ok_or_else(|| ErrorKind::structural(alloc::format!("unknown enum `{enum_name}`")))?;
        info.code_of(variant)
            .ok_or_else(|| ErrorKind::UnknownEnumName {
                enum_name: info.name(),
                name: variant.to_string(),
            })
    }

    #[inline]
    pub fn contains(&self, enum_name: &str) -> bool {
        self.enums.contains_key(enum_name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.enums.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.enums.is_empty()
    }
}

impl fmt::Debug for EnumRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.enums.keys()).finish()
    }
}
