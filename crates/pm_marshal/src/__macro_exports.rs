//! Items used by the exported macros. Not a public API.

#[cfg(feature = "auto_register")]
pub use inventory;

#[cfg(feature = "auto_register")]
pub mod auto_register {
    use crate::error::RegistryError;
    use crate::poly::Class;
    use crate::registry::{ClassRegistry, EnumRegistry, WireEnum};

    /// A class submitted with `auto_register_class!`.
    pub struct ClassEntry(pub fn(&mut ClassRegistry) -> Result<bool, RegistryError>);

    /// An enum submitted with `auto_register_enum!`.
    pub struct EnumEntry(pub fn(&mut EnumRegistry) -> Result<bool, RegistryError>);

    /// Submitted by this crate itself; visible only where static
    /// registration works on the current platform.
    pub struct AvailFlag;

    inventory::collect!(ClassEntry);
    inventory::collect!(EnumEntry);
    inventory::collect!(AvailFlag);

    inventory::submit!(AvailFlag);

    #[inline]
    fn available() -> bool {
        inventory::iter::<AvailFlag>.into_iter().next().is_some()
    }

    #[inline]
    pub fn register_class<T: Class>(registry: &mut ClassRegistry) -> Result<bool, RegistryError> {
        registry.register::<T>()
    }

    #[inline]
    pub fn register_enum<E: WireEnum>(registry: &mut EnumRegistry) -> Result<bool, RegistryError> {
        registry.register::<E>()
    }

    /// Returns `false` if static registration is unsupported on this platform.
    pub fn register_classes(registry: &mut ClassRegistry) -> Result<bool, RegistryError> {
        if !available() {
            return Ok(false);
        }
        for entry in inventory::iter::<ClassEntry> {
            (entry.0)(registry)?;
        }
        Ok(true)
    }

    /// Returns `false` if static registration is unsupported on this platform.
    pub fn register_enums(registry: &mut EnumRegistry) -> Result<bool, RegistryError> {
        if !available() {
            return Ok(false);
        }
        for entry in inventory::iter::<EnumEntry> {
            (entry.0)(registry)?;
        }
        Ok(true)
    }
}

#[cfg(not(feature = "auto_register"))]
pub mod auto_register {
    use crate::error::RegistryError;
    use crate::registry::{ClassRegistry, EnumRegistry};

    #[inline(always)]
    pub fn register_classes(_: &mut ClassRegistry) -> Result<bool, RegistryError> {
        Ok(false)
    }

    #[inline(always)]
    pub fn register_enums(_: &mut EnumRegistry) -> Result<bool, RegistryError> {
        Ok(false)
    }
}
