use std::sync::OnceLock;

use crate::error::RegistryError;
use crate::registry::{ClassRegistry, EnumRegistry};

// -----------------------------------------------------------------------------
// Registries

/// The process-wide tables, frozen after [`init`].
#[derive(Debug, Default)]
pub struct Registries {
    pub classes: ClassRegistry,
    pub enums: EnumRegistry,
}

static GLOBAL: OnceLock<Registries> = OnceLock::new();

static EMPTY_CLASSES: ClassRegistry = ClassRegistry::new();

/// Builds the global registries exactly once.
///
/// Auto-registered types are inserted first (with the `auto_register`
/// feature), then `f` adds the rest. Afterwards the tables are shared
/// read-only by every decoder that is not handed an explicit registry.
///
/// A second call fails with [`RegistryError::AlreadyInitialized`] and does
/// not run `f`.
pub fn init(
    f: impl FnOnce(&mut Registries) -> Result<(), RegistryError>,
) -> Result<&'static Registries, RegistryError> {
    if GLOBAL.get().is_some() {
        return Err(RegistryError::AlreadyInitialized);
    }

    let mut registries = Registries::default();
    registries.classes.auto_register()?;
    registries.enums.auto_register()?;
    f(&mut registries)?;

    let (classes, enums) = (registries.classes.len(), registries.enums.len());
    GLOBAL
        .set(registries)
        .map_err(|_| RegistryError::AlreadyInitialized)?;
    log::info!("marshal registries initialized: {classes} classes, {enums} enums");

    global().ok_or(RegistryError::AlreadyInitialized)
}

/// The global registries, if [`init`] has completed.
#[inline]
pub fn global() -> Option<&'static Registries> {
    GLOBAL.get()
}

/// The global class registry, or an empty one before [`init`].
#[inline]
pub fn classes() -> &'static ClassRegistry {
    match GLOBAL.get() {
        Some(registries) => &registries.classes,
        None => &EMPTY_CLASSES,
    }
}
