use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use pm_utils::IdMap;

use crate::error::RegistryError;
use crate::poly::{Class, Polymorphic};
use crate::registry::ClassId;

// -----------------------------------------------------------------------------
// ClassMeta

/// Everything the decoder needs to know about one concrete class.
#[derive(Clone, Copy)]
pub struct ClassMeta {
    id: ClassId,
    type_name: &'static str,
    type_id: TypeId,
    factory: fn() -> Box<dyn Polymorphic>,
}

impl ClassMeta {
    /// Describes a statically known class.
    #[inline]
    pub fn of<T: Class>() -> Self {
        Self {
            id: T::CLASS_ID,
            type_name: core::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
            factory: T::factory,
        }
    }

    /// Describes the class produced by `factory`, bound to `id`.
    ///
    /// The factory is called once to learn the concrete type.
    pub fn new(id: ClassId, factory: fn() -> Box<dyn Polymorphic>) -> Result<Self, RegistryError> {
        if id.is_none() {
            return Err(RegistryError::ReservedClassId(id));
        }

        let sample = factory();
        let actual = sample.class_id();
        let type_name = sample.type_name();
        if actual != id {
            return Err(RegistryError::ClassIdMismatch {
                expected: id,
                actual,
                type_name,
            });
        }

        Ok(Self {
            id,
            type_name,
            type_id: Any::type_id(sample.as_any()),
            factory,
        })
    }

    #[inline]
    pub fn id(&self) -> ClassId {
        self.id
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Builds the zero value of the class.
    #[inline]
    pub fn create(&self) -> Box<dyn Polymorphic> {
        (self.factory)()
    }
}

impl fmt::Debug for ClassMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassMeta")
            .field("id", &self.id)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// ClassRegistry

/// A table of concrete classes, keyed by [`ClassId`].
///
/// The decoder consults it when the static type of a slot is abstract:
/// it reads the id, looks up the [`ClassMeta`] and fills the value produced
/// by its factory.
///
/// # Examples
///
/// ```
/// use pm_marshal::{Class, ClassId, ClassRegistry, Marshal, MarshalError, ReadContext, WriteContext};
///
/// #[derive(Default, Clone, PartialEq, Debug)]
/// struct Door;
///
/// impl Marshal for Door {
///     fn write_fields(&self, _: &mut WriteContext<'_>) -> Result<(), MarshalError> { Ok(()) }
///     fn read_fields(&mut self, _: &mut ReadContext<'_>) -> Result<(), MarshalError> { Ok(()) }
/// }
///
/// impl Class for Door {
///     const CLASS_ID: ClassId = ClassId::new(3);
/// }
///
/// let mut registry = ClassRegistry::new();
/// assert_eq!(registry.register::<Door>(), Ok(true));
/// assert_eq!(registry.register::<Door>(), Ok(false));
///
/// let door = registry.create(ClassId::new(3)).unwrap();
/// assert!(door.is::<Door>());
/// ```
pub struct ClassRegistry {
    classes: IdMap<ClassMeta>,
}

impl Default for ClassRegistry {
    /// See [`ClassRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRegistry {
    /// Creates an empty registry.
    #[inline]
    pub const fn new() -> Self {
        Self {
            classes: IdMap::new(),
        }
    }

    /// Registers a statically known class.
    ///
    /// - Returns `Ok(true)` if the class was inserted.
    /// - Returns `Ok(false)` if the same class is already registered.
    /// - Fails if the id is reserved or bound to another type.
    pub fn register<T: Class>(&mut self) -> Result<bool, RegistryError> {
        if T::CLASS_ID.is_none() {
            return Err(RegistryError::ReservedClassId(T::CLASS_ID));
        }
        self.insert(ClassMeta::of::<T>())
    }

    /// Registers a factory under `id`.
    ///
    /// Same outcomes as [`register`](Self::register); in addition the
    /// product of `factory` must report `id` as its class id.
    ///
    /// Factories are told apart by the type they build, not by function
    /// address: a second factory producing the same type under the same id
    /// is accepted as a no-op returning `Ok(false)`, and the first one stays
    /// in place.
    pub fn register_factory(
        &mut self,
        id: ClassId,
        factory: fn() -> Box<dyn Polymorphic>,
    ) -> Result<bool, RegistryError> {
        let meta = ClassMeta::new(id, factory)?;
        self.insert(meta)
    }

    fn insert(&mut self, meta: ClassMeta) -> Result<bool, RegistryError> {
        let (id, type_id, type_name) = (meta.id, meta.type_id, meta.type_name);
        match self.classes.try_insert(id.get(), meta) {
            Ok(_) => {
                log::debug!("register class `{type_name}` as {id}");
                Ok(true)
            }
            Err(existing) if existing.type_id == type_id => Ok(false),
            Err(existing) => {
                log::error!(
                    "class id {id} is claimed by both `{}` and `{type_name}`",
                    existing.type_name,
                );
                Err(RegistryError::ConflictingClass {
                    id,
                    existing: existing.type_name,
                    incoming: type_name,
                })
            }
        }
    }

    /// Automatically registers every class submitted with
    /// [`auto_register_class!`](crate::auto_register_class).
    ///
    /// Repeated calls are cheap and will not insert duplicates.
    ///
    /// ## Return Value
    ///
    /// Returns `Ok(true)` if automatic registration is supported on the current
    /// platform, `Ok(false)` otherwise, and an error if two submitted types
    /// share an id.
    ///
    /// ## Feature Dependency
    ///
    /// This method requires the `auto_register` feature. When disabled, it
    /// does nothing and returns `Ok(false)`.
    #[inline]
    pub fn auto_register(&mut self) -> Result<bool, RegistryError> {
        crate::__macro_exports::auto_register::register_classes(self)
    }

    #[inline]
    pub fn lookup(&self, id: ClassId) -> Option<&ClassMeta> {
        self.classes.get(id.get())
    }

    /// Builds the zero value of the class bound to `id`.
    #[inline]
    pub fn create(&self, id: ClassId) -> Option<Box<dyn Polymorphic>> {
        self.lookup(id).map(ClassMeta::create)
    }

    #[inline]
    pub fn contains(&self, id: ClassId) -> bool {
        self.classes.contains(id.get())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterates the registered classes in arbitrary order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &ClassMeta> {
        self.classes.values()
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
