use alloc::boxed::Box;
use core::any::Any;
use core::fmt::Debug;

use crate::codec::Marshal;
use crate::registry::ClassId;

// -----------------------------------------------------------------------------
// Class

/// A concrete type that can be decoded from an abstract slot.
///
/// `CLASS_ID` must be unique among the types registered together.
/// The [`Default`] value is what the registered factory produces before the
/// fields are read into it.
///
/// # Examples
///
/// ```
/// use pm_marshal::{Class, ClassId, Marshal, MarshalError, Polymorphic, ReadContext, WriteContext};
///
/// #[derive(Default, Clone, PartialEq, Debug)]
/// struct Tower {
///     height: u32,
/// }
///
/// impl Marshal for Tower {
///     fn write_fields(&self, ctx: &mut WriteContext<'_>) -> Result<(), MarshalError> {
///         ctx.scalar("height", &self.height)
///     }
///
///     fn read_fields(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), MarshalError> {
///         ctx.scalar("height", &mut self.height)
///     }
/// }
///
/// impl Class for Tower {
///     const CLASS_ID: ClassId = ClassId::new(42);
/// }
///
/// let value: Box<dyn Polymorphic> = Box::new(Tower { height: 3 });
/// assert_eq!(value.class_id(), Tower::CLASS_ID);
/// assert_eq!(value.downcast_ref::<Tower>().unwrap().height, 3);
/// ```
pub trait Class: Marshal + Default + Clone + PartialEq + Debug + Send + Sync + 'static {
    /// The stable identifier of this type.
    const CLASS_ID: ClassId;

    /// Produces the zero value, boxed as a [`Polymorphic`].
    #[inline]
    fn factory() -> Box<dyn Polymorphic> {
        Box::<Self>::default()
    }
}

// -----------------------------------------------------------------------------
// Polymorphic

/// The object-safe face of a [`Class`].
///
/// Implemented for every `Class`; there is no reason to implement it by hand.
pub trait Polymorphic: Marshal + Any + Debug + Send + Sync {
    /// The class id written in front of this value.
    fn class_id(&self) -> ClassId;

    /// The concrete type name, for diagnostics.
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn clone_boxed(&self) -> Box<dyn Polymorphic>;

    /// Field equality with another value of the same concrete type.
    fn eq_dyn(&self, other: &dyn Polymorphic) -> bool;
}

impl<T: Class> Polymorphic for T {
    #[inline]
    fn class_id(&self) -> ClassId {
        T::CLASS_ID
    }

    #[inline]
    fn type_name(&self) -> &'static str {
        core::any::type_name::<T>()
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    #[inline]
    fn clone_boxed(&self) -> Box<dyn Polymorphic> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn Polymorphic) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

impl dyn Polymorphic {
    /// Whether the concrete type is `T`.
    #[inline]
    pub fn is<T: Polymorphic>(&self) -> bool {
        self.as_any().is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Polymorphic>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    #[inline]
    pub fn downcast_mut<T: Polymorphic>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Recovers the concrete value, or gives the box back.
    pub fn downcast<T: Polymorphic>(self: Box<Self>) -> Result<Box<T>, Box<dyn Polymorphic>> {
        if !self.is::<T>() {
            return Err(self);
        }
        match self.into_any().downcast::<T>() {
            Ok(value) => Ok(value),
            Err(_) => unreachable!("concrete type checked by `is`"),
        }
    }
}

impl PartialEq for dyn Polymorphic {
    fn eq(&self, other: &Self) -> bool {
        self.class_id() == other.class_id() && self.eq_dyn(other)
    }
}

impl Clone for Box<dyn Polymorphic> {
    #[inline]
    fn clone(&self) -> Self {
        (**self).clone_boxed()
    }
}
