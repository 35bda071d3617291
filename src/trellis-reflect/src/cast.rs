//! Casts across the emulated inheritance tree.
//!
//! A cast to a type `T` succeeds when `T` is the most-derived type of
//! the value or one of its registered ancestors. The result is a view
//! which dereferences to the embedded `T` while still remembering the
//! complete value, so it can be cast back down later on.

use std::{
    fmt,
    marker::PhantomData,
    ops::{Deref, DerefMut},
};

use crate::{
    identifier::TypeIdentifier,
    object::Object,
    registry::{self, Registry},
    type_info::{Reflected, StaticTypeInfo},
};

/// A shared view of a reflected value as its base `T`.
///
/// Produced by [`cast`] or [`Registry::cast`].
pub struct ObjectRef<'a, T: Reflected> {
    registry: &'a Registry,
    object: &'a dyn Object,
    value: &'a T,
}

impl<'a, T: Reflected> ObjectRef<'a, T> {
    /// Gets the complete value this view was cast from.
    #[inline]
    pub fn object(&self) -> &'a dyn Object {
        self.object
    }

    /// Gets the `T` with the lifetime of the complete value.
    #[inline]
    pub fn get(&self) -> &'a T {
        self.value
    }

    /// Gets the [`StaticTypeInfo`] of the most-derived type, which
    /// is not necessarily `T`.
    #[inline]
    pub fn type_info(&self) -> &'static StaticTypeInfo {
        self.object.static_type()
    }

    /// Gets the identifier of the most-derived type.
    #[inline]
    pub fn identifier(&self) -> TypeIdentifier {
        self.object.identifier()
    }

    /// Casts the complete value to `U` through the [`Registry`]
    /// which produced this view.
    ///
    /// This may cast down again, but only as far as the most-derived
    /// type of the value.
    pub fn cast<U: Reflected>(&self) -> Option<ObjectRef<'a, U>> {
        self.registry.cast(self.object)
    }
}

impl<T: Reflected> Clone for ObjectRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Reflected> Copy for ObjectRef<'_, T> {}

impl<T: Reflected> Deref for ObjectRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.value
    }
}

impl<T: Reflected + fmt::Debug> fmt::Debug for ObjectRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("type", &self.object.name())
            .field("value", self.value)
            .finish()
    }
}

impl<T: Reflected> From<ObjectRef<'_, T>> for TypeIdentifier {
    fn from(value: ObjectRef<'_, T>) -> Self {
        value.identifier()
    }
}

/// A mutable view of a reflected value as its base `T`.
///
/// Produced by [`cast_mut`] or [`Registry::cast_mut`].
pub struct ObjectMut<'a, T: Reflected> {
    registry: &'a Registry,
    object: &'a mut dyn Object,
    _value: PhantomData<&'a mut T>,
}

impl<'a, T: Reflected> ObjectMut<'a, T> {
    /// Gets the complete value this view was cast from.
    #[inline]
    pub fn object(&self) -> &dyn Object {
        &*self.object
    }

    /// Gets the complete value this view was cast from mutably.
    #[inline]
    pub fn object_mut(&mut self) -> &mut dyn Object {
        &mut *self.object
    }

    /// Gives up the view and returns the complete value.
    #[inline]
    pub fn into_object(self) -> &'a mut dyn Object {
        self.object
    }

    /// Gets the [`StaticTypeInfo`] of the most-derived type, which
    /// is not necessarily `T`.
    #[inline]
    pub fn type_info(&self) -> &'static StaticTypeInfo {
        self.object.static_type()
    }

    /// Gets the identifier of the most-derived type.
    #[inline]
    pub fn identifier(&self) -> TypeIdentifier {
        self.object.identifier()
    }

    /// Reborrows this view as an [`ObjectRef`].
    pub fn as_ref(&self) -> ObjectRef<'_, T> {
        ObjectRef {
            registry: self.registry,
            object: &*self.object,
            value: &**self,
        }
    }

    /// Casts the complete value to `U` through the [`Registry`]
    /// which produced this view, reborrowing it.
    pub fn cast<U: Reflected>(&mut self) -> Option<ObjectMut<'_, U>> {
        self.registry.cast_mut(&mut *self.object)
    }
}

impl<T: Reflected> Deref for ObjectMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self.object.base_as() {
            Some(value) => value,
            None => unreachable!("cast view lost its `{}` base", T::TYPE_INFO.name()),
        }
    }
}

impl<T: Reflected> DerefMut for ObjectMut<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match self.object.base_as_mut() {
            Some(value) => value,
            None => unreachable!("cast view lost its `{}` base", T::TYPE_INFO.name()),
        }
    }
}

impl<T: Reflected + fmt::Debug> fmt::Debug for ObjectMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectMut")
            .field("type", &self.object.name())
            .field("value", &**self)
            .finish()
    }
}

impl Registry {
    /// Checks whether `object` can be cast to `T`.
    ///
    /// That is the case when `T` is the most-derived type of
    /// `object` or one of its registered ancestors.
    pub fn can_cast<T: Reflected>(&self, object: &dyn Object) -> bool {
        let target = TypeIdentifier::of::<T>();
        let actual = object.identifier();

        actual == target || self.lookup(actual).is_derived_from(target)
    }

    /// Casts `object` to `T`, see [`cast`].
    ///
    /// Further casts on the returned view go through this registry
    /// as well.
    pub fn cast<'a, T: Reflected>(&'a self, object: &'a dyn Object) -> Option<ObjectRef<'a, T>> {
        if !self.can_cast::<T>(object) {
            return None;
        }

        let value = object.base_as::<T>()?;
        Some(ObjectRef {
            registry: self,
            object,
            value,
        })
    }

    /// Casts `object` to `T` mutably, see [`cast_mut`].
    pub fn cast_mut<'a, T: Reflected>(
        &'a self,
        object: &'a mut dyn Object,
    ) -> Option<ObjectMut<'a, T>> {
        if !self.can_cast::<T>(object) || object.base_as::<T>().is_none() {
            return None;
        }

        Some(ObjectMut {
            registry: self,
            object,
            _value: PhantomData,
        })
    }
}

/// Casts `object` to `T` through the global [`Registry`].
///
/// Succeeds when `T` is the most-derived type of `object` or one of
/// its ancestors. Casting to a type derived from the most-derived
/// type, or to a sibling, yields [`None`].
///
/// # Example
///
/// ```
/// # use trellis_reflect::{cast, initialize, Reflect};
/// #[derive(Default, Reflect)]
/// struct Shape {
///     #[field]
///     sides: u32,
/// }
///
/// #[derive(Default, Reflect)]
/// struct Square {
///     #[field(base)]
///     base: Shape,
///     #[field]
///     length: f32,
/// }
///
/// initialize(|builder| builder.register::<Square>().map(drop)).unwrap();
///
/// let square = Square::default();
/// let shape = cast::<Shape>(&square).unwrap();
/// assert_eq!(shape.sides, 0);
/// assert_eq!(shape.type_info().name(), "Square");
/// assert!(shape.cast::<Square>().is_some());
/// ```
#[inline]
pub fn cast<T: Reflected>(object: &dyn Object) -> Option<ObjectRef<'_, T>> {
    registry::registry().cast(object)
}

/// Casts `object` to `T` mutably through the global [`Registry`].
#[inline]
pub fn cast_mut<T: Reflected>(object: &mut dyn Object) -> Option<ObjectMut<'_, T>> {
    registry::registry().cast_mut(object)
}

/// Takes ownership of `object` as its most-derived type `T`.
///
/// Ownership cannot be split off a base, so this is exact; on
/// mismatch `object` is handed back.
#[inline]
pub fn cast_box<T: Reflected>(object: Box<dyn Object>) -> Result<Box<T>, Box<dyn Object>> {
    object.downcast()
}
