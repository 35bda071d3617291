//! Default construction of registered types.

use crate::{
    identifier::TypeIdentifier,
    object::Object,
    registry::{self, Registry},
    type_info::Reflected,
};

impl Registry {
    /// Creates a default-initialized `T`, see [`construct`].
    pub fn construct<T: Reflected>(&self) -> Option<Box<T>> {
        self.construct_by_id(TypeIdentifier::of::<T>())?
            .downcast()
            .ok()
    }

    /// Creates a default-initialized instance of the type registered
    /// under `identifier`, see [`construct_by_id`].
    pub fn construct_by_id(&self, identifier: TypeIdentifier) -> Option<Box<dyn Object>> {
        self.lookup(identifier).instantiate()
    }

    /// Creates a default-initialized instance of the type registered
    /// under `identifier` if that type is a `T`, see [`construct_as`].
    pub fn construct_as<T: Reflected>(
        &self,
        identifier: TypeIdentifier,
    ) -> Option<Box<dyn Object>> {
        let info = self.lookup(identifier);
        if !info.is_a(TypeIdentifier::of::<T>()) {
            return None;
        }

        info.instantiate()
    }
}

/// Creates a default-initialized `T` through the global [`Registry`].
///
/// Returns [`None`] when `T` is not registered or has no
/// construction function.
#[inline]
pub fn construct<T: Reflected>() -> Option<Box<T>> {
    registry::registry().construct()
}

/// Creates a default-initialized instance of the type registered
/// under `identifier` in the global [`Registry`].
///
/// Returns [`None`] when no such type is registered or it has no
/// construction function.
#[inline]
pub fn construct_by_id(identifier: TypeIdentifier) -> Option<Box<dyn Object>> {
    registry::registry().construct_by_id(identifier)
}

/// Creates a default-initialized instance of the type registered
/// under `identifier` in the global [`Registry`], provided it is
/// `T` or derived from `T`.
///
/// The result can be viewed as `T` through [`cast`](crate::cast()).
#[inline]
pub fn construct_as<T: Reflected>(identifier: TypeIdentifier) -> Option<Box<dyn Object>> {
    registry::registry().construct_as::<T>(identifier)
}
