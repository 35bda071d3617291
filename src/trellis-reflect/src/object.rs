use std::any::{Any, TypeId};

use crate::{
    dynamic::DynamicTypeInfo,
    identifier::TypeIdentifier,
    registry::{self, Registry},
    type_info::{Reflected, StaticTypeInfo},
};

/// A reflected Rust value in the emulated inheritance tree.
///
/// This is the per-instance handle every reflected type carries:
/// [`Object::static_type`] is overridden at each level, so a
/// `&dyn Object` always reports the most-derived type of the value
/// behind it, even when it was obtained through a base.
///
/// # Correctness
///
/// While not directly causing memory unsafety, the following
/// invariants must be met by implementations of this trait.
///
/// It is generally recommended to just leave the work to the
/// `#[derive(Reflect)]` macro unless there is a reason not to.
///
/// - [`Object::as_any`], [`Object::as_any_mut`], [`Object::as_object`]
///   and [`Object::as_object_mut`] should always return `self`.
///
/// - [`Object::base`] and [`Object::base_mut`] should return the
///   embedded base value declared through [`Reflected::Base`].
pub trait Object: Any + Send + Sync + 'static {
    /// Gets the value as an [`Any`] reference.
    fn as_any(&self) -> &dyn Any;

    /// Gets the value as a mutable [`Any`] reference.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Gets the value as an [`Object`] reference.
    fn as_object(&self) -> &dyn Object;

    /// Gets the value as a mutable [`Object`] reference.
    fn as_object_mut(&mut self) -> &mut dyn Object;

    /// Gets the [`StaticTypeInfo`] of the most-derived type.
    fn static_type(&self) -> &'static StaticTypeInfo;

    /// Gets the embedded base object, if this is not a root type.
    fn base(&self) -> Option<&dyn Object>;

    /// Gets the embedded base object mutably, if this is not a
    /// root type.
    fn base_mut(&mut self) -> Option<&mut dyn Object>;
}

impl dyn Object {
    /// Gets the identifier of the most-derived type.
    #[inline]
    pub fn identifier(&self) -> TypeIdentifier {
        self.static_type().identifier()
    }

    /// Gets the declared name of the most-derived type.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.static_type().name()
    }

    /// Gets the registry entry of the most-derived type from the
    /// global [`Registry`].
    pub fn type_info(&self) -> DynamicTypeInfo<'static> {
        self.type_info_in(registry::registry())
    }

    /// Gets the registry entry of the most-derived type from the
    /// given [`Registry`].
    pub fn type_info_in<'r>(&self, registry: &'r Registry) -> DynamicTypeInfo<'r> {
        registry.lookup(self.identifier())
    }

    /// Checks if this value is an instance of `T`.
    ///
    /// This is an exact check; bases of `T` do not match.
    #[inline]
    pub fn is<T: Object>(&self) -> bool {
        self.as_any().type_id() == TypeId::of::<T>()
    }

    // In debug builds we can enforce the trait's
    // implementation invariants to a certain degree
    // at runtime. This helps with spotting bugs.
    #[cfg(debug_assertions)]
    fn debug_check_invariants(&self) {
        let type_id = self.as_any().type_id();

        assert_eq!(
            type_id,
            self.as_object().as_any().type_id(),
            "TypeId mismatch between self and Any; make Object::as_object(_mut) return self"
        );
        assert_eq!(
            type_id,
            self.static_type().type_id(),
            "TypeId mismatch between self and its type info; make Object::static_type return Self::TYPE_INFO"
        );
    }

    /// Downcasts the value into the concrete type if it is a `T`
    /// underneath.
    ///
    /// Unlike [`cast`](crate::cast()), this does not consider the
    /// inheritance tree.
    #[inline]
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        #[cfg(debug_assertions)]
        self.debug_check_invariants();

        self.as_any().downcast_ref()
    }

    /// Downcasts the value into the concrete type if it is a `T`
    /// underneath.
    #[inline]
    pub fn downcast_mut<T: Object>(&mut self) -> Option<&mut T> {
        #[cfg(debug_assertions)]
        self.debug_check_invariants();

        self.as_any_mut().downcast_mut()
    }

    /// Consumes `self` and casts it into a concrete `T`, if it is
    /// one underneath.
    ///
    /// When that is not the case, `self` will be returned as-is in
    /// the error variant to re-gain ownership.
    pub fn downcast<T: Object>(self: Box<Self>) -> Result<Box<T>, Box<dyn Object>> {
        match self.is::<T>() {
            true => unsafe {
                // SAFETY: The TypeId of the boxed value matches the
                // ID of type T. Thus, we can cast the pointer.
                // Since it is `Sized`, it doesn't require metadata.
                let ptr = Box::into_raw(self);
                Ok(Box::from_raw(ptr.cast::<T>()))
            },
            false => Err(self),
        }
    }

    /// Recursively tries to find the base object of type `T` in the
    /// emulated inheritance tree.
    ///
    /// A value is considered its own base here.
    pub fn base_as<T: Reflected>(&self) -> Option<&T> {
        let mut current = self;
        loop {
            if let Some(value) = current.as_any().downcast_ref() {
                return Some(value);
            }
            current = current.base()?;
        }
    }

    /// Recursively tries to find the base object of type `T` in the
    /// emulated inheritance tree.
    pub fn base_as_mut<T: Reflected>(&mut self) -> Option<&mut T> {
        if self.is::<T>() {
            self.as_any_mut().downcast_mut()
        } else {
            self.base_mut()?.base_as_mut()
        }
    }

    /// Borrows the value of the field `name`.
    ///
    /// Fields declared on the most-derived type take precedence,
    /// then the base chain is searched.
    pub fn field(&self, name: &str) -> Option<&dyn Any> {
        match self.static_type().find_field(name) {
            Some(field) => field.value(self),
            None => self.base()?.field(name),
        }
    }

    /// Mutably borrows the value of the field `name`.
    ///
    /// Fields declared on the most-derived type take precedence,
    /// then the base chain is searched.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut dyn Any> {
        match self.static_type().find_field(name) {
            Some(field) => field.value_mut(self),
            None => self.base_mut()?.field_mut(name),
        }
    }

    /// Borrows the value of the field `name` as a `V`.
    pub fn field_as<V: Any>(&self, name: &str) -> Option<&V> {
        self.field(name).and_then(<dyn Any>::downcast_ref)
    }

    /// Mutably borrows the value of the field `name` as a `V`.
    pub fn field_as_mut<V: Any>(&mut self, name: &str) -> Option<&mut V> {
        self.field_mut(name).and_then(<dyn Any>::downcast_mut)
    }
}

/// Gets the declared name of the most-derived type of `value`.
#[inline]
pub fn name_of(value: &dyn Object) -> &'static str {
    value.name()
}

/// Gets the registry entry of the most-derived type of `value`.
#[inline]
pub fn dynamic_type_of(value: &dyn Object) -> DynamicTypeInfo<'static> {
    value.type_info()
}
