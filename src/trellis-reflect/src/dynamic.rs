//! Run-time handles onto registered types.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use crate::{
    identifier::TypeIdentifier,
    object::Object,
    registry::{self, Entry, Registry, INVALID_INDEX, NULL_TYPE_INDEX},
    type_info::{Reflected, StaticTypeInfo},
};

/// A handle onto an entry of a [`Registry`].
///
/// Handles are cheap to copy and compare by [`TypeIdentifier`].
/// Failed lookups produce a handle onto the distinguished
/// unregistered entry rather than an error; check for it with
/// [`DynamicTypeInfo::is_registered`].
///
/// Every method accepting a type takes anything convertible to a
/// [`TypeIdentifier`]: raw identifiers, other handles or references
/// to reflected instances.
#[derive(Clone, Copy)]
pub struct DynamicTypeInfo<'r> {
    registry: &'r Registry,
    index: usize,
}

impl<'r> DynamicTypeInfo<'r> {
    pub(crate) fn new(registry: &'r Registry, index: usize) -> Self {
        Self { registry, index }
    }

    #[inline]
    fn entry(&self) -> &'r Entry {
        &self.registry.entries[self.index]
    }

    #[inline]
    fn at(&self, index: usize) -> Self {
        Self::new(self.registry, index)
    }

    /// Gets the [`Registry`] this handle points into.
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Indicates whether this is a registered type rather than the
    /// unregistered entry.
    #[inline]
    pub fn is_registered(&self) -> bool {
        self.index != INVALID_INDEX
    }

    /// Indicates whether this is the [`NullType`](crate::NullType).
    #[inline]
    pub fn is_null_type(&self) -> bool {
        self.index == NULL_TYPE_INDEX
    }

    /// Gets the declared name of the type.
    ///
    /// The unregistered entry reports `<UnregisteredType>`.
    pub fn name(&self) -> &'static str {
        self.entry().name
    }

    /// Gets the identifier of the type.
    ///
    /// The unregistered entry reports [`TypeIdentifier::INVALID`].
    pub fn identifier(&self) -> TypeIdentifier {
        self.entry().identifier
    }

    /// Gets the compile-time description the type was registered
    /// from, if any.
    ///
    /// Types registered from raw parts have none.
    pub fn static_info(&self) -> Option<&'static StaticTypeInfo> {
        self.entry().info
    }

    /// Indicates whether the type inherits from a type other than
    /// the [`NullType`](crate::NullType).
    pub fn has_base_type(&self) -> bool {
        self.parent().is_some()
    }

    /// Gets the immediate base type.
    ///
    /// Root types, the [`NullType`](crate::NullType) and the
    /// unregistered entry report the unregistered entry here.
    pub fn base_type(&self) -> DynamicTypeInfo<'r> {
        self.parent().unwrap_or_else(|| self.at(INVALID_INDEX))
    }

    fn parent(&self) -> Option<Self> {
        self.entry()
            .base
            .filter(|&base| base != NULL_TYPE_INDEX)
            .map(|base| self.at(base))
    }

    /// Returns an [`Iterator`] over the types directly derived from
    /// this one, in registration order.
    ///
    /// The [`NullType`](crate::NullType) lists all root types.
    pub fn derived_types(&self) -> impl Iterator<Item = DynamicTypeInfo<'r>> + 'r {
        let this = *self;
        self.entry().derived.iter().map(move |&index| this.at(index))
    }

    /// Returns an [`Iterator`] over the ancestors of this type,
    /// starting with the immediate base.
    ///
    /// The [`NullType`](crate::NullType) is never yielded.
    pub fn ancestors(&self) -> impl Iterator<Item = DynamicTypeInfo<'r>> + 'r {
        std::iter::successors(self.parent(), Self::parent)
    }

    /// Returns a depth-first [`Iterator`] over all types transitively
    /// derived from this one.
    pub fn descendants(&self) -> Descendants<'r> {
        let mut stack = self.entry().derived.clone();
        stack.reverse();

        Descendants {
            registry: self.registry,
            stack,
        }
    }

    /// Checks if `other` names this very type.
    pub fn is_type(&self, other: impl Into<TypeIdentifier>) -> bool {
        self.is_registered() && self.identifier() == other.into()
    }

    /// Checks if `other` names a type in the chain of ancestors.
    ///
    /// A type is never derived from itself. The
    /// [`NullType`](crate::NullType) takes no part in this relation.
    pub fn is_derived_from(&self, other: impl Into<TypeIdentifier>) -> bool {
        let other = other.into();
        self.ancestors().any(|ancestor| ancestor.identifier() == other)
    }

    /// Checks if `other` names a type transitively derived from this
    /// one.
    ///
    /// A type is never a base of itself. The
    /// [`NullType`](crate::NullType) takes no part in this relation.
    pub fn is_base_of(&self, other: impl Into<TypeIdentifier>) -> bool {
        self.is_registered()
            && !self.is_null_type()
            && self
                .registry
                .lookup(other.into())
                .is_derived_from(self.identifier())
    }

    /// Checks if this type is `other` or derived from it.
    pub fn is_a(&self, other: impl Into<TypeIdentifier>) -> bool {
        let other = other.into();
        self.is_type(other) || self.is_derived_from(other)
    }

    /// Checks if this type is the most-derived type of `value` or
    /// one of its ancestors.
    pub fn is_a_instance(&self, value: &dyn Object) -> bool {
        self.registry.lookup(value.identifier()).is_a(*self)
    }

    /// Indicates whether the type has a construction function.
    pub fn is_constructible(&self) -> bool {
        self.entry().construct.is_some()
    }

    /// Creates a default-initialized instance of the type.
    ///
    /// Returns [`None`] for types without a construction function
    /// and for the unregistered entry.
    pub fn instantiate(&self) -> Option<Box<dyn Object>> {
        self.entry().construct.map(|construct| construct())
    }
}

impl PartialEq for DynamicTypeInfo<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.identifier() == other.identifier()
    }
}

impl Eq for DynamicTypeInfo<'_> {}

impl PartialOrd for DynamicTypeInfo<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DynamicTypeInfo<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identifier().cmp(&other.identifier())
    }
}

impl Hash for DynamicTypeInfo<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier().hash(state);
    }
}

impl fmt::Debug for DynamicTypeInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicTypeInfo")
            .field("name", &self.name())
            .field("identifier", &self.identifier())
            .field("registered", &self.is_registered())
            .finish()
    }
}

impl From<DynamicTypeInfo<'_>> for TypeIdentifier {
    #[inline]
    fn from(value: DynamicTypeInfo<'_>) -> Self {
        value.identifier()
    }
}

/// A depth-first [`Iterator`] over the descendants of a type.
///
/// Created by [`DynamicTypeInfo::descendants`].
#[derive(Clone, Debug)]
pub struct Descendants<'r> {
    registry: &'r Registry,
    stack: Vec<usize>,
}

impl<'r> Iterator for Descendants<'r> {
    type Item = DynamicTypeInfo<'r>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let derived = &self.registry.entries[index].derived;
        self.stack.extend(derived.iter().rev());

        Some(DynamicTypeInfo::new(self.registry, index))
    }
}

/// Gets the entry of `T` in the global [`Registry`].
#[inline]
pub fn dynamic_type<T: Reflected>() -> DynamicTypeInfo<'static> {
    registry::registry().lookup(TypeIdentifier::of::<T>())
}

/// Gets the entry for `identifier` in the global [`Registry`].
#[inline]
pub fn dynamic_type_by_id(identifier: TypeIdentifier) -> DynamicTypeInfo<'static> {
    registry::registry().lookup(identifier)
}

/// Indicates whether a type with `identifier` is registered in the
/// global [`Registry`].
#[inline]
pub fn is_registered(identifier: TypeIdentifier) -> bool {
    registry::registry().is_registered(identifier)
}
