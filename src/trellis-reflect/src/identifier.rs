//! Stable numeric identifiers for reflected types.

use std::fmt;

use trellis_utils::hash::fnv1a;

use crate::{object::Object, type_info::Reflected};

/// A numeric identifier derived from the declared name of a
/// reflected type.
///
/// Identifiers are computed with [`fnv1a`] and are therefore
/// deterministic across runs and builds. Two types with the
/// same declared name share an identifier, which the registry
/// rejects as a configuration error.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct TypeIdentifier(u64);

impl TypeIdentifier {
    /// The reserved identifier that denotes "no type".
    pub const INVALID: Self = Self(0);

    /// Computes the identifier for a declared type name.
    #[inline]
    pub const fn from_name(name: &str) -> Self {
        Self(fnv1a(name))
    }

    /// Wraps a raw identifier value.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Gets the identifier of the reflected type `T`.
    #[inline]
    pub const fn of<T: Reflected>() -> Self {
        T::TYPE_INFO.identifier()
    }

    /// Gets the raw integer value of the identifier.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Indicates whether this is the reserved
    /// [`TypeIdentifier::INVALID`] value.
    #[inline]
    pub const fn is_invalid(self) -> bool {
        self.0 == Self::INVALID.0
    }
}

impl fmt::Debug for TypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeIdentifier({:#018x})", self.0)
    }
}

impl fmt::Display for TypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

// Instances convert into the identifier of their most-derived type.
impl<T: Object + ?Sized> From<&T> for TypeIdentifier {
    #[inline]
    fn from(value: &T) -> Self {
        value.static_type().identifier()
    }
}

/// Computes the identifier for a declared type name.
///
/// Shorthand for [`TypeIdentifier::from_name`].
#[inline]
pub const fn hash(name: &str) -> TypeIdentifier {
    TypeIdentifier::from_name(name)
}

/// Gets the identifier of the reflected type `T`.
#[inline]
pub const fn identifier_of<T: Reflected>() -> TypeIdentifier {
    TypeIdentifier::of::<T>()
}
