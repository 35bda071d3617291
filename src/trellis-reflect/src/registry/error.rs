//! Errors for configuring the type registry.

use thiserror::Error;

use crate::identifier::TypeIdentifier;

/// A configuration error raised while building or installing
/// a [`Registry`](super::Registry).
///
/// These indicate programming mistakes in the set of registered
/// types and are meant to be surfaced during start-up.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The type did not opt into reflection.
    #[error("type '{name}' is not reflected and cannot be registered")]
    Unreflected { name: &'static str },

    /// The type's name hashes to [`TypeIdentifier::INVALID`].
    #[error("type '{name}' uses the reserved invalid identifier")]
    ReservedIdentifier { name: &'static str },

    /// The declared base was not registered before the type.
    #[error("base {base} of type '{name}' is not registered")]
    MissingBase {
        name: &'static str,
        base: TypeIdentifier,
    },

    /// A different type is already registered under the identifier.
    #[error("type '{name}' conflicts with '{existing}' registered under {identifier}")]
    Conflict {
        name: &'static str,
        existing: &'static str,
        identifier: TypeIdentifier,
    },

    /// The type was registered twice while duplicates are rejected.
    #[error("type '{name}' is already registered")]
    Duplicate { name: &'static str },

    /// A global registry is already installed.
    #[error("the global type registry is already installed")]
    AlreadyInstalled,
}
