//! The process-wide table of registered types.
//!
//! Registration happens once, during start-up, through a
//! [`RegistryBuilder`]. The resulting [`Registry`] is immutable and
//! can be installed globally with [`Registry::install`] or
//! [`initialize`], after which every query is a plain read.

use std::sync::Once;

use once_cell::sync::{Lazy, OnceCell};
use trellis_utils::{
    ahash::AHashMap,
    tracing::{debug, error, trace, warn},
};

use crate::{
    builtins::BUILTINS,
    dynamic::DynamicTypeInfo,
    identifier::TypeIdentifier,
    type_info::{ConstructFn, Reflected, StaticTypeInfo},
};

mod error;
pub use self::error::*;

/// Index of the distinguished unregistered entry.
pub(crate) const INVALID_INDEX: usize = 0;

/// Index of the [`NullType`](crate::NullType) entry.
pub(crate) const NULL_TYPE_INDEX: usize = 1;

static GLOBAL: OnceCell<Registry> = OnceCell::new();
static FALLBACK: Lazy<Registry> = Lazy::new(|| RegistryBuilder::new().build());

/// A registered type in the [`Registry`].
#[derive(Clone, Debug)]
pub(crate) struct Entry {
    pub(crate) name: &'static str,
    pub(crate) identifier: TypeIdentifier,
    pub(crate) base: Option<usize>,
    pub(crate) derived: Vec<usize>,
    pub(crate) construct: Option<ConstructFn>,
    pub(crate) info: Option<&'static StaticTypeInfo>,
}

impl Entry {
    const fn unregistered() -> Self {
        Self {
            name: "<UnregisteredType>",
            identifier: TypeIdentifier::INVALID,
            base: None,
            derived: Vec::new(),
            construct: None,
            info: None,
        }
    }

    fn matches(
        &self,
        name: &str,
        base: usize,
        construct: Option<ConstructFn>,
        info: Option<&'static StaticTypeInfo>,
    ) -> bool {
        let same_type = match (self.info, info) {
            (Some(lhs), Some(rhs)) => lhs.type_id() == rhs.type_id(),
            (None, None) => true,
            _ => false,
        };

        self.name == name
            && self.base == Some(base)
            && self.construct.is_some() == construct.is_some()
            && same_type
    }
}

/// The table mapping [`TypeIdentifier`]s to registered types and
/// their inheritance relationships.
///
/// Entries are never removed. Slot zero holds the distinguished
/// unregistered entry that failed lookups resolve to.
#[derive(Debug)]
pub struct Registry {
    pub(crate) entries: Vec<Entry>,
    index: AHashMap<TypeIdentifier, usize>,
}

impl Registry {
    fn empty() -> Self {
        Self {
            entries: vec![Entry::unregistered()],
            index: AHashMap::new(),
        }
    }

    /// Gets the entry for `identifier`.
    ///
    /// Returns the unregistered entry when no such type was
    /// registered; this is an expected outcome, not an error.
    pub fn lookup(&self, identifier: TypeIdentifier) -> DynamicTypeInfo<'_> {
        let index = self
            .index
            .get(&identifier)
            .copied()
            .unwrap_or(INVALID_INDEX);
        DynamicTypeInfo::new(self, index)
    }

    /// Gets the entry for the type declared under `name`.
    pub fn lookup_name(&self, name: &str) -> DynamicTypeInfo<'_> {
        self.lookup(TypeIdentifier::from_name(name))
    }

    /// Gets the entry for the reflected type `T`.
    pub fn lookup_type<T: Reflected>(&self) -> DynamicTypeInfo<'_> {
        self.lookup(TypeIdentifier::of::<T>())
    }

    /// Indicates whether a type with `identifier` is registered.
    pub fn is_registered(&self, identifier: TypeIdentifier) -> bool {
        self.index.contains_key(&identifier)
    }

    /// Gets the entry of the [`NullType`](crate::NullType).
    pub fn null_type(&self) -> DynamicTypeInfo<'_> {
        DynamicTypeInfo::new(self, NULL_TYPE_INDEX)
    }

    /// Gets the distinguished unregistered entry.
    pub fn invalid(&self) -> DynamicTypeInfo<'_> {
        DynamicTypeInfo::new(self, INVALID_INDEX)
    }

    /// Gets the number of registered types, including built-ins.
    pub fn len(&self) -> usize {
        self.entries.len() - 1
    }

    /// Indicates whether no types are registered.
    ///
    /// Never true for built registries, which always hold the
    /// built-in types.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an [`Iterator`] over all registered types in
    /// registration order.
    pub fn iter(&self) -> impl Iterator<Item = DynamicTypeInfo<'_>> {
        (NULL_TYPE_INDEX..self.entries.len()).map(move |index| DynamicTypeInfo::new(self, index))
    }

    /// Installs `self` as the global registry.
    ///
    /// This may only happen once per process. Subsequent attempts
    /// fail with [`RegistryError::AlreadyInstalled`].
    pub fn install(self) -> Result<&'static Registry, RegistryError> {
        GLOBAL.try_insert(self).map_err(|_| {
            error!("attempted to install the global type registry twice");
            RegistryError::AlreadyInstalled
        })
    }
}

/// Whether registering an identifier twice with identical data is
/// tolerated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Identical re-registration is a silent no-op.
    #[default]
    Ignore,
    /// Identical re-registration fails with
    /// [`RegistryError::Duplicate`].
    ///
    /// Bases registered implicitly on behalf of a derived type are
    /// still skipped silently when already present.
    Reject,
}

/// Collects types during start-up and produces a [`Registry`].
///
/// The built-in types are registered on creation. Every type must
/// be registered after its base, which [`RegistryBuilder::register`]
/// takes care of by walking the base chain first.
#[derive(Debug)]
pub struct RegistryBuilder {
    registry: Registry,
    duplicates: DuplicatePolicy,
}

impl RegistryBuilder {
    /// Creates a new builder holding only the built-in types.
    pub fn new() -> Self {
        let mut builder = Self {
            registry: Registry::empty(),
            duplicates: DuplicatePolicy::Ignore,
        };

        for info in BUILTINS {
            let base = if info.is_null_type() {
                None
            } else {
                Some(NULL_TYPE_INDEX)
            };
            builder.push(info.name(), info.identifier(), info.construct_fn(), base, Some(info));
        }

        builder
    }

    /// Configures how identical re-registrations are treated.
    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Registers the reflected type `T` along with its base chain.
    pub fn register<T: Reflected>(&mut self) -> Result<TypeIdentifier, RegistryError> {
        self.register_info(T::TYPE_INFO)
    }

    /// Registers a type from its [`StaticTypeInfo`], registering
    /// missing bases first.
    pub fn register_info(
        &mut self,
        info: &'static StaticTypeInfo,
    ) -> Result<TypeIdentifier, RegistryError> {
        if !info.is_reflected() {
            error!(name = info.name(), "refusing to register unreflected type");
            return Err(RegistryError::Unreflected { name: info.name() });
        }

        // Built in from the start, with no base to compare against.
        if info.is_null_type() {
            return self.reregister(info.name(), info.identifier());
        }

        let base = info.base_type();
        if !base.is_null_type() && !self.is_present(base) {
            self.register_info(base)?;
        }

        self.insert(
            info.name(),
            info.identifier(),
            info.construct_fn(),
            base.identifier(),
            Some(info),
        )
    }

    /// Registers a type from raw parts.
    ///
    /// `base` must name an already registered type, or the
    /// [`NullType`](crate::NullType) for root types.
    pub fn register_raw(
        &mut self,
        name: &'static str,
        identifier: TypeIdentifier,
        construct: Option<ConstructFn>,
        base: TypeIdentifier,
    ) -> Result<TypeIdentifier, RegistryError> {
        self.insert(name, identifier, construct, base, None)
    }

    /// Indicates whether `identifier` was registered so far.
    pub fn is_registered(&self, identifier: TypeIdentifier) -> bool {
        self.registry.is_registered(identifier)
    }

    /// Finishes registration.
    pub fn build(self) -> Registry {
        debug!(types = self.registry.len(), "type registry built");
        self.registry
    }

    /// Finishes registration and installs the result as the global
    /// registry.
    pub fn install(self) -> Result<&'static Registry, RegistryError> {
        self.build().install()
    }

    /// Checks whether the very type described by `info` is
    /// registered already.
    ///
    /// Another type under the same name does not count, so that it
    /// is reported as a conflict on insertion.
    fn is_present(&self, info: &'static StaticTypeInfo) -> bool {
        self.registry
            .index
            .get(&info.identifier())
            .and_then(|&index| self.registry.entries[index].info)
            .map(|existing| existing.type_id() == info.type_id())
            .unwrap_or(false)
    }

    fn insert(
        &mut self,
        name: &'static str,
        identifier: TypeIdentifier,
        construct: Option<ConstructFn>,
        base: TypeIdentifier,
        info: Option<&'static StaticTypeInfo>,
    ) -> Result<TypeIdentifier, RegistryError> {
        if identifier.is_invalid() {
            error!(name, "type hashes to the reserved invalid identifier");
            return Err(RegistryError::ReservedIdentifier { name });
        }

        let Some(&base_index) = self.registry.index.get(&base) else {
            error!(name, %base, "base type is not registered");
            return Err(RegistryError::MissingBase { name, base });
        };

        if let Some(&index) = self.registry.index.get(&identifier) {
            let existing = &self.registry.entries[index];
            if !existing.matches(name, base_index, construct, info) {
                error!(name, existing = existing.name, %identifier, "conflicting type registration");
                return Err(RegistryError::Conflict {
                    name,
                    existing: existing.name,
                    identifier,
                });
            }

            return self.reregister(name, identifier);
        }

        self.push(name, identifier, construct, Some(base_index), info);
        Ok(identifier)
    }

    fn reregister(
        &self,
        name: &'static str,
        identifier: TypeIdentifier,
    ) -> Result<TypeIdentifier, RegistryError> {
        match self.duplicates {
            DuplicatePolicy::Ignore => {
                trace!(name, "ignoring identical re-registration");
                Ok(identifier)
            }
            DuplicatePolicy::Reject => {
                error!(name, "duplicate type registration");
                Err(RegistryError::Duplicate { name })
            }
        }
    }

    fn push(
        &mut self,
        name: &'static str,
        identifier: TypeIdentifier,
        construct: Option<ConstructFn>,
        base: Option<usize>,
        info: Option<&'static StaticTypeInfo>,
    ) {
        let index = self.registry.entries.len();
        self.registry.entries.push(Entry {
            name,
            identifier,
            base,
            derived: Vec::new(),
            construct,
            info,
        });
        self.registry.index.insert(identifier, index);

        if let Some(base) = base {
            self.registry.entries[base].derived.push(index);
        }

        debug!(name, %identifier, constructible = construct.is_some(), "registered type");
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Gets the global [`Registry`].
///
/// Before a registry was installed, this hands out a registry that
/// only knows the built-in types, so queries about user types answer
/// "unregistered" instead of failing.
pub fn registry() -> &'static Registry {
    static WARNING: Once = Once::new();

    match GLOBAL.get() {
        Some(registry) => registry,
        None => {
            WARNING.call_once(|| warn!("type registry queried before it was installed"));
            Lazy::force(&FALLBACK)
        }
    }
}

/// Indicates whether the global [`Registry`] was installed.
pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}

/// Builds and installs the global [`Registry`] exactly once.
///
/// `register` receives a fresh [`RegistryBuilder`] and registers
/// every type the program opts in. When the global registry is
/// already installed, it is returned as-is and `register` does not
/// run.
///
/// # Example
///
/// ```
/// # use trellis_reflect::{initialize, Reflect};
/// #[derive(Default, Reflect)]
/// struct Player {
///     #[field]
///     health: u32,
/// }
///
/// let registry = initialize(|builder| {
///     builder.register::<Player>()?;
///     Ok(())
/// })
/// .expect("type registration failed");
/// assert!(registry.lookup_type::<Player>().is_registered());
/// ```
pub fn initialize<F>(register: F) -> Result<&'static Registry, RegistryError>
where
    F: FnOnce(&mut RegistryBuilder) -> Result<(), RegistryError>,
{
    GLOBAL.get_or_try_init(|| {
        let mut builder = RegistryBuilder::new();
        register(&mut builder)?;
        Ok(builder.build())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NullType, TypeAttribute};

    fn construct_null() -> Box<dyn crate::Object> {
        Box::new(NullType)
    }

    #[test]
    fn builtins_are_registered() {
        let registry = RegistryBuilder::new().build();

        assert_eq!(registry.len(), BUILTINS.len());
        assert!(registry.null_type().is_null_type());
        assert!(registry.lookup_type::<TypeAttribute>().is_registered());
        assert!(!registry.invalid().is_registered());
    }

    #[test]
    fn raw_registration_links_base() {
        let mut builder = RegistryBuilder::new();
        let null = TypeIdentifier::of::<NullType>();
        let root = builder
            .register_raw("Root", TypeIdentifier::from_name("Root"), None, null)
            .unwrap();
        let leaf = builder
            .register_raw("Leaf", TypeIdentifier::from_name("Leaf"), Some(construct_null), root)
            .unwrap();
        let registry = builder.build();

        let root = registry.lookup(root);
        let leaf = registry.lookup(leaf);
        assert_eq!(leaf.base_type(), root);
        assert!(root.derived_types().any(|d| d == leaf));
        assert!(leaf.is_constructible());
        assert!(!root.is_constructible());
    }

    #[test]
    fn identical_registration_is_ignored() {
        let mut builder = RegistryBuilder::new();
        let null = TypeIdentifier::of::<NullType>();
        let id = TypeIdentifier::from_name("Root");

        builder.register_raw("Root", id, None, null).unwrap();
        assert_eq!(builder.register_raw("Root", id, None, null), Ok(id));
        assert_eq!(builder.build().lookup(TypeIdentifier::of::<NullType>()).derived_types().count(), 4);
    }

    #[test]
    fn identical_registration_can_be_rejected() {
        let mut builder = RegistryBuilder::new().duplicates(DuplicatePolicy::Reject);
        let null = TypeIdentifier::of::<NullType>();
        let id = TypeIdentifier::from_name("Root");

        builder.register_raw("Root", id, None, null).unwrap();
        assert_eq!(
            builder.register_raw("Root", id, None, null),
            Err(RegistryError::Duplicate { name: "Root" })
        );
    }

    #[test]
    fn null_type_registration_follows_the_policy() {
        let mut builder = RegistryBuilder::new();
        let null = TypeIdentifier::of::<NullType>();

        assert_eq!(builder.register::<NullType>(), Ok(null));
        assert_eq!(
            builder.register::<TypeAttribute>(),
            Ok(TypeIdentifier::of::<TypeAttribute>())
        );
        assert_eq!(builder.build().len(), BUILTINS.len());

        let mut builder = RegistryBuilder::new().duplicates(DuplicatePolicy::Reject);
        assert_eq!(
            builder.register::<NullType>(),
            Err(RegistryError::Duplicate {
                name: NullType::TYPE_INFO.name(),
            })
        );
    }

    #[test]
    fn conflicting_registration_fails() {
        let mut builder = RegistryBuilder::new();
        let null = TypeIdentifier::of::<NullType>();
        let id = TypeIdentifier::from_name("Root");

        builder.register_raw("Root", id, None, null).unwrap();
        assert_eq!(
            builder.register_raw("Impostor", id, None, null),
            Err(RegistryError::Conflict {
                name: "Impostor",
                existing: "Root",
                identifier: id,
            })
        );
    }

    #[test]
    fn missing_base_fails() {
        let mut builder = RegistryBuilder::new();
        let missing = TypeIdentifier::from_name("Missing");

        assert_eq!(
            builder.register_raw("Orphan", TypeIdentifier::from_name("Orphan"), None, missing),
            Err(RegistryError::MissingBase {
                name: "Orphan",
                base: missing,
            })
        );
        assert!(!builder.is_registered(TypeIdentifier::from_name("Orphan")));
    }

    #[test]
    fn reserved_identifier_fails() {
        let mut builder = RegistryBuilder::new();
        let null = TypeIdentifier::of::<NullType>();

        assert_eq!(
            builder.register_raw("Nothing", TypeIdentifier::INVALID, None, null),
            Err(RegistryError::ReservedIdentifier { name: "Nothing" })
        );
    }
}
