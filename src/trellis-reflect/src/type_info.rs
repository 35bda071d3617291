//! Statically embeddable type information for reflected Rust types.

use std::{
    any::{Any, TypeId},
    fmt,
};

use bitflags::bitflags;

use crate::{builtins::NullType, identifier::TypeIdentifier, object::Object};

mod attribute;
pub use attribute::*;

mod field;
pub use field::*;

/// A function that default-constructs a reflected type.
pub type ConstructFn = fn() -> Box<dyn Object>;

bitflags! {
    /// The configuration bits for [`StaticTypeInfo`] values.
    pub struct TypeFlags: u32 {
        /// The type opted into reflection through its declaration.
        const REFLECTED = 1 << 0;
        /// The type can be created without arguments.
        const CONSTRUCTIBLE = 1 << 1;
        /// The type is the [`NullType`] sentinel.
        const NULL_TYPE = 1 << 2;
    }
}

/// Statically accessible [`StaticTypeInfo`] for reflected types.
///
/// Users should prefer the `#[derive(Reflect)]` macro over manual
/// implementations.
///
/// # Correctness
///
/// While not directly causing memory unsafety, the following
/// invariants must be met by implementations of this trait.
///
/// - `TYPE_INFO` must describe `Self`, with its base set to the
///   description of [`Reflected::Base`].
///
/// - [`Object::base`] must return the embedded value of type
///   [`Reflected::Base`], or [`None`] for root types.
pub trait Reflected: Object + Sized {
    /// The type this one inherits from.
    ///
    /// Root types use [`NullType`].
    type Base: Reflected;

    /// A reference to the associated [`StaticTypeInfo`].
    const TYPE_INFO: &'static StaticTypeInfo;
}

/// Compile-time description of a reflected type.
///
/// Instances live in `static` memory for the entire lifetime of
/// the program and are never mutated.
#[derive(Clone, Copy)]
pub struct StaticTypeInfo {
    name: &'static str,
    identifier: TypeIdentifier,
    base: Option<&'static StaticTypeInfo>,
    flags: TypeFlags,

    attributes: &'static [AttributeDescription],
    fields: &'static [FieldDescription],

    construct: Option<ConstructFn>,
    type_id: fn() -> TypeId,
}

impl StaticTypeInfo {
    /// Creates a new type description for `T`.
    ///
    /// `base` is the description of the type `T` inherits from; only
    /// the [`NullType`] itself passes [`None`] here. `attributes` and
    /// `fields` are listed in declaration order.
    ///
    /// [`TypeFlags::CONSTRUCTIBLE`] is derived from the presence of
    /// `construct` and must not be passed in `flags`.
    pub const fn new<T: Object>(
        name: &'static str,
        base: Option<&'static StaticTypeInfo>,
        flags: TypeFlags,
        attributes: &'static [AttributeDescription],
        fields: &'static [FieldDescription],
        construct: Option<ConstructFn>,
    ) -> Self {
        let flags = if construct.is_some() {
            flags.union(TypeFlags::CONSTRUCTIBLE)
        } else {
            flags.difference(TypeFlags::CONSTRUCTIBLE)
        };

        Self {
            name,
            identifier: TypeIdentifier::from_name(name),
            base,
            flags,

            attributes,
            fields,

            construct,
            type_id: TypeId::of::<T>,
        }
    }

    /// Gets the declared name of the type.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Gets the identifier computed from the type's name.
    pub const fn identifier(&self) -> TypeIdentifier {
        self.identifier
    }

    /// Gets the [`TypeFlags`] of the type.
    pub const fn flags(&self) -> TypeFlags {
        self.flags
    }

    /// Gets the [`TypeId`] of the described Rust type.
    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Checks if `T` is the described Rust type.
    pub fn is<T: Any>(&self) -> bool {
        self.type_id() == TypeId::of::<T>()
    }

    /// Indicates whether the type opted into reflection.
    pub const fn is_reflected(&self) -> bool {
        self.flags.contains(TypeFlags::REFLECTED)
    }

    /// Indicates whether the type is the [`NullType`] sentinel.
    pub const fn is_null_type(&self) -> bool {
        self.flags.contains(TypeFlags::NULL_TYPE)
    }

    /// Indicates whether the type can be default-constructed
    /// through [`StaticTypeInfo::instantiate`].
    pub const fn is_constructible(&self) -> bool {
        self.flags.contains(TypeFlags::CONSTRUCTIBLE)
    }

    /// Creates a default-initialized instance of the type, if it
    /// is constructible.
    pub fn instantiate(&self) -> Option<Box<dyn Object>> {
        self.construct.map(|construct| construct())
    }

    /// Gets the construction function of the type, if any.
    pub const fn construct_fn(&self) -> Option<ConstructFn> {
        self.construct
    }

    /// Indicates whether the type inherits from a type other
    /// than [`NullType`].
    pub const fn has_base_type(&self) -> bool {
        match self.base {
            Some(base) => !base.is_null_type(),
            None => false,
        }
    }

    /// Gets the description of the base type.
    ///
    /// Root types as well as the [`NullType`] itself report the
    /// [`NullType`] here.
    pub const fn base_type(&self) -> &'static StaticTypeInfo {
        match self.base {
            Some(base) => base,
            None => NullType::TYPE_INFO,
        }
    }

    /// Gets the identifier of the base type.
    pub const fn base_identifier(&self) -> TypeIdentifier {
        self.base_type().identifier()
    }

    /// Returns an [`Iterator`] over the ancestors of this type,
    /// starting with the immediate base.
    ///
    /// The [`NullType`] is never yielded.
    pub fn ancestors(&self) -> Ancestors {
        Ancestors { next: self.base }
    }

    /// Checks if `other` describes the same type.
    pub fn is_type(&self, other: &StaticTypeInfo) -> bool {
        self.identifier == other.identifier
    }

    /// Checks if `other` appears anywhere in this type's chain
    /// of ancestors.
    pub fn is_derived_from(&self, other: &StaticTypeInfo) -> bool {
        !other.is_null_type() && self.ancestors().any(|a| a.is_type(other))
    }

    /// Checks if this type appears anywhere in the chain of
    /// ancestors of `other`.
    pub fn is_base_of(&self, other: &StaticTypeInfo) -> bool {
        other.is_derived_from(self)
    }

    /// Gets the type-level attributes in declaration order.
    pub const fn attributes(&self) -> AttributeList {
        AttributeList::new(self.attributes)
    }

    /// Indicates whether the type declares any attributes.
    pub const fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Gets the type-level attribute at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of bounds. Used in `const`
    /// context, this turns into a build failure.
    pub const fn attribute(&self, index: usize) -> &'static AttributeDescription {
        self.attributes().get(index)
    }

    /// Gets the type-level attribute at `index`, if it exists.
    pub fn attribute_at(&self, index: usize) -> Option<&'static AttributeDescription> {
        self.attributes.get(index)
    }

    /// Finds the first type-level attribute with the given name.
    pub fn find_attribute(&self, name: &str) -> Option<&'static AttributeDescription> {
        self.attributes().find(name)
    }

    /// Checks whether an attribute of type `A` is attached to
    /// the type.
    pub fn has_attribute<A: Reflected>(&self) -> bool {
        self.attributes().contains::<A>()
    }

    /// Gets the value of the first attribute of type `A`.
    pub fn attribute_value<A: Reflected>(&self) -> Option<&'static A> {
        self.attributes().value::<A>()
    }

    /// Gets the declared fields, excluding the base.
    pub const fn fields(&self) -> &'static [FieldDescription] {
        self.fields
    }

    /// Indicates whether the type declares any fields.
    pub const fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Gets the number of declared fields.
    ///
    /// This excludes fields of base types.
    pub const fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Gets the field at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of bounds. Used in `const`
    /// context, this turns into a build failure.
    pub const fn field(&self, index: usize) -> &'static FieldDescription {
        let fields = self.fields;
        if index >= fields.len() {
            panic!("out of bounds field index");
        }
        &fields[index]
    }

    /// Gets the field at `index`, if it exists.
    pub fn field_at(&self, index: usize) -> Option<&'static FieldDescription> {
        self.fields.get(index)
    }

    /// Gets the index of the first field named `name`.
    pub const fn field_index(&self, name: &str) -> Option<usize> {
        let mut i = 0;
        while i < self.fields.len() {
            if str_eq(self.fields[i].name(), name) {
                return Some(i);
            }
            i += 1;
        }
        None
    }

    /// Finds the first field named `name`.
    ///
    /// NOTE: This does not scan the fields of base types.
    pub fn find_field(&self, name: &str) -> Option<&'static FieldDescription> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Finds a field by its dictionary hash.
    ///
    /// NOTE: This does not scan the fields of base types.
    pub fn field_for(&self, hash: u32) -> Option<&'static FieldDescription> {
        self.fields.iter().find(|f| f.hash() == hash)
    }

    /// Returns an [`Iterator`] over the fields of this type and
    /// all of its ancestors.
    ///
    /// Fields of the root type come first, fields of this type
    /// last.
    pub fn all_fields(&self) -> impl Iterator<Item = &'static FieldDescription> {
        let mut chain: Vec<&'static [FieldDescription]> =
            self.ancestors().map(|a| a.fields).collect();
        chain.reverse();
        chain.push(self.fields);

        chain.into_iter().flatten()
    }
}

impl fmt::Debug for StaticTypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTypeInfo")
            .field("name", &self.name)
            .field("identifier", &self.identifier)
            .field("base", &self.base.map(|b| b.name))
            .field("flags", &self.flags)
            .field("attributes", &self.attributes)
            .field("fields", &self.fields)
            .finish()
    }
}

impl PartialEq for StaticTypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.is_type(other)
    }
}

impl Eq for StaticTypeInfo {}

/// An [`Iterator`] over the ancestors of a reflected type.
///
/// Created by [`StaticTypeInfo::ancestors`].
#[derive(Clone)]
pub struct Ancestors {
    next: Option<&'static StaticTypeInfo>,
}

impl Iterator for Ancestors {
    type Item = &'static StaticTypeInfo;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|info| !info.is_null_type())?;
        self.next = current.base;
        Some(current)
    }
}

/// Compares two strings in `const` context.
pub(crate) const fn str_eq(lhs: &str, rhs: &str) -> bool {
    let (lhs, rhs) = (lhs.as_bytes(), rhs.as_bytes());
    if lhs.len() != rhs.len() {
        return false;
    }

    let mut i = 0;
    while i < lhs.len() {
        if lhs[i] != rhs[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Gets the [`StaticTypeInfo`] of `T`.
#[inline]
pub const fn static_type<T: Reflected>() -> &'static StaticTypeInfo {
    T::TYPE_INFO
}

/// Indicates whether `T` opted into reflection.
///
/// Types declared through [`unreflected!`](crate::unreflected)
/// report `false`.
#[inline]
pub const fn is_reflected<T: Reflected>() -> bool {
    T::TYPE_INFO.is_reflected()
}

/// Indicates whether `T` inherits from a type other than
/// [`NullType`].
#[inline]
pub const fn has_base_type<T: Reflected>() -> bool {
    T::TYPE_INFO.has_base_type()
}

/// Gets the [`StaticTypeInfo`] of the base type of `T`.
#[inline]
pub const fn base_type<T: Reflected>() -> &'static StaticTypeInfo {
    <T::Base as Reflected>::TYPE_INFO
}
