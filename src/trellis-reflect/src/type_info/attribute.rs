use std::{
    any::{Any, TypeId},
    fmt,
};

use super::{str_eq, Reflected};
use crate::identifier::TypeIdentifier;

/// Type-only description of an attribute.
///
/// This is what membership queries operate on: it tells *which*
/// attribute type sits at a declaration index without exposing
/// the attached value.
#[derive(Clone, Copy)]
pub struct AttributeType {
    name: &'static str,
    identifier: TypeIdentifier,
    index: usize,
    type_id: fn() -> TypeId,
}

impl AttributeType {
    /// Gets the reflected name of the attribute type.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Gets the identifier of the attribute type.
    pub const fn identifier(&self) -> TypeIdentifier {
        self.identifier
    }

    /// Gets the declaration index of the attribute.
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Checks if the attribute is of type `A`.
    pub fn is<A: Any>(&self) -> bool {
        (self.type_id)() == TypeId::of::<A>()
    }
}

impl fmt::Debug for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeType")
            .field("name", &self.name)
            .field("identifier", &self.identifier)
            .field("index", &self.index)
            .finish()
    }
}

impl PartialEq for AttributeType {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier && self.index == other.index
    }
}

impl Eq for AttributeType {}

/// An attribute attached to a reflected type or field, together
/// with its value.
///
/// Attribute types are reflected types themselves. By convention
/// they inherit from [`TypeAttribute`] or [`FieldAttribute`].
///
/// [`TypeAttribute`]: crate::TypeAttribute
/// [`FieldAttribute`]: crate::FieldAttribute
#[derive(Clone, Copy)]
pub struct AttributeDescription {
    ty: AttributeType,
    value: &'static (dyn Any + Sync),
}

impl AttributeDescription {
    /// Creates a description of the attribute `value` declared at
    /// position `index`.
    pub const fn new<A: Reflected>(index: usize, value: &'static A) -> Self {
        Self {
            ty: AttributeType {
                name: A::TYPE_INFO.name(),
                identifier: A::TYPE_INFO.identifier(),
                index,
                type_id: TypeId::of::<A>,
            },
            value,
        }
    }

    /// Gets the type-only view of this attribute.
    pub const fn attribute_type(&self) -> AttributeType {
        self.ty
    }

    /// Gets the reflected name of the attribute type.
    pub const fn name(&self) -> &'static str {
        self.ty.name
    }

    /// Gets the identifier of the attribute type.
    pub const fn identifier(&self) -> TypeIdentifier {
        self.ty.identifier
    }

    /// Gets the declaration index of the attribute.
    pub const fn index(&self) -> usize {
        self.ty.index
    }

    /// Checks if the attribute is of type `A`.
    pub fn is<A: Any>(&self) -> bool {
        self.ty.is::<A>()
    }

    /// Gets the attached value.
    pub fn value(&self) -> &'static dyn Any {
        self.value
    }

    /// Gets the attached value as an `A`, if it is one.
    pub fn value_as<A: Any>(&self) -> Option<&'static A> {
        self.value().downcast_ref()
    }
}

impl fmt::Debug for AttributeDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeDescription")
            .field("name", &self.ty.name)
            .field("index", &self.ty.index)
            .finish_non_exhaustive()
    }
}

/// An ordered list of [`AttributeDescription`]s attached to a type
/// or to a field.
#[derive(Clone, Copy, Debug)]
pub struct AttributeList {
    attributes: &'static [AttributeDescription],
}

impl AttributeList {
    pub(crate) const fn new(attributes: &'static [AttributeDescription]) -> Self {
        Self { attributes }
    }

    /// Gets the number of attributes in the list.
    pub const fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Indicates whether the list is empty.
    pub const fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Gets the attribute at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of bounds. Used in `const`
    /// context, this turns into a build failure.
    pub const fn get(&self, index: usize) -> &'static AttributeDescription {
        let attributes = self.attributes;
        if index >= attributes.len() {
            panic!("out of bounds attribute index");
        }
        &attributes[index]
    }

    /// Gets the index of the first attribute named `name`.
    pub const fn position(&self, name: &str) -> Option<usize> {
        let mut i = 0;
        while i < self.attributes.len() {
            if str_eq(self.attributes[i].name(), name) {
                return Some(i);
            }
            i += 1;
        }
        None
    }

    /// Finds the first attribute named `name`.
    pub fn find(&self, name: &str) -> Option<&'static AttributeDescription> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    /// Checks whether an attribute of type `A` is in the list.
    pub fn contains<A: Any>(&self) -> bool {
        self.types().any(|ty| ty.is::<A>())
    }

    /// Gets the value of the first attribute of type `A`.
    pub fn value<A: Any>(&self) -> Option<&'static A> {
        self.attributes.iter().find_map(|a| a.value_as::<A>())
    }

    /// Returns an [`Iterator`] over the attributes in declaration
    /// order.
    pub fn iter(&self) -> std::slice::Iter<'static, AttributeDescription> {
        self.attributes.iter()
    }

    /// Returns an [`Iterator`] over the type-only views of the
    /// attributes in declaration order.
    pub fn types(&self) -> impl Iterator<Item = AttributeType> {
        self.attributes.iter().map(AttributeDescription::attribute_type)
    }
}

impl IntoIterator for AttributeList {
    type Item = &'static AttributeDescription;
    type IntoIter = std::slice::Iter<'static, AttributeDescription>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}
