use std::{
    any::{Any, TypeId},
    fmt,
};

use trellis_utils::hash::djb2;

use super::{AttributeDescription, AttributeList, Reflected};
use crate::object::Object;

/// Accessor which borrows a field out of its owning object.
///
/// Returns [`None`] when the object is not of the owning type.
pub type FieldGetter = fn(&dyn Any) -> Option<&dyn Any>;

/// Accessor which mutably borrows a field out of its owning
/// object.
///
/// Returns [`None`] when the object is not of the owning type.
pub type FieldGetterMut = fn(&mut dyn Any) -> Option<&mut dyn Any>;

/// Description of a field in a reflected type.
///
/// Fields, being reflected members of Rust structs, have the following
/// details exposed for reflective access:
///
/// - their name, unique within the owning type
///
/// - their declaration index and byte offset in the owning type
///
/// - the declared spelling and [`TypeId`] of their value type
///
/// - an ordered list of [`AttributeDescription`]s
#[derive(Clone, Copy)]
pub struct FieldDescription {
    name: &'static str,
    hash: u32,
    index: usize,
    offset: usize,

    value_type_name: &'static str,
    value_type_id: fn() -> TypeId,

    attributes: &'static [AttributeDescription],

    get: FieldGetter,
    get_mut: FieldGetterMut,
}

impl FieldDescription {
    /// Creates a new [`FieldDescription`] for a field of type `V`.
    ///
    /// `get` and `get_mut` must borrow exactly this field from an
    /// instance of the owning type; the derive macro generates them
    /// together with the `offset`.
    pub const fn new<V: Any>(
        index: usize,
        name: &'static str,
        offset: usize,
        value_type_name: &'static str,
        attributes: &'static [AttributeDescription],
        get: FieldGetter,
        get_mut: FieldGetterMut,
    ) -> Self {
        Self {
            name,
            hash: djb2(name),
            index,
            offset,

            value_type_name,
            value_type_id: TypeId::of::<V>,

            attributes,

            get,
            get_mut,
        }
    }

    /// Gets the name of the field.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Gets the dictionary hash of the field.
    ///
    /// The resulting value can be assumed to uniquely reference a field
    /// within the same type.
    pub const fn hash(&self) -> u32 {
        self.hash
    }

    /// Gets the declaration index of the field.
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Gets the byte offset of the field inside its owning type.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Gets the value type as it was spelled in the declaration.
    pub const fn value_type_name(&self) -> &'static str {
        self.value_type_name
    }

    /// Gets the [`TypeId`] of the field's value type.
    pub fn value_type_id(&self) -> TypeId {
        (self.value_type_id)()
    }

    /// Checks if the field stores a `V`.
    pub fn is_type<V: Any>(&self) -> bool {
        self.value_type_id() == TypeId::of::<V>()
    }

    /// Gets the field's attributes in declaration order.
    pub const fn attributes(&self) -> AttributeList {
        AttributeList::new(self.attributes)
    }

    /// Indicates whether any attributes are attached to the field.
    pub const fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Gets the attribute at `index`.
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of bounds. Used in `const`
    /// context, this turns into a build failure.
    pub const fn attribute(&self, index: usize) -> &'static AttributeDescription {
        self.attributes().get(index)
    }

    /// Gets the attribute at `index`, if it exists.
    pub fn attribute_at(&self, index: usize) -> Option<&'static AttributeDescription> {
        self.attributes.get(index)
    }

    /// Finds the first attribute named `name`.
    pub fn find_attribute(&self, name: &str) -> Option<&'static AttributeDescription> {
        self.attributes().find(name)
    }

    /// Checks whether an attribute of type `A` is attached to the
    /// field.
    pub fn has_attribute<A: Reflected>(&self) -> bool {
        self.attributes().contains::<A>()
    }

    /// Gets the value of the first attribute of type `A`.
    pub fn attribute_value<A: Reflected>(&self) -> Option<&'static A> {
        self.attributes().value::<A>()
    }

    /// Borrows the field's value out of `obj`.
    ///
    /// Returns [`None`] when `obj` is not of the type that declares
    /// this field. Fields of base types must be accessed through the
    /// base object, see [`Object::base`].
    pub fn value<'a>(&self, obj: &'a dyn Object) -> Option<&'a dyn Any> {
        (self.get)(obj.as_any())
    }

    /// Mutably borrows the field's value out of `obj`.
    ///
    /// Returns [`None`] when `obj` is not of the type that declares
    /// this field.
    pub fn value_mut<'a>(&self, obj: &'a mut dyn Object) -> Option<&'a mut dyn Any> {
        (self.get_mut)(obj.as_any_mut())
    }

    /// Borrows the field's value out of `obj` as a `V`.
    pub fn value_as<'a, V: Any>(&self, obj: &'a dyn Object) -> Option<&'a V> {
        self.value(obj).and_then(<dyn Any>::downcast_ref)
    }

    /// Mutably borrows the field's value out of `obj` as a `V`.
    pub fn value_as_mut<'a, V: Any>(&self, obj: &'a mut dyn Object) -> Option<&'a mut V> {
        self.value_mut(obj).and_then(<dyn Any>::downcast_mut)
    }
}

impl fmt::Debug for FieldDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescription")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("offset", &self.offset)
            .field("value_type_name", &self.value_type_name)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}
