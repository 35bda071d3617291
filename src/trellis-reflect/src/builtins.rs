//! Built-in reflected types and helpers for manual implementations.

use crate::{
    object::Object,
    type_info::{Reflected, StaticTypeInfo, TypeFlags},
};

/// Implements the [`Object`] methods in-place.
///
/// The single-argument form names the field which embeds the base
/// object of the implementing type.
///
/// # Example
///
/// ```
/// # use trellis_reflect::{impl_object_methods, type_info::*, NullType, Object};
/// struct Example;
///
/// impl Reflected for Example {
///     type Base = NullType;
///
///     const TYPE_INFO: &'static StaticTypeInfo = &StaticTypeInfo::new::<Example>(
///         "Example",
///         Some(NullType::TYPE_INFO),
///         TypeFlags::REFLECTED,
///         &[],
///         &[],
///         None,
///     );
/// }
///
/// impl Object for Example {
///     impl_object_methods!();
/// }
/// ```
#[macro_export]
macro_rules! impl_object_methods {
    () => {
        $crate::impl_object_methods!(@common);

        #[inline]
        fn base(&self) -> ::std::option::Option<&dyn $crate::Object> {
            ::std::option::Option::None
        }

        #[inline]
        fn base_mut(&mut self) -> ::std::option::Option<&mut dyn $crate::Object> {
            ::std::option::Option::None
        }
    };

    ($base:ident) => {
        $crate::impl_object_methods!(@common);

        #[inline]
        fn base(&self) -> ::std::option::Option<&dyn $crate::Object> {
            ::std::option::Option::Some(&self.$base)
        }

        #[inline]
        fn base_mut(&mut self) -> ::std::option::Option<&mut dyn $crate::Object> {
            ::std::option::Option::Some(&mut self.$base)
        }
    };

    (@common) => {
        #[inline]
        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }

        #[inline]
        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }

        #[inline]
        fn as_object(&self) -> &dyn $crate::Object {
            self
        }

        #[inline]
        fn as_object_mut(&mut self) -> &mut dyn $crate::Object {
            self
        }

        #[inline]
        fn static_type(&self) -> &'static $crate::type_info::StaticTypeInfo {
            <Self as $crate::type_info::Reflected>::TYPE_INFO
        }
    };
}

/// Gives a type an identity without opting it into reflection.
///
/// The type can then be named in static and dynamic queries, but it
/// reports [`StaticTypeInfo::is_reflected`] as `false`, carries no
/// fields or attributes and is refused by the registry.
///
/// The name defaults to the stringified type.
#[macro_export]
macro_rules! unreflected {
    ($ty:ty) => {
        $crate::unreflected!($ty, ::std::stringify!($ty));
    };

    ($ty:ty, $name:expr) => {
        impl $crate::type_info::Reflected for $ty {
            type Base = $crate::NullType;

            const TYPE_INFO: &'static $crate::type_info::StaticTypeInfo =
                &$crate::type_info::StaticTypeInfo::new::<$ty>(
                    $name,
                    ::std::option::Option::Some(
                        <$crate::NullType as $crate::type_info::Reflected>::TYPE_INFO,
                    ),
                    $crate::type_info::TypeFlags::empty(),
                    &[],
                    &[],
                    ::std::option::Option::None,
                );
        }

        impl $crate::Object for $ty {
            $crate::impl_object_methods!();
        }
    };
}

/// The sentinel type denoting "no base type".
///
/// Every root type is declared with `NullType` as its base. It is
/// always present in a [`Registry`](crate::Registry).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NullType;

impl Reflected for NullType {
    type Base = NullType;

    const TYPE_INFO: &'static StaticTypeInfo = &StaticTypeInfo::new::<NullType>(
        "trellis::NullType",
        None,
        TypeFlags::REFLECTED.union(TypeFlags::NULL_TYPE),
        &[],
        &[],
        None,
    );
}

impl Object for NullType {
    impl_object_methods!();
}

macro_rules! abstract_root {
    ($(#[$meta:meta])* $ty:ident, $name:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $ty;

        impl Reflected for $ty {
            type Base = NullType;

            const TYPE_INFO: &'static StaticTypeInfo = &StaticTypeInfo::new::<$ty>(
                $name,
                Some(NullType::TYPE_INFO),
                TypeFlags::REFLECTED,
                &[],
                &[],
                None,
            );
        }

        impl Object for $ty {
            impl_object_methods!();
        }
    };
}

abstract_root! {
    /// The base for attributes attached to types.
    ///
    /// Registered, but never constructible.
    TypeAttribute, "trellis::TypeAttribute"
}

abstract_root! {
    /// The base for attributes attached to fields.
    ///
    /// Registered, but never constructible.
    FieldAttribute, "trellis::FieldAttribute"
}

abstract_root! {
    /// The base for attributes attached to methods.
    ///
    /// Registered, but never constructible.
    MethodAttribute, "trellis::MethodAttribute"
}

/// The [`StaticTypeInfo`]s every registry starts out with.
pub(crate) const BUILTINS: [&StaticTypeInfo; 4] = [
    NullType::TYPE_INFO,
    TypeAttribute::TYPE_INFO,
    FieldAttribute::TYPE_INFO,
    MethodAttribute::TYPE_INFO,
];
