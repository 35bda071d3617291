//! A dual-mode reflection system for Rust types.
//!
//! The static half describes types at compile time: every type which
//! derives [`Reflect`] carries a [`StaticTypeInfo`] with its name,
//! base type, fields and attributes.
//!
//! The dynamic half is a [`Registry`] built once during start-up. It
//! tracks the emulated inheritance tree between registered types and
//! powers identifier lookups, polymorphic type tests, casts across
//! the inheritance chain and default construction.
//!
//! Inheritance is modeled by composition: a derived type embeds its
//! base as a field marked `#[field(base)]`.
//!
//! ```
//! use trellis_reflect::{cast, initialize, static_type, Reflect};
//!
//! #[derive(Default, Reflect)]
//! struct Base {
//!     #[field]
//!     name: String,
//! }
//!
//! #[derive(Default, Reflect)]
//! struct Derived {
//!     #[field(base)]
//!     base: Base,
//!     #[field]
//!     value: i32,
//! }
//!
//! initialize(|builder| {
//!     builder.register::<Derived>()?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! assert_eq!(static_type::<Derived>().field(0).name(), "value");
//!
//! let derived = Derived::default();
//! let base = cast::<Base>(&derived).unwrap();
//! assert!(base.name.is_empty());
//! assert_eq!(base.type_info().name(), "Derived");
//! ```

#![deny(
    rust_2018_idioms,
    rustdoc::broken_intra_doc_links,
    unsafe_op_in_unsafe_fn
)]

pub mod type_info;
#[doc(inline)]
pub use self::type_info::{base_type, has_base_type, is_reflected, static_type, StaticTypeInfo};

mod identifier;
pub use self::identifier::*;

mod object;
pub use self::object::*;

mod builtins;
pub use self::builtins::{FieldAttribute, MethodAttribute, NullType, TypeAttribute};

mod registry;
pub use self::registry::{
    initialize, is_initialized, registry, DuplicatePolicy, Registry, RegistryBuilder,
    RegistryError,
};

mod dynamic;
pub use self::dynamic::*;

mod cast;
pub use self::cast::*;

mod construct;
pub use self::construct::*;

pub use trellis_reflect_macros::Reflect;
