//! Procedural macros for use with [`trellis-reflect`].
//!
//! There is no need to directly add this crate to application
//! dependencies as these macros are already re-exported by
//! [`trellis-reflect`].
//!
//! [`trellis-reflect`]: ../trellis_reflect/

#[macro_use]
extern crate quote;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod reflect;
mod utils;

/// Derives the `Reflected` and `Object` traits for a struct.
///
/// Only fields marked with `#[field]` are reflected. A single field
/// may be marked `#[field(base)]` instead, which makes its type the
/// base type and excludes it from the field list.
///
/// # Type options
///
/// - `#[reflect(name = "...")]` overrides the declared name, which
///   defaults to the struct's identifier
///
/// - `#[reflect(no_default)]` omits the construction function; by
///   default the type must implement `Default`
///
/// - `#[reflect(attributes(Value, ...))]` attaches attribute values
///
/// - `#[reflect(crate = path)]` changes the path to `trellis_reflect`
///
/// # Field options
///
/// - `#[field(name = "...")]` overrides the field name
///
/// - `#[field(attributes(Value, ...))]` attaches attribute values
///
/// Attribute values must be constant expressions of a reflected type
/// without drop glue, spelled as a struct literal, a unit struct or a
/// `Type::constructor(..)` call.
#[proc_macro_derive(Reflect, attributes(reflect, field))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    reflect::derive(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
