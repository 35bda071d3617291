use proc_macro2::TokenStream;
use syn::{spanned::Spanned, Data, Path, Result, Visibility};

use crate::utils::default_crate_path;

mod ast;
use self::ast::{attribute_type, Struct};

mod attrs;

pub fn derive(node: syn::DeriveInput) -> Result<TokenStream> {
    let input = Struct::from_syn(&node)?;
    input.validate()?;

    let path = input.krate().cloned().unwrap_or_else(default_crate_path);
    derive_struct(input, &path)
}

macro_rules! spanned_trait {
    ($trait:path, $input:expr, $path:ident) => {{
        let vis_span = match &$input.vis {
            Visibility::Public(vis) => Some(vis.pub_token.span()),
            Visibility::Crate(vis) => Some(vis.crate_token.span()),
            Visibility::Restricted(vis) => Some(vis.pub_token.span()),
            Visibility::Inherited => None,
        };
        let data_span = match &$input.data {
            Data::Struct(data) => data.struct_token.span(),
            Data::Enum(data) => data.enum_token.span(),
            Data::Union(data) => data.union_token.span(),
        };
        let first_span = vis_span.unwrap_or(data_span);
        let last_span = $input.ident.span();

        let path = quote_spanned!(first_span => #$path::);
        let ty = quote_spanned!(last_span => $trait);

        quote!(#path #ty)
    }};
}

/// Builds the `AttributeDescription` array for a list of attribute
/// values, declaring each value as a named constant first.
fn attribute_list(
    exprs: &[syn::Expr],
    prefix: &str,
    path: &Path,
) -> Result<(TokenStream, TokenStream)> {
    let count = exprs.len();
    let list = format_ident!("{}S", prefix);

    let mut consts = Vec::with_capacity(count);
    let mut descriptions = Vec::with_capacity(count);
    for (index, expr) in exprs.iter().enumerate() {
        let ty = attribute_type(expr)?;
        let value = format_ident!("{}_{}", prefix, index);

        consts.push(quote! {
            const #value: #ty = #expr;
        });
        descriptions.push(quote! {
            #path::type_info::AttributeDescription::new::<#ty>(#index, &#value)
        });
    }

    let items = quote! {
        #(#consts)*

        const #list: [#path::type_info::AttributeDescription; #count] = [
            #(#descriptions),*
        ];
    };

    Ok((items, quote!(&#list)))
}

fn derive_struct(input: Struct<'_>, path: &Path) -> Result<TokenStream> {
    let ty = &input.ident;
    let name = input.name();

    let (type_attributes, type_attributes_ref) =
        attribute_list(input.attributes(), "__ATTRIBUTE", path)?;

    let mut field_items = Vec::new();
    let mut field_descriptions = Vec::new();
    for (index, field) in input.reflected_fields().enumerate() {
        let ident = &field.ident;
        let field_ty = field.ty;
        let field_name = field.name();
        let getter = format_ident!("__field_{}", index);
        let getter_mut = format_ident!("__field_mut_{}", index);

        let (attributes, attributes_ref) = attribute_list(
            field.attributes(),
            &format!("__FIELD_{}_ATTRIBUTE", index),
            path,
        )?;

        field_items.push(quote! {
            #attributes

            fn #getter(
                object: &dyn ::std::any::Any,
            ) -> ::std::option::Option<&dyn ::std::any::Any> {
                object
                    .downcast_ref::<#ty>()
                    .map(|object| &object.#ident as &dyn ::std::any::Any)
            }

            fn #getter_mut(
                object: &mut dyn ::std::any::Any,
            ) -> ::std::option::Option<&mut dyn ::std::any::Any> {
                object
                    .downcast_mut::<#ty>()
                    .map(|object| &mut object.#ident as &mut dyn ::std::any::Any)
            }
        });
        field_descriptions.push(quote! {
            #path::type_info::FieldDescription::new::<#field_ty>(
                #index,
                #field_name,
                ::core::mem::offset_of!(#ty, #ident),
                ::std::stringify!(#field_ty),
                #attributes_ref,
                #getter,
                #getter_mut,
            )
        });
    }
    let field_count = field_descriptions.len();

    let (base_ty, base_methods) = match input.base() {
        Some(base) => {
            let ident = &base.ident;
            let base_ty = base.ty;
            (
                quote!(#base_ty),
                quote! {
                    #[inline]
                    fn base(&self) -> ::std::option::Option<&dyn #path::Object> {
                        ::std::option::Option::Some(&self.#ident)
                    }

                    #[inline]
                    fn base_mut(&mut self) -> ::std::option::Option<&mut dyn #path::Object> {
                        ::std::option::Option::Some(&mut self.#ident)
                    }
                },
            )
        }
        None => (
            quote!(#path::NullType),
            quote! {
                #[inline]
                fn base(&self) -> ::std::option::Option<&dyn #path::Object> {
                    ::std::option::Option::None
                }

                #[inline]
                fn base_mut(&mut self) -> ::std::option::Option<&mut dyn #path::Object> {
                    ::std::option::Option::None
                }
            },
        ),
    };

    let (construct_item, construct) = if input.is_constructible() {
        (
            quote! {
                fn __construct() -> ::std::boxed::Box<dyn #path::Object> {
                    ::std::boxed::Box::new(<#ty as ::std::default::Default>::default())
                }
            },
            quote!(::std::option::Option::Some(__construct)),
        )
    } else {
        (quote!(), quote!(::std::option::Option::None))
    };

    let reflected = spanned_trait!(type_info::Reflected, input.original, path);
    let object = spanned_trait!(Object, input.original, path);

    Ok(quote! {
        const _: () = {
            #type_attributes

            #(#field_items)*

            const __FIELDS: [#path::type_info::FieldDescription; #field_count] = [
                #(#field_descriptions),*
            ];

            #construct_item

            impl #reflected for #ty {
                type Base = #base_ty;

                const TYPE_INFO: &'static #path::type_info::StaticTypeInfo =
                    &#path::type_info::StaticTypeInfo::new::<#ty>(
                        #name,
                        ::std::option::Option::Some(
                            <#base_ty as #path::type_info::Reflected>::TYPE_INFO,
                        ),
                        #path::type_info::TypeFlags::REFLECTED,
                        #type_attributes_ref,
                        &__FIELDS,
                        #construct,
                    );
            }
        };

        impl #object for #ty {
            #[inline]
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            #[inline]
            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            #[inline]
            fn as_object(&self) -> &dyn #path::Object {
                self
            }

            #[inline]
            fn as_object_mut(&mut self) -> &mut dyn #path::Object {
                self
            }

            #[inline]
            fn static_type(&self) -> &'static #path::type_info::StaticTypeInfo {
                <Self as #path::type_info::Reflected>::TYPE_INFO
            }

            #base_methods
        }
    })
}
