use syn::{
    parenthesized,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    token, Attribute, Error, Expr, LitStr, Result, Token,
};

mod kw {
    syn::custom_keyword!(name);
    syn::custom_keyword!(no_default);
    syn::custom_keyword!(attributes);
    syn::custom_keyword!(base);
}

pub struct Attrs<'a> {
    pub reflect: Option<ReflectAttr<'a>>,
    pub field: Option<FieldAttr<'a>>,
}

pub fn get(input: &[Attribute]) -> Result<Attrs<'_>> {
    let mut attrs = Attrs {
        reflect: None,
        field: None,
    };

    for attr in input {
        if attr.path.is_ident("reflect") {
            parse_reflect_attr(&mut attrs, attr)?;
        } else if attr.path.is_ident("field") {
            parse_field_attr(&mut attrs, attr)?;
        }
    }

    Ok(attrs)
}

/// #[reflect(..)]
///
/// Only on structs.
pub struct ReflectAttr<'a> {
    pub original: &'a Attribute,
    name: Option<LitStr>,
    pub krate: Option<syn::Path>,
    pub no_default: bool,
    pub attributes: Vec<Expr>,
}

impl<'a> ReflectAttr<'a> {
    pub fn name(&self) -> Option<String> {
        self.name.as_ref().map(|name| name.value())
    }
}

fn parse_reflect_attr<'a>(attrs: &mut Attrs<'a>, attr: &'a Attribute) -> Result<()> {
    let reflect = attrs.reflect.get_or_insert_with(|| ReflectAttr {
        original: attr,
        name: None,
        krate: None,
        no_default: false,
        attributes: Vec::new(),
    });

    attr.parse_args_with(|input: ParseStream<'_>| {
        let mut first = true;
        while !input.is_empty() {
            if !first {
                input.parse::<Token![,]>()?;
            }

            let look = input.lookahead1();
            if look.peek(kw::name) {
                if reflect.name.is_some() {
                    return Err(Error::new_spanned(
                        attr,
                        "duplicate #[reflect(name)] attribute found",
                    ));
                }

                let AttrWrapper::<kw::name, LitStr> { value: name, .. } = input.parse()?;
                reflect.name = Some(name);
            } else if look.peek(Token![crate]) {
                if reflect.krate.is_some() {
                    return Err(Error::new_spanned(
                        attr,
                        "duplicate #[reflect(crate)] attribute found",
                    ));
                }

                reflect.krate = Some(parse_mod_path::<Token![crate]>(input)?);
            } else if look.peek(kw::no_default) {
                if reflect.no_default {
                    return Err(Error::new_spanned(
                        attr,
                        "duplicate #[reflect(no_default)] attribute found",
                    ));
                }

                input.parse::<kw::no_default>()?;
                reflect.no_default = true;
            } else if look.peek(kw::attributes) {
                reflect
                    .attributes
                    .extend(parse_attribute_list::<kw::attributes>(input)?);
            } else {
                return Err(look.error());
            }

            first = false;
        }

        Ok(())
    })
}

/// #[field(..)]
///
/// Only on struct fields.
pub struct FieldAttr<'a> {
    pub original: &'a Attribute,
    name: Option<LitStr>,
    pub base: bool,
    pub attributes: Vec<Expr>,
}

impl<'a> FieldAttr<'a> {
    pub fn name(&self) -> Option<String> {
        self.name.as_ref().map(|name| name.value())
    }

    pub fn has_name(&self) -> bool {
        self.name.is_some()
    }
}

fn parse_field_attr<'a>(attrs: &mut Attrs<'a>, attr: &'a Attribute) -> Result<()> {
    let field = attrs.field.get_or_insert_with(|| FieldAttr {
        original: attr,
        name: None,
        base: false,
        attributes: Vec::new(),
    });

    // Allow the `#[field]` notation to be accepted.
    if attr.tokens.is_empty() {
        return Ok(());
    }

    attr.parse_args_with(|input: ParseStream<'_>| {
        let mut first = true;
        while !input.is_empty() {
            if !first {
                input.parse::<Token![,]>()?;
            }

            let look = input.lookahead1();
            if look.peek(kw::base) {
                if field.base {
                    return Err(Error::new_spanned(
                        attr,
                        "duplicate #[field(base)] attribute found",
                    ));
                }

                input.parse::<kw::base>()?;
                field.base = true;
            } else if look.peek(kw::name) {
                if field.name.is_some() {
                    return Err(Error::new_spanned(
                        attr,
                        "duplicate #[field(name)] attribute found",
                    ));
                }

                let AttrWrapper::<kw::name, LitStr> { value: name, .. } = input.parse()?;
                field.name = Some(name);
            } else if look.peek(kw::attributes) {
                field
                    .attributes
                    .extend(parse_attribute_list::<kw::attributes>(input)?);
            } else {
                return Err(look.error());
            }

            first = false;
        }

        Ok(())
    })
}

struct AttrWrapper<K, V> {
    #[allow(unused)] // Usually we don't care about the ident.
    pub ident: K,
    pub value: V,
}

impl<K: Parse, V: Parse> Parse for AttrWrapper<K, V> {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let ident = input.parse()?;
        let value = if input.peek(token::Paren) {
            // #[ident(value)]
            let value;
            parenthesized!(value in input);
            value.parse()?
        } else {
            // #[ident = value]
            input.parse::<Token![=]>()?;
            input.parse()?
        };

        Ok(Self { ident, value })
    }
}

fn parse_mod_path<K: Parse>(input: ParseStream<'_>) -> Result<syn::Path> {
    input.parse::<K>()?;
    if input.peek(token::Paren) {
        // #[ident(path)]
        let value;
        parenthesized!(value in input);
        value.call(syn::Path::parse_mod_style)
    } else {
        // #[ident = path]
        input.parse::<Token![=]>()?;
        input.call(syn::Path::parse_mod_style)
    }
}

// #[ident(expr, expr, ..)]
fn parse_attribute_list<K: Parse>(input: ParseStream<'_>) -> Result<Vec<Expr>> {
    input.parse::<K>()?;

    let content;
    parenthesized!(content in input);
    let exprs: Punctuated<Expr, Token![,]> = content.parse_terminated(Expr::parse)?;

    Ok(exprs.into_iter().collect())
}
