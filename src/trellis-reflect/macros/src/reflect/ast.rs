use syn::{
    ext::IdentExt,
    punctuated::Punctuated, Data, DataStruct, DeriveInput, Error, Expr, Generics, Ident, Path,
    Result, Type,
};

use super::attrs::{self, Attrs};

pub struct Struct<'a> {
    pub original: &'a DeriveInput,
    pub attrs: Attrs<'a>,
    pub ident: Ident,
    pub generics: &'a Generics,
    pub fields: Vec<Field<'a>>,
}

pub struct Field<'a> {
    pub original: &'a syn::Field,
    pub attrs: Attrs<'a>,
    pub ident: Ident,
    pub ty: &'a Type,
}

impl<'a> Struct<'a> {
    pub fn from_syn(node: &'a DeriveInput) -> Result<Self> {
        match &node.data {
            Data::Struct(data) => Self::from_struct(node, data),
            Data::Enum(_) | Data::Union(_) => Err(Error::new_spanned(
                node,
                "only structs with named fields can be reflected",
            )),
        }
    }

    fn from_struct(node: &'a DeriveInput, data: &'a DataStruct) -> Result<Self> {
        Ok(Self {
            original: node,
            attrs: attrs::get(&node.attrs)?,
            ident: node.ident.clone(),
            generics: &node.generics,
            fields: Field::multiple_from_syn(&data.fields)?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.generics.params.is_empty() || self.generics.where_clause.is_some() {
            return Err(Error::new_spanned(
                self.generics,
                "generic types cannot be reflected",
            ));
        }

        require_no_field(&self.attrs)?;

        for field in &self.fields {
            field.validate()?;
        }

        let mut bases = self.fields.iter().filter(|f| f.is_base());
        bases.next();
        if let Some(extra) = bases.next() {
            return Err(Error::new_spanned(
                extra.original,
                "only one #[field(base)] allowed per type",
            ));
        }

        Ok(())
    }

    pub fn name(&self) -> String {
        self.attrs
            .reflect
            .as_ref()
            .and_then(|r| r.name())
            .unwrap_or_else(|| self.ident.unraw().to_string())
    }

    pub fn krate(&self) -> Option<&Path> {
        self.attrs.reflect.as_ref().and_then(|r| r.krate.as_ref())
    }

    pub fn is_constructible(&self) -> bool {
        !self
            .attrs
            .reflect
            .as_ref()
            .map(|r| r.no_default)
            .unwrap_or(false)
    }

    pub fn attributes(&self) -> &[Expr] {
        self.attrs
            .reflect
            .as_ref()
            .map(|r| r.attributes.as_slice())
            .unwrap_or_default()
    }

    pub fn base(&self) -> Option<&Field<'a>> {
        self.fields.iter().find(|f| f.is_base())
    }

    /// Fields exposed in the field list, in declaration order.
    pub fn reflected_fields(&self) -> impl Iterator<Item = &Field<'a>> {
        self.fields
            .iter()
            .filter(|f| f.attrs.field.is_some() && !f.is_base())
    }
}

impl<'a> Field<'a> {
    fn from_syn(node: &'a syn::Field) -> Result<Self> {
        Ok(Self {
            original: node,
            attrs: attrs::get(&node.attrs)?,
            ident: node.ident.clone().ok_or_else(|| {
                Error::new_spanned(node, "tuple struct fields cannot be reflected")
            })?,
            ty: &node.ty,
        })
    }

    fn multiple_from_syn(fields: &'a syn::Fields) -> Result<Vec<Self>> {
        fields.iter().map(Field::from_syn).collect()
    }

    fn validate(&self) -> Result<()> {
        require_no_reflect(&self.attrs)?;

        match &self.attrs.field {
            Some(field) if field.base && (field.has_name() || !field.attributes.is_empty()) => {
                Err(Error::new_spanned(
                    field.original,
                    "#[field(base)] cannot be combined with a name or attributes",
                ))
            }
            _ => Ok(()),
        }
    }

    pub fn is_base(&self) -> bool {
        // If this field has a `#[field(base)]` attribute configured,
        // it embeds the base object of the containing type.
        self.attrs.field.as_ref().map(|f| f.base).unwrap_or(false)
    }

    pub fn name(&self) -> String {
        self.attrs
            .field
            .as_ref()
            .and_then(|f| f.name())
            .unwrap_or_else(|| self.ident.unraw().to_string())
    }

    pub fn attributes(&self) -> &[Expr] {
        self.attrs
            .field
            .as_ref()
            .map(|f| f.attributes.as_slice())
            .unwrap_or_default()
    }
}

/// Infers the type of an attribute from its value expression.
///
/// - `Ty { .. }` and `Ty(..)` are of type `Ty`
///
/// - `Ty::new(..)` is of type `Ty` (lowercase last segment)
///
/// - a plain path `Ty` names a unit struct
pub fn attribute_type(expr: &Expr) -> Result<Path> {
    match expr {
        Expr::Struct(expr) => Ok(expr.path.clone()),
        Expr::Path(expr) if expr.qself.is_none() => Ok(expr.path.clone()),
        Expr::Call(call) => match &*call.func {
            Expr::Path(func) if func.qself.is_none() => {
                let path = &func.path;
                let constructor = path
                    .segments
                    .last()
                    .map(|s| s.ident.to_string().starts_with(char::is_lowercase))
                    .unwrap_or(false);

                if constructor && path.segments.len() > 1 {
                    let count = path.segments.len() - 1;
                    let segments: Punctuated<_, _> =
                        path.segments.iter().take(count).cloned().collect();
                    Ok(Path {
                        leading_colon: path.leading_colon,
                        segments,
                    })
                } else {
                    Ok(path.clone())
                }
            }
            _ => Err(unknown_attribute_type(expr)),
        },
        Expr::Paren(expr) => attribute_type(&expr.expr),
        _ => Err(unknown_attribute_type(expr)),
    }
}

fn unknown_attribute_type(expr: &Expr) -> Error {
    Error::new_spanned(
        expr,
        "cannot infer the attribute type; use a struct literal, a unit struct or `Type::constructor(..)`",
    )
}

fn require_no_reflect(attrs: &Attrs<'_>) -> Result<()> {
    if let Some(reflect) = &attrs.reflect {
        return Err(Error::new_spanned(
            reflect.original,
            "unexpected #[reflect] attribute only allowed on structs",
        ));
    }
    Ok(())
}

fn require_no_field(attrs: &Attrs<'_>) -> Result<()> {
    if let Some(field) = &attrs.field {
        return Err(Error::new_spanned(
            field.original,
            "unexpected #[field] attribute only allowed on struct fields",
        ));
    }
    Ok(())
}
