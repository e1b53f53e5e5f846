//! Input parsing for the `KeyMerge` derive macro.
//!
//! This module gathers the struct identifier, generics, fields, and attribute
//! metadata in one pass so macro expansion can fail fast with useful errors.

use std::collections::BTreeSet;

use syn::{Data, DeriveInput, Fields, Generics, Type};

use super::{
    FieldAttrs, StructAttrs, parse_field_attrs, parse_struct_attrs, serde_document_field_key,
    serde_rename_all,
};

/// A named field with its resolved document name.
pub(crate) struct ParsedField {
    pub name: String,
    pub ty: Type,
    pub attrs: FieldAttrs,
}

/// Everything code generation needs from the derive input.
pub(crate) struct KeyMergeInput {
    pub ident: syn::Ident,
    pub generics: Generics,
    pub struct_attrs: StructAttrs,
    pub fields: Vec<ParsedField>,
}

/// Gathers information from the user-provided struct.
///
/// Document names resolve in this order: `#[keymerge(field = "...")]`, then
/// `#[serde(rename = "...")]`, then the struct's `rename_all` rule applied to
/// the identifier. Two fields resolving to the same name are rejected.
pub(crate) fn parse_input(input: &DeriveInput) -> Result<KeyMergeInput, syn::Error> {
    let struct_attrs = parse_struct_attrs(&input.attrs)?;
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "KeyMerge requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "KeyMerge can only be derived for structs",
            ));
        }
    };

    let rename_all = serde_rename_all(&input.attrs)?;
    let mut seen = BTreeSet::new();
    let mut fields = Vec::with_capacity(named.len());
    for field in named {
        let attrs = parse_field_attrs(field)?;
        let name = match &attrs.field_name {
            Some(lit) => lit.value(),
            None => serde_document_field_key(field, rename_all)?,
        };
        if !seen.insert(name.clone()) {
            return Err(syn::Error::new_spanned(
                field,
                format!("duplicate document field name '{name}'"),
            ));
        }
        fields.push(ParsedField {
            name,
            ty: field.ty.clone(),
            attrs,
        });
    }

    Ok(KeyMergeInput {
        ident: input.ident.clone(),
        generics: input.generics.clone(),
        struct_attrs,
        fields,
    })
}
