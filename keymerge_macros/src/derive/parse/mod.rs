//! Parsing utilities for the `KeyMerge` derive macro.
//!
//! Attribute parsing is strict: unknown `#[keymerge(...)]` keys and repeated
//! keys are rejected so a misspelt rule never silently falls back to the
//! default merge behaviour.

use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr};

mod input;
mod serde_attrs;
#[cfg(test)]
mod tests;
mod type_utils;

pub(crate) use input::{KeyMergeInput, ParsedField, parse_input};
pub(crate) use serde_attrs::{serde_document_field_key, serde_rename_all};
pub(crate) use type_utils::{is_collection, nested_target};

#[derive(Default, Clone)]
pub(crate) struct StructAttrs {
    /// Overrides the generated crate path for dependency aliasing.
    ///
    /// When set via `#[keymerge(crate = "my_alias")]`, generated code
    /// references types through `my_alias::` instead of `::keymerge::`.
    pub crate_path: Option<syn::Path>,
}

/// Field-level attributes recognised by `#[derive(KeyMerge)]`.
#[derive(Default, Clone)]
pub(crate) struct FieldAttrs {
    pub primary: bool,
    pub nested: bool,
    pub scalar_mode: Option<ScalarModeAttr>,
    pub dupe_mode: Option<DupeModeAttr>,
    pub field_name: Option<LitStr>,
}

impl FieldAttrs {
    /// Whether the field needs a child node in the generated rules.
    pub(crate) const fn has_rules(&self) -> bool {
        self.nested || self.scalar_mode.is_some() || self.dupe_mode.is_some()
    }
}

/// `mode = "..."` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScalarModeAttr {
    Concat,
    Dedup,
    Replace,
}

impl ScalarModeAttr {
    pub(crate) fn parse(s: &str, span: Span) -> Result<Self, syn::Error> {
        match s {
            "concat" => Ok(Self::Concat),
            "dedup" => Ok(Self::Dedup),
            "replace" => Ok(Self::Replace),
            _ => Err(syn::Error::new(
                span,
                format!(
                    "unknown mode '{s}'; expected one of \"concat\", \"dedup\", or \"replace\""
                ),
            )),
        }
    }

    /// Name of the matching `ScalarMode` variant.
    pub(crate) const fn variant(self) -> &'static str {
        match self {
            Self::Concat => "Concat",
            Self::Dedup => "Dedup",
            Self::Replace => "Replace",
        }
    }
}

/// `dupe = "..."` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DupeModeAttr {
    Unique,
    Consolidate,
}

impl DupeModeAttr {
    pub(crate) fn parse(s: &str, span: Span) -> Result<Self, syn::Error> {
        match s {
            "unique" => Ok(Self::Unique),
            "consolidate" => Ok(Self::Consolidate),
            _ => Err(syn::Error::new(
                span,
                format!("unknown dupe '{s}'; expected one of \"unique\" or \"consolidate\""),
            )),
        }
    }

    /// Name of the matching `DupeMode` variant.
    pub(crate) const fn variant(self) -> &'static str {
        match self {
            Self::Unique => "Unique",
            Self::Consolidate => "Consolidate",
        }
    }
}

/// Iterate all `#[keymerge(...)]` attributes once and apply a callback.
fn parse_keymerge<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("keymerge")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

/// Consumes an unrecognised key-value or list without recording it.
///
/// Only used for foreign attributes such as `#[serde(...)]`.
fn discard_unknown(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    let value = meta.value()?;
    value
        .parse::<LitStr>()
        .map_err(|e| syn::Error::new(e.span(), format!("{key} must be a string literal")))
}

fn unknown_key(meta: &ParseNestedMeta, expected: &str) -> syn::Error {
    let name = meta
        .path
        .get_ident()
        .map_or_else(|| String::from("<path>"), ToString::to_string);
    meta.error(format!(
        "unknown keymerge attribute '{name}'; expected one of {expected}"
    ))
}

fn repeated(meta: &ParseNestedMeta, key: &str) -> syn::Error {
    meta.error(format!("duplicate keymerge attribute '{key}'"))
}

/// Extracts `#[keymerge(...)]` metadata applied to a struct.
pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> Result<StructAttrs, syn::Error> {
    let mut out = StructAttrs::default();
    parse_keymerge(attrs, |meta| {
        if !meta.path.is_ident("crate") {
            return Err(unknown_key(meta, "\"crate\""));
        }
        if out.crate_path.is_some() {
            return Err(repeated(meta, "crate"));
        }
        let s = lit_str(meta, "crate")?;
        let path: syn::Path =
            syn::parse_str(&s.value()).map_err(|e| syn::Error::new(s.span(), e))?;
        out.crate_path = Some(path);
        Ok(())
    })?;
    Ok(out)
}

fn apply_field_attr(meta: &ParseNestedMeta, out: &mut FieldAttrs) -> syn::Result<()> {
    let key = meta
        .path
        .get_ident()
        .map(ToString::to_string)
        .unwrap_or_default();
    match key.as_str() {
        "primary" => {
            if out.primary {
                return Err(repeated(meta, "primary"));
            }
            out.primary = true;
        }
        "nested" => {
            if out.nested {
                return Err(repeated(meta, "nested"));
            }
            out.nested = true;
        }
        "mode" => {
            if out.scalar_mode.is_some() {
                return Err(repeated(meta, "mode"));
            }
            let s = lit_str(meta, "mode")?;
            out.scalar_mode = Some(ScalarModeAttr::parse(&s.value(), s.span())?);
        }
        "dupe" => {
            if out.dupe_mode.is_some() {
                return Err(repeated(meta, "dupe"));
            }
            let s = lit_str(meta, "dupe")?;
            out.dupe_mode = Some(DupeModeAttr::parse(&s.value(), s.span())?);
        }
        "field" => {
            if out.field_name.is_some() {
                return Err(repeated(meta, "field"));
            }
            let s = lit_str(meta, "field")?;
            if s.value().is_empty() {
                return Err(syn::Error::new(s.span(), "field name must not be empty"));
            }
            out.field_name = Some(s);
        }
        _ => {
            return Err(unknown_key(
                meta,
                "\"primary\", \"nested\", \"mode\", \"dupe\", or \"field\"",
            ));
        }
    }
    Ok(())
}

/// Parses field-level `#[keymerge(...)]` attributes.
///
/// Rejects `primary` on collection-typed fields and in combination with
/// `nested`, since a primary key must be a scalar.
pub(crate) fn parse_field_attrs(field: &syn::Field) -> Result<FieldAttrs, syn::Error> {
    let mut out = FieldAttrs::default();
    parse_keymerge(&field.attrs, |meta| apply_field_attr(meta, &mut out))?;
    if out.primary && out.nested {
        return Err(syn::Error::new_spanned(
            field,
            "`primary` and `nested` cannot be combined; primary keys must be scalars",
        ));
    }
    if out.primary && is_collection(&field.ty) {
        return Err(syn::Error::new_spanned(
            &field.ty,
            "`primary` requires a scalar field; collections cannot act as keys",
        ));
    }
    Ok(out)
}
