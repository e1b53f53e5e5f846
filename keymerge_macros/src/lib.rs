//! Procedural macros for `keymerge`.
//!
//! `#[derive(KeyMerge)]` reads `#[keymerge(...)]` field attributes and emits
//! an implementation of `keymerge::KeyMerge` returning the corresponding
//! `FieldRules` tree. Field names follow serde, honouring
//! `#[serde(rename = "...")]` and `#[serde(rename_all = "...")]`.
//!
//! Field attributes:
//!
//! - `primary` marks the field as (part of) the key identifying values of
//!   this struct inside a list. Several `primary` fields form a composite key
//!   in declaration order.
//! - `mode = "concat" | "dedup" | "replace"` sets the scalar list mode of
//!   the field.
//! - `dupe = "unique" | "consolidate"` sets duplicate handling of the field.
//! - `field = "name"` overrides the document field name.
//! - `nested` pulls in the rules of the field's type, looking through `Vec`,
//!   `Option` and `Box`. That type must implement `KeyMerge` too.
//!
//! The struct attribute `#[keymerge(crate = "path")]` points generated code
//! at a renamed dependency.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive `keymerge::KeyMerge` from `#[keymerge(...)]` field attributes.
#[proc_macro_derive(KeyMerge, attributes(keymerge))]
pub fn derive_key_merge(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
