//! Expansion of `#[derive(KeyMerge)]`.

use proc_macro2::TokenStream;

mod crate_path;
mod generate;
mod parse;

/// Parse `input` and emit its `KeyMerge` implementation.
pub(crate) fn expand(input: &syn::DeriveInput) -> syn::Result<TokenStream> {
    let parsed = parse::parse_input(input)?;
    let krate = crate_path::resolve(parsed.struct_attrs.crate_path.as_ref());
    Ok(generate::key_merge_impl(&parsed, &krate))
}
