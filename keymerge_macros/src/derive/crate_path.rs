//! Crate path resolution for dependency aliasing support.
//!
//! Converts the optional `#[keymerge(crate = "...")]` attribute value into
//! the tokens that prefix every `keymerge` item in generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// Resolve the crate path from the parsed struct attribute.
///
/// Defaults to `::keymerge` when no override is present.
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { ::keymerge }, |path| quote! { #path })
}
