//! Code generation for the `KeyMerge` implementation.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::Ident;

use super::parse::{KeyMergeInput, ParsedField, nested_target};

/// Builder call registering the rules of one field, if it has any.
fn field_rules(field: &ParsedField, krate: &TokenStream) -> Option<TokenStream> {
    let attrs = &field.attrs;
    if !attrs.has_rules() {
        return None;
    }
    let name = &field.name;
    let base = if attrs.nested {
        let target = nested_target(&field.ty);
        quote! { <#target as #krate::KeyMerge>::merge_rules() }
    } else {
        quote! { #krate::FieldRules::new() }
    };
    let scalar = attrs.scalar_mode.map(|mode| {
        let variant = Ident::new(mode.variant(), Span::call_site());
        quote! { .with_scalar_mode(#krate::ScalarMode::#variant) }
    });
    let dupe = attrs.dupe_mode.map(|mode| {
        let variant = Ident::new(mode.variant(), Span::call_site());
        quote! { .with_dupe_mode(#krate::DupeMode::#variant) }
    });
    Some(quote! { .with_field(#name, #base #scalar #dupe) })
}

/// Emit `impl KeyMerge for <struct>`.
pub(crate) fn key_merge_impl(input: &KeyMergeInput, krate: &TokenStream) -> TokenStream {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let primary: Vec<&str> = input
        .fields
        .iter()
        .filter(|field| field.attrs.primary)
        .map(|field| field.name.as_str())
        .collect();
    let primary_call = (!primary.is_empty()).then(|| {
        quote! { .with_primary_keys([#(#primary),*]) }
    });
    let fields = input
        .fields
        .iter()
        .filter_map(|field| field_rules(field, krate));

    quote! {
        impl #impl_generics #krate::KeyMerge for #ident #ty_generics #where_clause {
            fn merge_rules() -> #krate::FieldRules {
                #krate::FieldRules::new()
                    #primary_call
                    #(#fields)*
            }
        }
    }
}
