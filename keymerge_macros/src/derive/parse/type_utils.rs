//! Type introspection helpers.
//!
//! These utilities perform shallow inspection of `syn::Type` values to
//! recognise wrapper types such as `Option<T>` and collections such as
//! `Vec<T>` or `BTreeMap<K, V>`.

use syn::{GenericArgument, PathArguments, Type};

/// Collection types whose values cannot act as primary keys.
const COLLECTIONS: &[&str] = &[
    "Vec",
    "VecDeque",
    "LinkedList",
    "HashSet",
    "BTreeSet",
    "HashMap",
    "BTreeMap",
    "IndexMap",
    "IndexSet",
];

/// Extract the first type argument from a `PathArguments` container.
fn extract_first_type_argument(args: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(angle_args) = args else {
        return None;
    };
    let first = angle_args.args.first()?;
    let GenericArgument::Type(inner) = first else {
        return None;
    };
    Some(inner)
}

/// Final path segment of `ty`, looking through references and groups.
fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(p) => p.path.segments.last(),
        Type::Reference(r) => last_segment(&r.elem),
        Type::Group(g) => last_segment(&g.elem),
        Type::Paren(p) => last_segment(&p.elem),
        _ => None,
    }
}

/// Returns the generic parameter if `ty` is the provided wrapper.
///
/// Only the final path segment is compared, so `std::option::Option<T>` and
/// `Option<T>` both match. The check is not recursive.
fn type_inner<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let last = last_segment(ty)?;
    if last.ident != wrapper {
        return None;
    }
    extract_first_type_argument(&last.arguments)
}

/// Returns the inner type if `ty` is `Option<T>`.
pub(crate) fn option_inner(ty: &Type) -> Option<&Type> {
    type_inner(ty, "Option")
}

/// Returns the element type if `ty` is `Vec<T>`.
pub(crate) fn vec_inner(ty: &Type) -> Option<&Type> {
    type_inner(ty, "Vec")
}

/// Returns the inner type if `ty` is `Box<T>`.
pub(crate) fn box_inner(ty: &Type) -> Option<&Type> {
    type_inner(ty, "Box")
}

/// Peel `Option`, `Box` and `Vec` layers until a plain type remains.
///
/// `Option<Vec<Box<Service>>>` yields `Service`.
pub(crate) fn nested_target(ty: &Type) -> &Type {
    let mut current = ty;
    while let Some(inner) = option_inner(current)
        .or_else(|| box_inner(current))
        .or_else(|| vec_inner(current))
    {
        current = inner;
    }
    current
}

/// Returns `true` when `ty` serialises as a list or a map.
///
/// `Option` and `Box` are looked through, so `Option<Vec<u8>>` is a
/// collection while `Option<String>` is not.
pub(crate) fn is_collection(ty: &Type) -> bool {
    if let Some(inner) = option_inner(ty).or_else(|| box_inner(ty)) {
        return is_collection(inner);
    }
    match ty {
        Type::Array(_) | Type::Slice(_) => true,
        Type::Reference(r) => is_collection(&r.elem),
        _ => last_segment(ty).is_some_and(|seg| COLLECTIONS.iter().any(|name| seg.ident == name)),
    }
}
