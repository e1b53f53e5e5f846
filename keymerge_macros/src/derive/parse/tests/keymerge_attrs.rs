//! Tests for `#[keymerge(...)]` parsing behaviour.

use super::super::*;
use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use syn::{DeriveInput, parse_quote};

fn only_field(parsed: &KeyMergeInput) -> Result<&ParsedField> {
    parsed
        .fields
        .first()
        .ok_or_else(|| anyhow!("missing parsed field"))
}

fn parse_error(input: &DeriveInput) -> Result<String> {
    match parse_input(input) {
        Ok(_) => Err(anyhow!("expected parsing to fail")),
        Err(err) => Ok(err.to_string()),
    }
}

#[rstest]
fn field_attributes_are_collected() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Service {
            #[keymerge(nested, mode = "replace", dupe = "consolidate", field = "svc")]
            inner: Vec<Inner>,
        }
    };
    let parsed = parse_input(&input)?;
    let field = only_field(&parsed)?;
    ensure!(field.name == "svc", "field override ignored: {}", field.name);
    ensure!(field.attrs.nested, "nested not parsed");
    ensure!(!field.attrs.primary, "primary set unexpectedly");
    ensure!(
        field.attrs.scalar_mode == Some(ScalarModeAttr::Replace),
        "mode not parsed"
    );
    ensure!(
        field.attrs.dupe_mode == Some(DupeModeAttr::Consolidate),
        "dupe not parsed"
    );
    Ok(())
}

#[rstest]
fn keymerge_field_name_beats_serde_rename() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[serde(rename_all = "kebab-case")]
        struct Service {
            #[serde(rename = "ignored")]
            #[keymerge(primary, field = "service_name")]
            name: String,
            #[keymerge(mode = "dedup")]
            extra_tags: Vec<String>,
        }
    };
    let parsed = parse_input(&input)?;
    let names: Vec<&str> = parsed.fields.iter().map(|f| f.name.as_str()).collect();
    ensure!(names == ["service_name", "extra-tags"], "got {names:?}");
    Ok(())
}

#[rstest]
fn crate_path_is_parsed() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[keymerge(crate = "deps::merge")]
        struct Service {
            id: u32,
        }
    };
    let parsed = parse_input(&input)?;
    let path = parsed
        .struct_attrs
        .crate_path
        .ok_or_else(|| anyhow!("crate path missing"))?;
    ensure!(
        quote::quote!(#path).to_string() == "deps :: merge",
        "unexpected path"
    );
    Ok(())
}

#[rstest]
#[case::unknown_field_key(
    parse_quote! { struct S { #[keymerge(primery)] id: u32 } },
    "unknown keymerge attribute 'primery'"
)]
#[case::unknown_struct_key(
    parse_quote! { #[keymerge(prefix = "X")] struct S { id: u32 } },
    "unknown keymerge attribute 'prefix'"
)]
#[case::repeated_key(
    parse_quote! { struct S { #[keymerge(mode = "dedup", mode = "concat")] tags: Vec<u8> } },
    "duplicate keymerge attribute 'mode'"
)]
#[case::bad_mode(
    parse_quote! { struct S { #[keymerge(mode = "merge")] tags: Vec<u8> } },
    "unknown mode 'merge'"
)]
#[case::bad_dupe(
    parse_quote! { struct S { #[keymerge(dupe = "first")] items: Vec<u8> } },
    "unknown dupe 'first'"
)]
#[case::mode_not_string(
    parse_quote! { struct S { #[keymerge(mode = 3)] tags: Vec<u8> } },
    "mode must be a string literal"
)]
#[case::empty_field_name(
    parse_quote! { struct S { #[keymerge(field = "")] id: u32 } },
    "field name must not be empty"
)]
#[case::primary_collection(
    parse_quote! { struct S { #[keymerge(primary)] ids: Vec<u32> } },
    "`primary` requires a scalar field"
)]
#[case::primary_nested(
    parse_quote! { struct S { #[keymerge(primary, nested)] inner: Inner } },
    "`primary` and `nested` cannot be combined"
)]
#[case::duplicate_names(
    parse_quote! { struct S { #[keymerge(field = "id")] key: u32, id: u32 } },
    "duplicate document field name 'id'"
)]
#[case::tuple_struct(
    parse_quote! { struct S(u32); },
    "KeyMerge requires named fields"
)]
#[case::enum_input(
    parse_quote! { enum S { A } },
    "KeyMerge can only be derived for structs"
)]
fn invalid_input_is_rejected(#[case] input: DeriveInput, #[case] expected: &str) -> Result<()> {
    let message = parse_error(&input)?;
    ensure!(
        message.contains(expected),
        "expected '{expected}' in '{message}'"
    );
    Ok(())
}

#[rstest]
fn fields_without_rules_are_plain() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct S {
            #[keymerge(primary)]
            id: u32,
            note: String,
        }
    };
    let parsed = parse_input(&input)?;
    ensure!(
        parsed.fields.iter().all(|f| !f.attrs.has_rules()),
        "no field declares rules"
    );
    Ok(())
}
