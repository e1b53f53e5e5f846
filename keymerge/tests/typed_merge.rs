//! Tests for merging into typed configuration structs.

#![cfg(feature = "derive")]

use anyhow::{Result, ensure};
use keymerge::{KeyMerge, KeymergeError, MergeOptions, TypedMerger};
use rstest::{fixture, rstest};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize, KeyMerge, PartialEq)]
struct Upstream {
    #[keymerge(primary)]
    name: String,
    #[serde(default)]
    weight: u32,
    #[serde(default)]
    #[keymerge(mode = "dedup")]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize, KeyMerge, PartialEq)]
struct Proxy {
    listen: String,
    #[keymerge(nested)]
    upstreams: Vec<Upstream>,
}

#[fixture]
fn merger() -> TypedMerger<Proxy> {
    TypedMerger::new(MergeOptions::new().with_delete_marker("_delete")).expect("valid rules")
}

fn upstream(name: &str, weight: u32, tags: &[&str]) -> Upstream {
    Upstream {
        name: name.to_owned(),
        weight,
        tags: tags.iter().map(|&tag| tag.to_owned()).collect(),
    }
}

#[rstest]
fn overlays_amend_upstreams_by_name(merger: TypedMerger<Proxy>) -> Result<()> {
    let base = json!({
        "listen": "0.0.0.0:80",
        "upstreams": [
            {"name": "api", "weight": 1, "tags": ["blue"]},
            {"name": "web", "weight": 1}
        ]
    });
    let overlay = json!({
        "listen": "0.0.0.0:8080",
        "upstreams": [
            {"name": "web", "_delete": true},
            {"name": "api", "weight": 5, "tags": ["blue", "canary"]},
            {"name": "batch"}
        ]
    });
    let proxy = merger.merge_into([base, overlay])?;
    ensure!(proxy.listen == "0.0.0.0:8080", "listen {}", proxy.listen);
    ensure!(
        proxy.upstreams == [upstream("api", 5, &["blue", "canary"]), upstream("batch", 0, &[])],
        "upstreams {:?}",
        proxy.upstreams
    );
    Ok(())
}

#[rstest]
fn option_rules_are_replaced_by_derived_rules() -> Result<()> {
    let options = MergeOptions::new()
        .with_primary_keys(["id"])
        .with_rules(keymerge::FieldRules::new().with_field(
            "upstreams",
            keymerge::FieldRules::new().with_primary_keys(["weight"]),
        ));
    let merger = TypedMerger::<Proxy>::new(options)?;
    let upstreams = merger
        .merger()
        .options()
        .rules()
        .get("upstreams")
        .map(keymerge::FieldRules::primary_keys);
    ensure!(
        upstreams == Some(&["name".to_owned()][..]),
        "got {upstreams:?}"
    );
    ensure!(
        merger.merger().options().primary_key_names() == ["id"],
        "global options must survive"
    );
    Ok(())
}

#[rstest]
fn mismatched_documents_fail_to_deserialise(merger: TypedMerger<Proxy>) -> Result<()> {
    let result = merger.merge_into([json!({"listen": 80, "upstreams": []})]);
    ensure!(
        matches!(result, Err(KeymergeError::Deserialize { .. })),
        "unexpected result: {result:?}"
    );
    Ok(())
}

#[rstest]
fn merge_errors_pass_through(merger: TypedMerger<Proxy>) -> Result<()> {
    let base = json!({"listen": "x", "upstreams": []});
    let overlay = json!({"upstreams": [{"name": "a"}, {"name": "a"}]});
    let result = merger.merge_into([base, overlay]);
    ensure!(
        matches!(result, Err(KeymergeError::DuplicateKey { .. })),
        "unexpected result: {result:?}"
    );
    Ok(())
}

#[rstest]
fn derived_rules_are_visible_on_the_type() {
    let rules = Proxy::merge_rules();
    assert_eq!(
        rules.get("upstreams.tags").and_then(keymerge::FieldRules::scalar_mode),
        Some(keymerge::ScalarMode::Dedup)
    );
}
