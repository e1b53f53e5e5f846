use super::*;
use crate::{DupeMode, FieldRules, ScalarMode};
use anyhow::{Result, ensure};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case::concat(ScalarMode::Concat, json!(["a", "b", "a", "c"]))]
#[case::dedup(ScalarMode::Dedup, json!(["a", "b", "c"]))]
#[case::replace(ScalarMode::Replace, json!(["a", "c"]))]
fn scalar_modes(#[case] mode: ScalarMode, #[case] expected: Value) -> Result<()> {
    let merged = merge_with(
        MergeOptions::new().with_scalar_mode(mode),
        vec![json!({"tags": ["a", "b"]}), json!({"tags": ["a", "c"]})],
    )?;
    ensure!(merged == json!({"tags": expected}), "got {merged}");
    Ok(())
}

#[test]
fn empty_overlay_keeps_base_list() -> Result<()> {
    let merged = merge_with(
        MergeOptions::new().with_scalar_mode(ScalarMode::Replace),
        vec![json!(["a", "b"]), json!([])],
    )?;
    ensure!(merged == json!(["a", "b"]), "got {merged}");
    Ok(())
}

#[test]
fn keyed_items_merge_in_place() -> Result<()> {
    let merged = merge_with(
        keyed_options(),
        vec![
            json!({"users": [{"name": "alice", "role": "user"}, {"name": "bob", "role": "user"}]}),
            json!({"users": [{"name": "bob", "role": "admin"}, {"name": "carol"}]}),
        ],
    )?;
    ensure!(
        merged
            == json!({"users": [
                {"name": "alice", "role": "user"},
                {"name": "bob", "role": "admin"},
                {"name": "carol"}
            ]}),
        "got {merged}"
    );
    Ok(())
}

#[test]
fn key_is_discovered_from_later_overlay_items() -> Result<()> {
    let merged = merge_with(
        keyed_options(),
        vec![
            json!([{"id": 1, "v": "a"}]),
            json!(["loose", {"id": 1, "v": "b"}]),
        ],
    )?;
    ensure!(merged == json!([{"id": 1, "v": "b"}, "loose"]), "got {merged}");
    Ok(())
}

#[test]
fn first_candidate_present_on_overlay_wins() -> Result<()> {
    // `name` is absent on the overlay item, so `id` keys the whole list and
    // base items without an `id` stay unmatched.
    let merged = merge_with(
        keyed_options(),
        vec![
            json!([{"name": "a", "id": 1, "x": 1}, {"name": "b"}]),
            json!([{"id": 1, "y": 2}]),
        ],
    )?;
    ensure!(
        merged == json!([{"name": "a", "id": 1, "x": 1, "y": 2}, {"name": "b"}]),
        "got {merged}"
    );
    Ok(())
}

#[test]
fn keyless_items_append_in_keyed_lists() -> Result<()> {
    let merged = merge_with(
        keyed_options(),
        vec![
            json!([{"note": "base"}, {"id": 1}]),
            json!([{"note": "overlay"}, {"id": 1, "ok": true}, 7]),
        ],
    )?;
    ensure!(
        merged == json!([{"note": "base"}, {"id": 1, "ok": true}, {"note": "overlay"}, 7]),
        "got {merged}"
    );
    Ok(())
}

#[test]
fn nested_keyed_lists_merge_recursively() -> Result<()> {
    let merged = merge_with(
        keyed_options(),
        vec![
            json!({"teams": [{"name": "core", "members": [{"name": "ann", "level": 1}]}]}),
            json!({"teams": [{"name": "core", "members": [{"name": "ann", "level": 2}, {"name": "ben"}]}]}),
        ],
    )?;
    ensure!(
        merged
            == json!({"teams": [{"name": "core", "members": [
                {"name": "ann", "level": 2},
                {"name": "ben"}
            ]}]}),
        "got {merged}"
    );
    Ok(())
}

#[test]
fn consolidate_folds_duplicates_into_first_position() -> Result<()> {
    let merged = merge_with(
        keyed_options().with_dupe_mode(DupeMode::Consolidate),
        vec![
            json!({"users": [
                {"id": "alice", "role": "user", "dept": "eng"},
                {"id": "bob", "role": "admin"},
                {"id": "alice", "role": "manager", "team": "platform"}
            ]}),
            json!({"users": [{"id": "alice", "active": true}]}),
        ],
    )?;
    ensure!(
        merged
            == json!({"users": [
                {"id": "alice", "role": "manager", "dept": "eng", "team": "platform", "active": true},
                {"id": "bob", "role": "admin"}
            ]}),
        "got {merged}"
    );
    Ok(())
}

#[test]
fn field_dupe_override_beats_global_mode() -> Result<()> {
    let rules = FieldRules::new().with_field(
        "relaxed",
        FieldRules::new().with_dupe_mode(DupeMode::Consolidate),
    );
    let options = keyed_options().with_rules(rules);
    let items = json!([{"id": "a", "v": 1}, {"id": "b"}, {"id": "a", "v": 2}]);

    let merged = merge_with(
        options.clone(),
        vec![
            json!({"relaxed": items.clone(), "strict": [{"id": "a"}]}),
            json!({"relaxed": [{"id": "b"}], "strict": [{"id": "a"}]}),
        ],
    )?;
    ensure!(
        merged
            == json!({
                "relaxed": [{"id": "a", "v": 2}, {"id": "b"}],
                "strict": [{"id": "a"}]
            }),
        "got {merged}"
    );

    let err = merge_with(
        options,
        vec![json!({"strict": items}), json!({"strict": [{"id": "b"}]})],
    )
    .err()
    .ok_or_else(|| anyhow::anyhow!("strict list must reject the repeated key"))?;
    ensure!(
        matches!(err, crate::KeymergeError::DuplicateKey { .. }),
        "unexpected error: {err}"
    );
    ensure!(
        err.path().map(ToString::to_string).as_deref() == Some("strict.2"),
        "path {:?}",
        err.path()
    );
    Ok(())
}

#[test]
fn first_document_is_taken_verbatim() -> Result<()> {
    // Duplicates only surface once a later document merges into the list.
    let doc = json!([{"id": 1}, {"id": 1}]);
    let merged = merge_with(keyed_options(), vec![doc.clone()])?;
    ensure!(merged == doc, "got {merged}");
    Ok(())
}

#[test]
fn consolidate_applies_within_overlay_too() -> Result<()> {
    let merged = merge_with(
        keyed_options().with_dupe_mode(DupeMode::Consolidate),
        vec![
            json!([{"name": "a", "v": 0}]),
            json!([{"name": "b", "v": 1}, {"name": "b", "w": 2}]),
        ],
    )?;
    ensure!(
        merged == json!([{"name": "a", "v": 0}, {"name": "b", "v": 1, "w": 2}]),
        "got {merged}"
    );
    Ok(())
}

#[test]
fn composite_keys_need_every_component() -> Result<()> {
    let rules = FieldRules::new().with_field(
        "services",
        FieldRules::new().with_primary_keys(["region", "name"]),
    );
    let merged = merge_with(
        MergeOptions::new().with_rules(rules),
        vec![
            json!({"services": [
                {"region": "eu", "name": "api", "replicas": 1},
                {"region": "us", "name": "api", "replicas": 1}
            ]}),
            json!({"services": [
                {"region": "us", "name": "api", "replicas": 3},
                {"name": "api", "replicas": 9}
            ]}),
        ],
    )?;
    ensure!(
        merged
            == json!({"services": [
                {"region": "eu", "name": "api", "replicas": 1},
                {"region": "us", "name": "api", "replicas": 3},
                {"name": "api", "replicas": 9}
            ]}),
        "got {merged}"
    );
    Ok(())
}

#[test]
fn declared_keys_override_candidates() -> Result<()> {
    let rules = FieldRules::new().with_field("hosts", FieldRules::new().with_primary_keys(["addr"]));
    let merged = merge_with(
        keyed_options().with_rules(rules),
        vec![
            json!({"hosts": [{"name": "x", "addr": "10.0.0.1"}]}),
            json!({"hosts": [{"name": "y", "addr": "10.0.0.1"}]}),
        ],
    )?;
    ensure!(
        merged == json!({"hosts": [{"name": "y", "addr": "10.0.0.1"}]}),
        "got {merged}"
    );
    Ok(())
}

#[test]
fn field_rules_override_modes_locally() -> Result<()> {
    let mut rules = FieldRules::new();
    rules.insert_directives("a", "mode=dedup")?;
    rules.insert_directives("a.b", "mode=replace")?;
    let merged = merge_with(
        MergeOptions::new().with_rules(rules),
        vec![
            json!({"a": {"b": [1, 2], "c": [1]}, "top": [1]}),
            json!({"a": {"b": [3], "c": [1]}, "top": [1]}),
        ],
    )?;
    // `a.c` has no rule of its own, so it falls back to the global concat.
    ensure!(
        merged == json!({"a": {"b": [3], "c": [1, 1]}, "top": [1, 1]}),
        "got {merged}"
    );
    Ok(())
}

#[test]
fn list_item_rules_use_the_list_node() -> Result<()> {
    let mut rules = FieldRules::new();
    rules.insert_directives("groups", "key=gid")?;
    rules.insert_directives("groups.members", "key=uid,mode=dedup")?;
    let merged = merge_with(
        MergeOptions::new().with_rules(rules),
        vec![
            json!({"groups": [{"gid": 1, "members": [{"uid": 7, "n": 1}], "tags": ["x"]}]}),
            json!({"groups": [{"gid": 1, "members": [{"uid": 7, "n": 2}], "tags": ["x"]}]}),
        ],
    )?;
    ensure!(
        merged
            == json!({"groups": [{"gid": 1, "members": [{"uid": 7, "n": 2}], "tags": ["x", "x"]}]}),
        "got {merged}"
    );
    Ok(())
}

#[test]
fn null_items_are_preserved() -> Result<()> {
    let merged = merge_with(
        keyed_options(),
        vec![json!([null, {"id": 1}]), json!([{"id": 2}, null])],
    )?;
    ensure!(merged == json!([null, {"id": 1}, {"id": 2}, null]), "got {merged}");
    Ok(())
}
