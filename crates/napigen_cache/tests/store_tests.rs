use std::fs;

use anyhow::Result;
use napigen_cache::{ClassDiff, SnapshotChange, SnapshotStore, StoredSnapshot};
use napigen_model::{ApiArgument, ApiClass, ApiFunction, ApiModel, ClassKind, OrderedMap};

fn model_with(function_name: &str) -> ApiModel {
    model_of("DebugDraw3D", function_name)
}

fn model_of(class_name: &str, function_name: &str) -> ApiModel {
    let mut class = ApiClass::new(class_name, ClassKind::Singleton, Vec::new());
    class.functions.upsert(ApiFunction {
        key: format!("{class_name}_{function_name}"),
        original_name: function_name.to_string(),
        return_type: "void".to_string(),
        self_return: false,
        arguments: vec![ApiArgument::new("duration", "real_t").with_default("0")],
        docs: Vec::new(),
    });
    let classes: OrderedMap<ApiClass> = std::iter::once(class).collect();
    ApiModel::build(classes).expect("hashable").expect("model")
}

#[test]
fn store_reports_created_then_unchanged_then_changed() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = SnapshotStore::new(dir.path());

    let first = model_with("clear_all");
    assert_eq!(store.store(&first)?, SnapshotChange::Created);
    assert_eq!(store.store(&first)?, SnapshotChange::Unchanged);

    let second = model_with("draw_sphere");
    assert_eq!(
        SnapshotChange::between(store.lookup()?.as_ref(), &second),
        SnapshotChange::Changed {
            previous: first.content_hash().to_string()
        }
    );

    // classifying against a lookup never writes
    let stored = store.lookup()?.expect("snapshot");
    assert_eq!(stored.hash, first.content_hash());
    Ok(())
}

#[test]
fn snapshot_file_has_hash_and_classes() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = SnapshotStore::new(dir.path());
    let model = model_with("clear_all");
    store.store(&model)?;

    let stored = StoredSnapshot::read_from_json(store.path())?;
    assert_eq!(stored.hash, model.content_hash());
    assert_eq!(stored.class_names().collect::<Vec<_>>(), ["DebugDraw3D"]);

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(store.path())?)?;
    let function = &raw["classes"]["DebugDraw3D"]["functions"]["DebugDraw3D_clear_all"];
    assert_eq!(function["args"][0]["default"], "0");
    assert_eq!(raw["classes"]["DebugDraw3D"]["singleton"], true);
    Ok(())
}

#[test]
fn corrupt_snapshot_is_replaced_on_store() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = SnapshotStore::new(dir.path());
    fs::write(store.path(), "{ not json")?;

    assert!(store.lookup().is_err());
    assert_eq!(store.store(&model_with("clear_all"))?, SnapshotChange::Created);
    assert!(store.lookup()?.is_some());
    Ok(())
}

#[test]
fn class_diff_lists_added_and_removed_classes() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = SnapshotStore::new(dir.path());
    store.store(&model_with("clear_all"))?;
    let stored = store.lookup()?.expect("snapshot");

    assert!(stored.class_diff(&model_with("draw_sphere")).is_empty());
    assert_eq!(
        stored.class_diff(&model_of("DebugDraw2D", "clear_all")),
        ClassDiff {
            added: vec!["DebugDraw2D".to_string()],
            removed: vec!["DebugDraw3D".to_string()],
        }
    );
    Ok(())
}
