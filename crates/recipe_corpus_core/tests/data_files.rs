use recipe_corpus_core::{
    load_batch, load_nutrition_table, load_nutrition_tables, DataError, NutritionIndex,
};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
    path
}

fn table(name: &str, entries: Value) -> Value {
    json!({
        "format_version": 1,
        "table": name,
        "source": format!("{name} reference"),
        "entries": entries
    })
}

fn facts(calories: u64) -> Value {
    json!({
        "calories": calories,
        "fat_g": 1.5,
        "protein_g": 2,
        "carbs_g": 3,
        "cholesterol_mg": 4,
        "sodium_mg": 5
    })
}

#[test]
fn batch_file_keeps_candidates_untyped_and_ordered() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(
        dir.path(),
        "batch.json",
        &json!({
            "format_version": 1,
            "batch": "grandma's cookbook",
            "recipes": [
                {"id": "g1", "title": "Pound Cake", "category": "cake"},
                {"title": "no id yet"}
            ]
        }),
    );

    let batch = load_batch(&path).unwrap();
    assert_eq!(batch.name, "grandma's cookbook");
    assert_eq!(batch.len(), 2);
    assert_eq!(batch.candidates[0]["id"], "g1");
}

#[test]
fn batch_file_rejects_unknown_version_and_blank_name() {
    let dir = tempfile::tempdir().unwrap();

    let future = write_json(
        dir.path(),
        "future.json",
        &json!({"format_version": 2, "batch": "b", "recipes": []}),
    );
    assert!(matches!(
        load_batch(&future).unwrap_err(),
        DataError::UnsupportedVersion {
            found: 2,
            supported: 1,
            ..
        }
    ));

    let blank = write_json(
        dir.path(),
        "blank.json",
        &json!({"format_version": 1, "batch": "  ", "recipes": []}),
    );
    assert!(matches!(
        load_batch(&blank).unwrap_err(),
        DataError::Invalid { .. }
    ));

    let unknown = write_json(
        dir.path(),
        "unknown.json",
        &json!({"format_version": 1, "batch": "b", "recipes": [], "author": "x"}),
    );
    assert!(matches!(
        load_batch(&unknown).unwrap_err(),
        DataError::Parse { .. }
    ));

    assert!(matches!(
        load_batch(dir.path().join("absent.json")).unwrap_err(),
        DataError::Io { .. }
    ));
}

#[test]
fn nutrition_table_requires_numeric_facts_and_named_entries() {
    let dir = tempfile::tempdir().unwrap();

    let mut bad_facts = facts(100);
    bad_facts["calories"] = json!("lots");
    let non_numeric = write_json(
        dir.path(),
        "non_numeric.json",
        &table("desserts", json!([{"name": "Fudge", "per_serving": bad_facts}])),
    );
    assert!(matches!(
        load_nutrition_table(&non_numeric).unwrap_err(),
        DataError::Parse { .. }
    ));

    let unnamed = write_json(
        dir.path(),
        "unnamed.json",
        &table(
            "desserts",
            json!([
                {"name": "Fudge", "per_serving": facts(100)},
                {"name": " ", "per_serving": facts(200)}
            ]),
        ),
    );
    let err = load_nutrition_table(&unnamed).unwrap_err();
    assert!(err.to_string().contains("entry #1"));
}

#[test]
fn tables_load_in_argument_order_for_last_writer_wins() {
    let dir = tempfile::tempdir().unwrap();
    let desserts = write_json(
        dir.path(),
        "desserts.json",
        &table(
            "desserts",
            json!([
                {"name": "Caramel Apples", "per_serving": facts(439)},
                {"name": "Lemon Bars", "per_serving": facts(210)}
            ]),
        ),
    );
    let snacks = write_json(
        dir.path(),
        "snacks.json",
        &table(
            "snacks",
            json!([{"name": "caramel apples", "per_serving": facts(300)}]),
        ),
    );

    let tables = load_nutrition_tables(&[desserts, snacks][..]).unwrap();
    assert_eq!(tables[0].name, "desserts");
    assert_eq!(tables[1].source, "snacks reference");

    let index = NutritionIndex::build(&tables);
    assert_eq!(index.len(), 2);
    assert_eq!(index.get("caramel apples").unwrap().table, "snacks");
    assert_eq!(index.stats().overridden, 1);
}
