use recipe_corpus_core::{
    NutritionRecord, NutritionStatus, Recipe, RecipeValidationError,
};
use serde_json::json;

#[test]
fn recipe_serialization_uses_expected_wire_fields() {
    let mut recipe = Recipe::new("caramel-apples", "Caramel Apples", "dessert");
    recipe.extra.insert("yield".to_string(), json!("6 apples"));

    let value = serde_json::to_value(&recipe).unwrap();
    assert_eq!(value["id"], "caramel-apples");
    assert_eq!(value["title"], "Caramel Apples");
    assert_eq!(value["category"], "dessert");
    assert_eq!(value["yield"], "6 apples");
    assert!(value.get("nutrition").is_none());

    recipe.nutrition = Some(NutritionRecord::missing());
    let value = serde_json::to_value(&recipe).unwrap();
    assert_eq!(
        value["nutrition"],
        json!({"status": "missing", "assumptions": []})
    );
}

#[test]
fn complete_nutrition_roundtrips_byte_identically() {
    let raw = r#"{"id":"r1","title":"Fudge","category":"candy","nutrition":{"status":"complete","per_serving":{"calories":439,"fat_g":12.5,"protein_g":3,"carbs_g":80.25,"cholesterol_mg":null,"sodium_mg":105,"fiber_g":4},"source":"desserts table","assumptions":["one square"],"reviewed_by":"pat"},"notes":"cut small"}"#;

    let recipe: Recipe = serde_json::from_str(raw).unwrap();
    assert!(recipe.has_complete_nutrition());
    let nutrition = recipe.nutrition.as_ref().unwrap();
    assert_eq!(nutrition.fact("fiber_g"), Some(&json!(4)));
    assert_eq!(nutrition.extra["reviewed_by"], "pat");
    assert_eq!(serde_json::to_string(&recipe).unwrap(), raw);
}

#[test]
fn from_candidate_accepts_full_records() {
    let recipe = Recipe::from_candidate(json!({
        "id": "soup-1",
        "title": "Tomato Soup",
        "category": "soup",
        "ingredients": ["tomatoes"],
        "nutrition": {"status": "missing"}
    }))
    .unwrap();

    assert_eq!(recipe.id, "soup-1");
    assert_eq!(
        recipe.nutrition.as_ref().map(|record| record.status),
        Some(NutritionStatus::Missing)
    );
    assert!(!recipe.has_complete_nutrition());
    assert_eq!(recipe.extra["ingredients"], json!(["tomatoes"]));
}

#[test]
fn from_candidate_rejects_identity_and_shape_problems() {
    assert_eq!(
        Recipe::from_candidate(json!([1, 2])).unwrap_err(),
        RecipeValidationError::NotAnObject
    );
    assert_eq!(
        Recipe::from_candidate(json!({"title": "t", "category": "c"})).unwrap_err(),
        RecipeValidationError::MissingId
    );
    assert_eq!(
        Recipe::from_candidate(json!({"id": "", "title": "t", "category": "c"})).unwrap_err(),
        RecipeValidationError::BlankId
    );

    let err = Recipe::from_candidate(json!({"id": 7, "title": "t", "category": "c"})).unwrap_err();
    assert!(matches!(
        err,
        RecipeValidationError::InvalidField { field: "id", .. }
    ));

    let err = Recipe::from_candidate(json!({"id": "x", "category": "c"})).unwrap_err();
    assert!(matches!(
        err,
        RecipeValidationError::InvalidField { field: "title", .. }
    ));
}
