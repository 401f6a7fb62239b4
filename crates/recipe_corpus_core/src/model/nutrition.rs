//! Nutrition record attached to corpus recipes.
//!
//! # Responsibility
//! - Define the per-serving facts shape authored in reference tables.
//! - Express enrichment state (`missing` / `complete`) on corpus recipes.
//!
//! # Invariants
//! - Corpus-side facts are opaque JSON: unknown keys and `null` values load
//!   and save unchanged, so a complete record round-trips as authored.
//! - Keys this crate does not model are carried in `extra`.
//! - A `complete` record is terminal: enrichment never rewrites it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Enrichment state for a recipe's nutrition data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutritionStatus {
    /// No facts resolved yet.
    Missing,
    /// Facts resolved and frozen.
    Complete,
}

/// Per-serving nutrition facts as authored in a reference table.
///
/// Every field is required and numeric; tables are the only place facts are
/// validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub calories: Number,
    pub fat_g: Number,
    pub protein_g: Number,
    pub carbs_g: Number,
    pub cholesterol_mg: Number,
    pub sodium_mg: Number,
}

impl NutritionFacts {
    /// Wire form written into a corpus record, in canonical key order.
    pub fn to_map(&self) -> Map<String, Value> {
        [
            ("calories", &self.calories),
            ("fat_g", &self.fat_g),
            ("protein_g", &self.protein_g),
            ("carbs_g", &self.carbs_g),
            ("cholesterol_mg", &self.cholesterol_mg),
            ("sodium_mg", &self.sodium_mg),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), Value::Number(value.clone())))
        .collect()
    }
}

/// Nutrition block stored under `recipe.nutrition`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionRecord {
    pub status: NutritionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_serving: Option<Map<String, Value>>,
    /// Provenance of the facts, e.g. the reference table they came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumptions: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NutritionRecord {
    /// Creates a `missing` placeholder record.
    pub fn missing() -> Self {
        Self {
            status: NutritionStatus::Missing,
            per_serving: None,
            source: None,
            assumptions: Some(Vec::new()),
            extra: Map::new(),
        }
    }

    /// Creates a `complete` record from matched facts.
    ///
    /// `assumptions` starts empty: reference-table facts are taken as-is.
    pub fn complete(per_serving: &NutritionFacts, source: impl Into<String>) -> Self {
        Self {
            status: NutritionStatus::Complete,
            per_serving: Some(per_serving.to_map()),
            source: Some(source.into()),
            assumptions: Some(Vec::new()),
            extra: Map::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == NutritionStatus::Complete
    }

    /// Looks up one per-serving fact by key.
    pub fn fact(&self, key: &str) -> Option<&Value> {
        self.per_serving.as_ref()?.get(key)
    }
}
