//! Recipe domain model.
//!
//! # Responsibility
//! - Define the canonical recipe record stored in the corpus.
//! - Convert untyped batch candidates into recipes one at a time, so a single
//!   malformed candidate can be rejected without failing its batch.
//!
//! # Invariants
//! - `id` is stable across runs and never blank.
//! - Descriptive fields beyond `id/title/category/nutrition` are opaque and
//!   round-trip in their original key order.

use crate::model::nutrition::NutritionRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable recipe identifier, unique within a corpus.
pub type RecipeId = String;

/// Reasons a batch candidate cannot become a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeValidationError {
    /// Candidate is not a JSON object.
    NotAnObject,
    /// Candidate has no `id` key.
    MissingId,
    /// Candidate `id` is empty or whitespace only.
    BlankId,
    /// A known field has the wrong shape.
    InvalidField { field: &'static str, message: String },
}

impl Display for RecipeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "recipe candidate must be a JSON object"),
            Self::MissingId => write!(f, "recipe candidate has no `id`"),
            Self::BlankId => write!(f, "recipe `id` must not be blank"),
            Self::InvalidField { field, message } => {
                write!(f, "invalid recipe field `{field}`: {message}")
            }
        }
    }
}

impl Error for RecipeValidationError {}

/// Canonical corpus record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<NutritionRecord>,
    /// Source-specific descriptive fields (ingredients, steps, yield, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recipe {
    /// Creates a recipe with no nutrition data and no descriptive fields.
    pub fn new(
        id: impl Into<RecipeId>,
        title: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            nutrition: None,
            extra: Map::new(),
        }
    }

    /// Converts one untyped batch candidate into a validated recipe.
    ///
    /// # Errors
    /// - `NotAnObject` / `MissingId` / `BlankId` for identity problems.
    /// - `InvalidField` when `id`, `title`, `category` or `nutrition` has the
    ///   wrong shape.
    pub fn from_candidate(candidate: Value) -> Result<Self, RecipeValidationError> {
        let Value::Object(map) = candidate else {
            return Err(RecipeValidationError::NotAnObject);
        };

        match map.get("id") {
            None => return Err(RecipeValidationError::MissingId),
            Some(Value::String(_)) => {}
            Some(other) => {
                return Err(RecipeValidationError::InvalidField {
                    field: "id",
                    message: format!("expected string, got {}", json_kind(other)),
                });
            }
        }
        for field in ["title", "category"] {
            if !matches!(map.get(field), Some(Value::String(_))) {
                return Err(RecipeValidationError::InvalidField {
                    field,
                    message: "expected string".to_string(),
                });
            }
        }

        let recipe: Recipe = serde_json::from_value(Value::Object(map)).map_err(|err| {
            RecipeValidationError::InvalidField {
                field: "nutrition",
                message: err.to_string(),
            }
        })?;
        recipe.validate()?;
        Ok(recipe)
    }

    /// Validates identity invariants.
    pub fn validate(&self) -> Result<(), RecipeValidationError> {
        if self.id.trim().is_empty() {
            return Err(RecipeValidationError::BlankId);
        }
        Ok(())
    }

    /// Returns whether nutrition facts are already frozen for this recipe.
    pub fn has_complete_nutrition(&self) -> bool {
        self.nutrition
            .as_ref()
            .is_some_and(NutritionRecord::is_complete)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
