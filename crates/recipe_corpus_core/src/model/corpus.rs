//! Corpus document model.
//!
//! # Responsibility
//! - Define the single JSON document holding corpus metadata and recipes.
//! - Check the id-uniqueness and count invariants before persistence.
//!
//! # Invariants
//! - The document has exactly two top-level keys: `meta` and `recipes`.
//! - Recipe ids are unique; `meta.total_recipes == recipes.len()`.

use crate::model::recipe::{Recipe, RecipeId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Date format used by `meta.last_updated`.
pub const LAST_UPDATED_FORMAT: &str = "%Y-%m-%d";

/// Corpus-level invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusValidationError {
    /// Two recipes share one id.
    DuplicateId(RecipeId),
    /// `meta.total_recipes` disagrees with the recipe count.
    TotalMismatch { declared: usize, actual: usize },
}

impl Display for CorpusValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate recipe id `{id}`"),
            Self::TotalMismatch { declared, actual } => write!(
                f,
                "meta.total_recipes ({declared}) does not match recipe count ({actual})"
            ),
        }
    }
}

impl Error for CorpusValidationError {}

/// Corpus metadata block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorpusMeta {
    pub total_recipes: usize,
    /// ISO date (`YYYY-MM-DD`) of the last run that changed the corpus.
    pub last_updated: String,
}

/// Canonical recipe corpus document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Corpus {
    pub meta: CorpusMeta,
    pub recipes: Vec<Recipe>,
}

impl Corpus {
    /// Creates an empty corpus stamped with `today`.
    pub fn empty(today: NaiveDate) -> Self {
        Self {
            meta: CorpusMeta {
                total_recipes: 0,
                last_updated: format_last_updated(today),
            },
            recipes: Vec::new(),
        }
    }

    /// Returns the set of recipe ids currently in the corpus.
    pub fn recipe_ids(&self) -> HashSet<RecipeId> {
        self.recipes.iter().map(|recipe| recipe.id.clone()).collect()
    }

    pub fn find(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Re-derives `meta.total_recipes` from the recipe sequence.
    pub fn refresh_total(&mut self) {
        self.meta.total_recipes = self.recipes.len();
    }

    pub fn touch(&mut self, today: NaiveDate) {
        self.meta.last_updated = format_last_updated(today);
    }

    /// Checks id uniqueness only.
    ///
    /// Used on read paths, where a stale count is repaired by the next save
    /// but duplicate ids are unrecoverable.
    pub fn validate_ids(&self) -> Result<(), CorpusValidationError> {
        let mut seen = HashSet::with_capacity(self.recipes.len());
        for recipe in &self.recipes {
            if !seen.insert(recipe.id.as_str()) {
                return Err(CorpusValidationError::DuplicateId(recipe.id.clone()));
            }
        }
        Ok(())
    }

    /// Checks id uniqueness and the count invariant.
    pub fn validate(&self) -> Result<(), CorpusValidationError> {
        self.validate_ids()?;
        if self.meta.total_recipes != self.recipes.len() {
            return Err(CorpusValidationError::TotalMismatch {
                declared: self.meta.total_recipes,
                actual: self.recipes.len(),
            });
        }
        Ok(())
    }
}

pub fn format_last_updated(date: NaiveDate) -> String {
    date.format(LAST_UPDATED_FORMAT).to_string()
}
