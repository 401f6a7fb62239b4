//! Canonical corpus data model.
//!
//! # Responsibility
//! - Define the corpus document, recipe records and nutrition facts.
//! - Keep validation of ids and counts next to the data they protect.
//!
//! # Invariants
//! - Every recipe is identified by a stable, non-blank `id`.
//! - Recipe ids are unique across the whole `recipes` sequence.
//! - `meta.total_recipes` equals `recipes.len()` after every persist.
//! - A `complete` nutrition record is never overwritten.

pub mod corpus;
pub mod nutrition;
pub mod recipe;
