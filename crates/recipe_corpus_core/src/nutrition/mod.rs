//! Nutrition reference lookup.
//!
//! # Responsibility
//! - Normalize display names into lookup keys.
//! - Merge category-scoped reference tables into one index.
//! - Resolve recipe titles to index entries through ordered match tiers.
//!
//! # Invariants
//! - Index keys and matcher input share one normalization function.
//! - Matching is pure: no I/O, no mutation of index or corpus.

pub mod index;
pub mod matcher;
pub mod normalize;
