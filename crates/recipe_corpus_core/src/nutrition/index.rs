//! Normalized-name index over nutrition reference tables.
//!
//! # Invariants
//! - Keys are `normalize_name` outputs and never empty.
//! - Iteration follows first-insertion order of each key.
//! - On key collision the later table's entry replaces the earlier payload
//!   in place (last writer wins); the collision is counted, not rejected.

use crate::data::nutrition_table::NutritionTable;
use crate::model::nutrition::NutritionFacts;
use crate::nutrition::normalize::normalize_name;
use log::{debug, info};
use std::collections::HashMap;

/// One resolved index entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Normalized lookup key.
    pub key: String,
    /// Display name as authored in the winning table.
    pub name: String,
    pub per_serving: NutritionFacts,
    /// Name of the table that supplied the entry.
    pub table: String,
    /// Provenance string of that table.
    pub source: String,
}

/// Counters collected while building an index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub tables: usize,
    /// Entries replaced by a later table with the same key.
    pub overridden: usize,
    /// Entries whose name normalized to an empty key.
    pub dropped: usize,
}

/// Lookup table keyed by normalized name.
#[derive(Debug, Clone, Default)]
pub struct NutritionIndex {
    entries: Vec<IndexEntry>,
    positions: HashMap<String, usize>,
    stats: IndexStats,
}

impl NutritionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds one index from tables merged in the given order.
    pub fn build(tables: &[NutritionTable]) -> Self {
        let mut index = Self::new();
        for table in tables {
            index.merge_table(table);
        }

        info!(
            "event=nutrition_index_build module=nutrition status=ok tables={} entries={} overridden={} dropped={}",
            index.stats.tables,
            index.entries.len(),
            index.stats.overridden,
            index.stats.dropped
        );
        index
    }

    /// Merges every entry of `table` into the index.
    pub fn merge_table(&mut self, table: &NutritionTable) {
        self.stats.tables += 1;
        for entry in &table.entries {
            let key = normalize_name(&entry.name);
            if key.is_empty() {
                self.stats.dropped += 1;
                continue;
            }

            let indexed = IndexEntry {
                key: key.clone(),
                name: entry.name.clone(),
                per_serving: entry.per_serving.clone(),
                table: table.name.clone(),
                source: table.source.clone(),
            };

            match self.positions.get(&key) {
                Some(&position) => {
                    debug!(
                        "event=nutrition_index_override module=nutrition key={} previous_table={} table={}",
                        key, self.entries[position].table, table.name
                    );
                    self.entries[position] = indexed;
                    self.stats.overridden += 1;
                }
                None => {
                    self.positions.insert(key, self.entries.len());
                    self.entries.push(indexed);
                }
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&IndexEntry> {
        self.positions
            .get(key)
            .map(|&position| &self.entries[position])
    }

    /// Iterates entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }
}
