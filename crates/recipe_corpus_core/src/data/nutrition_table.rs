//! Nutrition reference table loading.

use super::{check_version, read_json, require_non_blank, DataError, DataResult};
use crate::model::nutrition::NutritionFacts;
use log::info;
use serde::Deserialize;
use std::path::Path;

/// One category-scoped nutrition reference table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NutritionTable {
    /// Table name, e.g. `desserts`.
    pub name: String,
    /// Provenance written into enriched records.
    pub source: String,
    /// Entries in file order.
    pub entries: Vec<NutritionTableEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NutritionTableEntry {
    /// Display name as authored; normalized when indexed.
    pub name: String,
    pub per_serving: NutritionFacts,
}

impl NutritionTable {
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        entries: Vec<NutritionTableEntry>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            entries,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NutritionTableFile {
    format_version: u32,
    table: String,
    source: String,
    entries: Vec<NutritionTableEntry>,
}

/// Loads and validates one nutrition table file.
///
/// # Errors
/// - `Io` / `Parse` when the file cannot be read or facts are not numeric.
/// - `UnsupportedVersion` for an unknown `format_version`.
/// - `Invalid` when the table name, source or any entry name is blank.
pub fn load_nutrition_table(path: impl AsRef<Path>) -> DataResult<NutritionTable> {
    let path = path.as_ref();
    let file: NutritionTableFile = read_json(path)?;
    check_version(path, file.format_version)?;
    require_non_blank(path, "table", &file.table)?;
    require_non_blank(path, "source", &file.source)?;

    if let Some(position) = file
        .entries
        .iter()
        .position(|entry| entry.name.trim().is_empty())
    {
        return Err(DataError::Invalid {
            path: path.to_path_buf(),
            message: format!("entry #{position} has a blank `name`"),
        });
    }

    info!(
        "event=nutrition_table_load module=data status=ok table={} entries={}",
        file.table,
        file.entries.len()
    );
    Ok(NutritionTable::new(file.table, file.source, file.entries))
}

/// Loads several tables, preserving argument order.
///
/// Order matters: later tables override earlier ones on key collisions.
pub fn load_nutrition_tables<P: AsRef<Path>>(paths: &[P]) -> DataResult<Vec<NutritionTable>> {
    paths
        .iter()
        .map(|path| load_nutrition_table(path.as_ref()))
        .collect()
}
