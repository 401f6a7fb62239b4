//! Batch file loading.

use super::{check_version, read_json, require_non_blank, DataResult};
use log::info;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// One externally authored set of candidate recipes.
///
/// Candidates are untyped so the merge engine can reject malformed ones
/// individually.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Human-readable batch name, e.g. the source cookbook.
    pub name: String,
    pub candidates: Vec<Value>,
}

impl Batch {
    pub fn new(name: impl Into<String>, candidates: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            candidates,
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BatchFile {
    format_version: u32,
    batch: String,
    recipes: Vec<Value>,
}

/// Loads and validates one batch file.
///
/// # Errors
/// - `Io` / `Parse` when the file cannot be read or is not a batch document.
/// - `UnsupportedVersion` for an unknown `format_version`.
/// - `Invalid` when `batch` is blank.
pub fn load_batch(path: impl AsRef<Path>) -> DataResult<Batch> {
    let path = path.as_ref();
    let file: BatchFile = read_json(path)?;
    check_version(path, file.format_version)?;
    require_non_blank(path, "batch", &file.batch)?;

    info!(
        "event=batch_load module=data status=ok candidates={}",
        file.recipes.len()
    );
    Ok(Batch::new(file.batch, file.recipes))
}
