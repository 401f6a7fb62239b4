//! Versioned data files for batches and nutrition reference tables.
//!
//! # Responsibility
//! - Load batch and nutrition table files from disk.
//! - Validate file-level schema (format version, names, provenance).
//!
//! # Invariants
//! - Batch candidates stay untyped here; per-record checks belong to the
//!   merge engine so one bad record never fails a whole file.
//! - Table entries keep file order, which the index relies on.

pub mod batch;
pub mod nutrition_table;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use batch::{load_batch, Batch};
pub use nutrition_table::{
    load_nutrition_table, load_nutrition_tables, NutritionTable, NutritionTableEntry,
};

/// Data file format version understood by this build.
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

pub type DataResult<T> = Result<T, DataError>;

/// Data file load/validation error.
#[derive(Debug)]
pub enum DataError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        supported: u32,
    },
    Invalid {
        path: PathBuf,
        message: String,
    },
}

impl Display for DataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "malformed data file {}: {source}", path.display())
            }
            Self::UnsupportedVersion {
                path,
                found,
                supported,
            } => write!(
                f,
                "data file {} has format_version {found}; supported is {supported}",
                path.display()
            ),
            Self::Invalid { path, message } => {
                write!(f, "invalid data file {}: {message}", path.display())
            }
        }
    }
}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::UnsupportedVersion { .. } | Self::Invalid { .. } => None,
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> DataResult<T> {
    let bytes = fs::read(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| DataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn check_version(path: &Path, found: u32) -> DataResult<()> {
    if found != SUPPORTED_FORMAT_VERSION {
        return Err(DataError::UnsupportedVersion {
            path: path.to_path_buf(),
            found,
            supported: SUPPORTED_FORMAT_VERSION,
        });
    }
    Ok(())
}

fn require_non_blank(path: &Path, field: &str, value: &str) -> DataResult<()> {
    if value.trim().is_empty() {
        return Err(DataError::Invalid {
            path: path.to_path_buf(),
            message: format!("`{field}` must not be blank"),
        });
    }
    Ok(())
}
