//! Corpus repository contracts and JSON file implementation.
//!
//! # Responsibility
//! - Load and persist the single corpus document.
//! - Keep file layout and atomic-replace details inside the store boundary.
//!
//! # Invariants
//! - Write paths must call `Corpus::validate()` before touching the file.
//! - Read paths reject duplicate ids instead of masking them.
//! - A save either fully replaces the target file or leaves it untouched.

use crate::model::corpus::{Corpus, CorpusValidationError};
use chrono::NaiveDate;
use log::{error, info};
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

const IN_MEMORY_LOCATION: &str = ":memory:";

pub type RepoResult<T> = Result<T, RepoError>;

/// Corpus store error.
#[derive(Debug)]
pub enum RepoError {
    /// Corpus document does not exist.
    NotFound(PathBuf),
    /// Refused to overwrite an existing corpus.
    AlreadyExists(PathBuf),
    Io { path: PathBuf, source: io::Error },
    /// Corpus file is not valid JSON or not shaped like a corpus.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Serialize(serde_json::Error),
    InvalidData(CorpusValidationError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "corpus not found: {}", path.display()),
            Self::AlreadyExists(path) => {
                write!(f, "corpus already exists: {}", path.display())
            }
            Self::Io { path, source } => write!(f, "corpus i/o on {}: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "malformed corpus {}: {source}", path.display())
            }
            Self::Serialize(err) => write!(f, "failed to serialize corpus: {err}"),
            Self::InvalidData(err) => write!(f, "invalid corpus data: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) | Self::AlreadyExists(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::InvalidData(err) => Some(err),
        }
    }
}

impl From<CorpusValidationError> for RepoError {
    fn from(value: CorpusValidationError) -> Self {
        Self::InvalidData(value)
    }
}

impl RepoError {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "corpus_not_found",
            Self::AlreadyExists(_) => "corpus_exists",
            Self::Io { .. } => "corpus_io",
            Self::Parse { .. } => "corpus_parse",
            Self::Serialize(_) => "corpus_serialize",
            Self::InvalidData(_) => "corpus_invalid",
        }
    }
}

/// Repository interface for the corpus document.
///
/// Each run performs one `load`, mutates in memory, then one `save`.
/// Concurrent runs against one store are not coordinated: the last writer
/// wins and may drop another run's additions.
pub trait CorpusRepository {
    fn load(&self) -> RepoResult<Corpus>;
    fn save(&self, corpus: &Corpus) -> RepoResult<()>;
}

impl<T: CorpusRepository + ?Sized> CorpusRepository for &T {
    fn load(&self) -> RepoResult<Corpus> {
        (**self).load()
    }

    fn save(&self, corpus: &Corpus) -> RepoResult<()> {
        (**self).save(corpus)
    }
}

/// Corpus stored as one pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileCorpusRepository {
    path: PathBuf,
}

impl JsonFileCorpusRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Creates an empty corpus file stamped with `today`.
    ///
    /// # Errors
    /// - `AlreadyExists` when a file is already present at the path.
    pub fn init_empty(&self, today: NaiveDate) -> RepoResult<Corpus> {
        if self.path.exists() {
            return Err(RepoError::AlreadyExists(self.path.clone()));
        }
        let corpus = Corpus::empty(today);
        self.save(&corpus)?;
        Ok(corpus)
    }
}

impl CorpusRepository for JsonFileCorpusRepository {
    fn load(&self) -> RepoResult<Corpus> {
        let started_at = Instant::now();
        info!("event=corpus_load module=repo status=start mode=file");

        match read_corpus(&self.path) {
            Ok(corpus) => {
                info!(
                    "event=corpus_load module=repo status=ok mode=file duration_ms={} recipes={}",
                    started_at.elapsed().as_millis(),
                    corpus.len()
                );
                Ok(corpus)
            }
            Err(err) => {
                error!(
                    "event=corpus_load module=repo status=error mode=file duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    fn save(&self, corpus: &Corpus) -> RepoResult<()> {
        let started_at = Instant::now();
        info!("event=corpus_save module=repo status=start mode=file");

        let result = corpus
            .validate()
            .map_err(RepoError::from)
            .and_then(|()| serde_json::to_vec_pretty(corpus).map_err(RepoError::Serialize))
            .and_then(|bytes| write_atomically(&self.path, &bytes));

        match result {
            Ok(()) => {
                info!(
                    "event=corpus_save module=repo status=ok mode=file duration_ms={} recipes={}",
                    started_at.elapsed().as_millis(),
                    corpus.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=corpus_save module=repo status=error mode=file duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }
}

/// In-memory corpus store for fixtures and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryCorpusRepository {
    corpus: RefCell<Option<Corpus>>,
    saves: Cell<usize>,
}

impl InMemoryCorpusRepository {
    /// Creates a store with no corpus; `load` fails with `NotFound`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_corpus(corpus: Corpus) -> Self {
        Self {
            corpus: RefCell::new(Some(corpus)),
            saves: Cell::new(0),
        }
    }

    /// Returns a copy of the currently stored corpus.
    pub fn snapshot(&self) -> Option<Corpus> {
        self.corpus.borrow().clone()
    }

    /// Number of successful saves since construction.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl CorpusRepository for InMemoryCorpusRepository {
    fn load(&self) -> RepoResult<Corpus> {
        self.corpus
            .borrow()
            .clone()
            .ok_or_else(|| RepoError::NotFound(PathBuf::from(IN_MEMORY_LOCATION)))
    }

    fn save(&self, corpus: &Corpus) -> RepoResult<()> {
        corpus.validate()?;
        *self.corpus.borrow_mut() = Some(corpus.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

fn read_corpus(path: &Path) -> RepoResult<Corpus> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(RepoError::NotFound(path.to_path_buf()));
        }
        Err(err) => {
            return Err(RepoError::Io {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };

    let corpus: Corpus = serde_json::from_slice(&bytes).map_err(|err| RepoError::Parse {
        path: path.to_path_buf(),
        source: err,
    })?;
    corpus.validate_ids()?;
    Ok(corpus)
}

/// Writes `bytes` to a sibling temp file, syncs it, then renames it over
/// `path`. An existing target keeps its permissions. The temp file is
/// removed if any step before the rename fails.
fn write_atomically(path: &Path, bytes: &[u8]) -> RepoResult<()> {
    let io_err = |source: io::Error| RepoError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.write_all(b"\n").map_err(io_err)?;
    match fs::metadata(path) {
        Ok(existing) => tmp
            .as_file()
            .set_permissions(existing.permissions())
            .map_err(io_err)?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(io_err(err)),
    }
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|err| io_err(err.error))?;
    Ok(())
}
