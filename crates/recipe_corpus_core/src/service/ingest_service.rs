//! Batch ingestion use-case service.
//!
//! # Responsibility
//! - Deduplicate a batch against the corpus by recipe id and append the rest.
//! - Reject malformed candidates one at a time without failing the batch.
//! - Persist the merged corpus with one whole-document rewrite.
//!
//! # Invariants
//! - First write for an id wins; later offers of the same id are skipped.
//! - Accepted records keep batch order.
//! - Re-running an identical batch adds nothing and keeps the total.

use crate::data::batch::Batch;
use crate::model::corpus::Corpus;
use crate::model::recipe::{Recipe, RecipeId, RecipeValidationError};
use crate::repo::corpus_repo::{CorpusRepository, RepoError};
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

pub type IngestResult<T> = Result<T, IngestError>;

/// Fatal ingestion error. Per-record problems never surface here.
#[derive(Debug)]
pub enum IngestError {
    Repo(RepoError),
}

impl Display for IngestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for IngestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for IngestError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Candidate that could not become a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedCandidate {
    /// Zero-based position inside the batch.
    pub position: usize,
    /// The candidate's `id`, when it had a string one.
    pub id: Option<String>,
    pub reason: RecipeValidationError,
}

/// In-memory result of one merge step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Ids appended, in batch order.
    pub added: Vec<RecipeId>,
    /// Ids already present in the corpus or earlier in the batch.
    pub skipped: Vec<RecipeId>,
    pub rejected: Vec<RejectedCandidate>,
}

/// Summary of one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub run_id: Uuid,
    pub batch_name: String,
    pub added: Vec<RecipeId>,
    pub skipped: Vec<RecipeId>,
    pub rejected: Vec<RejectedCandidate>,
    /// Corpus size after the run.
    pub total: usize,
}

impl IngestReport {
    pub fn added_count(&self) -> usize {
        self.added.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// One-line human summary for stdout.
    pub fn summary_line(&self) -> String {
        format!(
            "batch `{}`: added {}, skipped {} duplicate(s), rejected {} malformed; total recipes {}",
            self.batch_name,
            self.added_count(),
            self.skipped_count(),
            self.rejected_count(),
            self.total
        )
    }
}

/// Merges `batch` into `corpus` in memory.
///
/// Appends accepted recipes in batch order and refreshes
/// `meta.total_recipes`. Does not touch `meta.last_updated`.
pub fn merge_into(corpus: &mut Corpus, batch: &Batch) -> MergeOutcome {
    let mut known_ids = corpus.recipe_ids();
    let mut outcome = MergeOutcome::default();

    for (position, candidate) in batch.candidates.iter().enumerate() {
        let recipe = match Recipe::from_candidate(candidate.clone()) {
            Ok(recipe) => recipe,
            Err(reason) => {
                warn!(
                    "event=ingest_reject module=service position={} error={}",
                    position, reason
                );
                outcome.rejected.push(RejectedCandidate {
                    position,
                    id: candidate_id_hint(candidate),
                    reason,
                });
                continue;
            }
        };

        if known_ids.contains(&recipe.id) {
            debug!(
                "event=ingest_skip module=service position={} recipe_id={}",
                position, recipe.id
            );
            outcome.skipped.push(recipe.id);
            continue;
        }

        known_ids.insert(recipe.id.clone());
        outcome.added.push(recipe.id.clone());
        corpus.recipes.push(recipe);
    }

    corpus.refresh_total();
    outcome
}

fn candidate_id_hint(candidate: &Value) -> Option<String> {
    candidate
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Ingestion service over a corpus repository.
pub struct IngestService<R: CorpusRepository> {
    repo: R,
}

impl<R: CorpusRepository> IngestService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads the corpus, merges `batch`, and saves the result once.
    ///
    /// `today` stamps `meta.last_updated` when at least one recipe was added.
    ///
    /// # Errors
    /// - `Repo` when the corpus is missing, unreadable, malformed, or cannot
    ///   be saved. Nothing is written in the load-failure cases.
    pub fn merge_batch(&self, batch: &Batch, today: NaiveDate) -> IngestResult<IngestReport> {
        let run_id = Uuid::new_v4();
        let started_at = Instant::now();
        info!(
            "event=ingest_run module=service status=start run_id={} candidates={}",
            run_id,
            batch.len()
        );

        let result = self.run(batch, today);
        match &result {
            Ok((outcome, total)) => info!(
                "event=ingest_run module=service status=ok run_id={} duration_ms={} added={} skipped={} rejected={} total={}",
                run_id,
                started_at.elapsed().as_millis(),
                outcome.added.len(),
                outcome.skipped.len(),
                outcome.rejected.len(),
                total
            ),
            Err(err) => error!(
                "event=ingest_run module=service status=error run_id={} duration_ms={} error={}",
                run_id,
                started_at.elapsed().as_millis(),
                err
            ),
        }

        let (outcome, total) = result?;
        Ok(IngestReport {
            run_id,
            batch_name: batch.name.clone(),
            added: outcome.added,
            skipped: outcome.skipped,
            rejected: outcome.rejected,
            total,
        })
    }

    fn run(&self, batch: &Batch, today: NaiveDate) -> IngestResult<(MergeOutcome, usize)> {
        let mut corpus = self.repo.load()?;
        let outcome = merge_into(&mut corpus, batch);
        if !outcome.added.is_empty() {
            corpus.touch(today);
        }
        self.repo.save(&corpus)?;
        Ok((outcome, corpus.meta.total_recipes))
    }
}

#[cfg(test)]
mod tests {
    use super::merge_into;
    use crate::data::batch::Batch;
    use crate::model::corpus::Corpus;
    use crate::model::recipe::RecipeValidationError;
    use chrono::NaiveDate;
    use serde_json::json;

    fn empty_corpus() -> Corpus {
        Corpus::empty(NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date"))
    }

    #[test]
    fn duplicate_inside_one_batch_keeps_first_occurrence() {
        let mut corpus = empty_corpus();
        let batch = Batch::new(
            "dup",
            vec![
                json!({"id": "a", "title": "First", "category": "dessert"}),
                json!({"id": "a", "title": "Second", "category": "dessert"}),
            ],
        );

        let outcome = merge_into(&mut corpus, &batch);

        assert_eq!(outcome.added, vec!["a".to_string()]);
        assert_eq!(outcome.skipped, vec!["a".to_string()]);
        assert_eq!(corpus.find("a").unwrap().title, "First");
        assert_eq!(corpus.meta.total_recipes, 1);
    }

    #[test]
    fn malformed_candidates_are_rejected_individually() {
        let mut corpus = empty_corpus();
        let batch = Batch::new(
            "mixed",
            vec![
                json!({"title": "No id", "category": "dessert"}),
                json!("not an object"),
                json!({"id": "  ", "title": "Blank", "category": "dessert"}),
                json!({"id": "ok", "title": "Fine", "category": "dessert"}),
                json!({"id": "bad-nutrition", "title": "Bad", "category": "dessert",
                       "nutrition": {"status": "unknown"}}),
            ],
        );

        let outcome = merge_into(&mut corpus, &batch);

        assert_eq!(outcome.added, vec!["ok".to_string()]);
        let reasons: Vec<_> = outcome
            .rejected
            .iter()
            .map(|rejected| (rejected.position, rejected.reason.clone()))
            .collect();
        assert_eq!(reasons[0], (0, RecipeValidationError::MissingId));
        assert_eq!(reasons[1], (1, RecipeValidationError::NotAnObject));
        assert_eq!(reasons[2], (2, RecipeValidationError::BlankId));
        assert_eq!(reasons[3].0, 4);
        assert_eq!(outcome.rejected[3].id.as_deref(), Some("bad-nutrition"));
        assert_eq!(corpus.len(), 1);
    }
}
