//! Nutrition enrichment use-case service.
//!
//! # Responsibility
//! - Match corpus recipes lacking complete nutrition against the index.
//! - Write matched facts as `complete` records and persist once.
//!
//! # Invariants
//! - Recipes already `complete` are never rewritten.
//! - Unmatched recipes are left exactly as they were.
//! - Each match records the tier that produced it.

use crate::model::corpus::Corpus;
use crate::model::nutrition::NutritionRecord;
use crate::model::recipe::RecipeId;
use crate::nutrition::index::NutritionIndex;
use crate::nutrition::matcher::{MatchTier, NutritionMatcher};
use crate::repo::corpus_repo::{CorpusRepository, RepoError};
use chrono::NaiveDate;
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

pub type EnrichResult<T> = Result<T, EnrichError>;

/// Fatal enrichment error. A missing match is not an error.
#[derive(Debug)]
pub enum EnrichError {
    Repo(RepoError),
}

impl Display for EnrichError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EnrichError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for EnrichError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Audit record for one enriched recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecipe {
    pub id: RecipeId,
    pub title: String,
    /// Index key that matched.
    pub matched_key: String,
    /// Table that supplied the facts.
    pub table: String,
    pub tier: MatchTier,
    pub confidence: f64,
}

/// In-memory result of one enrichment scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichOutcome {
    pub enriched: Vec<EnrichedRecipe>,
    /// Recipes with no match; their nutrition stays as it was.
    pub unmatched: Vec<RecipeId>,
    pub already_complete: usize,
}

/// Summary of one enrichment run.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichReport {
    pub run_id: Uuid,
    pub enriched: Vec<EnrichedRecipe>,
    pub unmatched: Vec<RecipeId>,
    pub already_complete: usize,
}

impl EnrichReport {
    /// Human summary for stdout, one matched title per line.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.enriched.len() + 2);
        lines.push(format!(
            "Updated nutrition for {} recipe(s):",
            self.enriched.len()
        ));
        for recipe in &self.enriched {
            lines.push(format!(
                "  - {} <- {} [{}]",
                recipe.title, recipe.matched_key, recipe.tier
            ));
        }
        lines.push(format!(
            "{} unmatched, {} already complete",
            self.unmatched.len(),
            self.already_complete
        ));
        lines
    }

    pub fn count_by_tier(&self, tier: MatchTier) -> usize {
        self.enriched
            .iter()
            .filter(|recipe| recipe.tier == tier)
            .count()
    }
}

/// Applies matched nutrition facts to `corpus` in memory.
pub fn enrich_corpus(
    corpus: &mut Corpus,
    index: &NutritionIndex,
    matcher: &NutritionMatcher,
) -> EnrichOutcome {
    let mut outcome = EnrichOutcome::default();

    for recipe in corpus.recipes.iter_mut() {
        if recipe.has_complete_nutrition() {
            outcome.already_complete += 1;
            continue;
        }

        let Some(matched) = matcher.match_title(&recipe.title, index) else {
            outcome.unmatched.push(recipe.id.clone());
            continue;
        };

        debug!(
            "event=nutrition_match module=service recipe_id={} tier={} confidence={:.2} table={}",
            recipe.id, matched.tier, matched.confidence, matched.entry.table
        );
        recipe.nutrition = Some(NutritionRecord::complete(
            &matched.entry.per_serving,
            matched.entry.source.clone(),
        ));
        outcome.enriched.push(EnrichedRecipe {
            id: recipe.id.clone(),
            title: recipe.title.clone(),
            matched_key: matched.entry.key.clone(),
            table: matched.entry.table.clone(),
            tier: matched.tier,
            confidence: matched.confidence,
        });
    }

    outcome
}

/// Enrichment service over a corpus repository.
pub struct EnrichService<R: CorpusRepository> {
    repo: R,
}

impl<R: CorpusRepository> EnrichService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads the corpus, enriches every non-complete recipe it can match,
    /// and saves exactly once.
    ///
    /// `today` stamps `meta.last_updated` when at least one recipe changed.
    ///
    /// # Errors
    /// - `Repo` when the corpus is missing, unreadable, malformed, or cannot
    ///   be saved.
    pub fn enrich(
        &self,
        index: &NutritionIndex,
        matcher: &NutritionMatcher,
        today: NaiveDate,
    ) -> EnrichResult<EnrichReport> {
        let run_id = Uuid::new_v4();
        let started_at = Instant::now();
        info!(
            "event=enrich_run module=service status=start run_id={} index_entries={}",
            run_id,
            index.len()
        );

        let result = self.run(index, matcher, today);
        match &result {
            Ok(outcome) => info!(
                "event=enrich_run module=service status=ok run_id={} duration_ms={} enriched={} unmatched={} already_complete={}",
                run_id,
                started_at.elapsed().as_millis(),
                outcome.enriched.len(),
                outcome.unmatched.len(),
                outcome.already_complete
            ),
            Err(err) => error!(
                "event=enrich_run module=service status=error run_id={} duration_ms={} error={}",
                run_id,
                started_at.elapsed().as_millis(),
                err
            ),
        }

        let outcome = result?;
        Ok(EnrichReport {
            run_id,
            enriched: outcome.enriched,
            unmatched: outcome.unmatched,
            already_complete: outcome.already_complete,
        })
    }

    fn run(
        &self,
        index: &NutritionIndex,
        matcher: &NutritionMatcher,
        today: NaiveDate,
    ) -> EnrichResult<EnrichOutcome> {
        let mut corpus = self.repo.load()?;
        let outcome = enrich_corpus(&mut corpus, index, matcher);
        if !outcome.enriched.is_empty() {
            corpus.touch(today);
        }
        corpus.refresh_total();
        self.repo.save(&corpus)?;
        Ok(outcome)
    }
}
