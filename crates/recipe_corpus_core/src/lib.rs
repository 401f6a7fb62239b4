//! Core domain logic for the recipe corpus.
//! This crate is the single source of truth for corpus invariants.

pub mod data;
pub mod logging;
pub mod model;
pub mod nutrition;
pub mod repo;
pub mod service;

pub use data::{
    load_batch, load_nutrition_table, load_nutrition_tables, Batch, DataError, DataResult,
    NutritionTable, NutritionTableEntry,
};
pub use logging::{default_log_level, init_logging, LoggingConfig, LoggingError};
pub use model::corpus::{Corpus, CorpusMeta, CorpusValidationError};
pub use model::nutrition::{NutritionFacts, NutritionRecord, NutritionStatus};
pub use model::recipe::{Recipe, RecipeId, RecipeValidationError};
pub use nutrition::index::{IndexEntry, IndexStats, NutritionIndex};
pub use nutrition::matcher::{
    ExactStrategy, MatchStrategy, MatchTier, NutritionMatch, NutritionMatcher,
    SubstringStrategy, SuffixStrippedStrategy,
};
pub use nutrition::normalize::normalize_name;
pub use repo::corpus_repo::{
    CorpusRepository, InMemoryCorpusRepository, JsonFileCorpusRepository, RepoError, RepoResult,
};
pub use service::enrich_service::{
    enrich_corpus, EnrichError, EnrichReport, EnrichService, EnrichedRecipe,
};
pub use service::ingest_service::{
    merge_into, IngestError, IngestReport, IngestService, MergeOutcome, RejectedCandidate,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
