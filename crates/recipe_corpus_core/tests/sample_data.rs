use chrono::NaiveDate;
use recipe_corpus_core::{
    load_batch, load_nutrition_tables, CorpusRepository, EnrichService, IngestService,
    JsonFileCorpusRepository, MatchTier, NutritionIndex, NutritionMatcher,
};
use std::fs;
use std::path::PathBuf;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

#[test]
fn shipped_batch_and_tables_ingest_then_enrich_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let corpus_path = dir.path().join("corpus.json");
    fs::copy(data_dir().join("corpus.json"), &corpus_path).unwrap();
    let repo = JsonFileCorpusRepository::new(&corpus_path);
    let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();

    let batch = load_batch(data_dir().join("batches/fall_desserts.json")).unwrap();
    let ingest = IngestService::new(&repo).merge_batch(&batch, today).unwrap();
    assert_eq!(ingest.added_count(), 3);

    let tables = load_nutrition_tables(&[
        data_dir().join("nutrition/desserts.json"),
        data_dir().join("nutrition/bars.json"),
    ][..])
    .unwrap();
    let index = NutritionIndex::build(&tables);
    let report = EnrichService::new(&repo)
        .enrich(&index, &NutritionMatcher::default(), today)
        .unwrap();

    assert_eq!(report.enriched.len(), 3);
    assert_eq!(report.count_by_tier(MatchTier::SuffixStripped), 1);
    let corpus = repo.load().unwrap();
    assert!(corpus.recipes.iter().all(|recipe| recipe.has_complete_nutrition()));
    assert_eq!(
        corpus
            .find("fall-pumpkin-bars")
            .unwrap()
            .nutrition
            .as_ref()
            .unwrap()
            .source
            .as_deref(),
        Some("bars and squares reference table")
    );

    let rerun = IngestService::new(&repo).merge_batch(&batch, today).unwrap();
    assert_eq!(rerun.skipped_count(), 3);
    assert_eq!(repo.load().unwrap(), corpus);
}
