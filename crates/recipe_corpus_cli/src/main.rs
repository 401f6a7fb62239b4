//! Command-line entry point for corpus ingestion and enrichment.
//!
//! # Responsibility
//! - Map subcommands onto core services with explicit corpus paths.
//! - Print end-of-run summaries to stdout.
//!
//! # Invariants
//! - Any I/O or parse failure exits non-zero.
//! - Concurrent invocations against one corpus are not coordinated.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use recipe_corpus_core::{
    core_version, init_logging, load_batch, load_nutrition_tables, CorpusRepository, EnrichService,
    IngestService, JsonFileCorpusRepository, LoggingConfig, NutritionIndex, NutritionMatcher,
};
use std::path::{Path, PathBuf};

/// Consolidates recipe batches into one canonical JSON corpus.
#[derive(Parser, Debug)]
#[command(name = "recipe_corpus")]
#[command(version)]
struct Cli {
    /// Corpus document to read and rewrite
    #[arg(
        long,
        global = true,
        env = "RECIPE_CORPUS_PATH",
        default_value = "data/corpus.json"
    )]
    corpus: PathBuf,

    /// Log level (trace|debug|info|warn|error); defaults per build mode
    #[arg(long, global = true, env = "RECIPE_CORPUS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "RECIPE_CORPUS_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an empty corpus document
    Init,
    /// Merge one batch file into the corpus
    Ingest {
        /// Batch data file
        batch: PathBuf,
    },
    /// Fill in nutrition facts from reference tables
    Enrich {
        /// Nutrition table files; later tables override earlier ones
        #[arg(required = true)]
        tables: Vec<PathBuf>,

        /// Skip the substring tier
        #[arg(long)]
        strict: bool,
    },
    /// Check corpus invariants without writing
    Verify,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_ref() {
        let config = LoggingConfig::new(cli.log_level.as_deref(), log_dir)
            .context("invalid logging options")?;
        init_logging(&config).context("failed to initialize logging")?;
    }

    let repo = JsonFileCorpusRepository::new(cli.corpus.clone());
    let today = Local::now().date_naive();

    match cli.command {
        Command::Init => init_command(&repo, today),
        Command::Ingest { batch } => ingest_command(&repo, &batch, today),
        Command::Enrich { tables, strict } => enrich_command(&repo, &tables, strict, today),
        Command::Verify => verify_command(&repo),
    }
}

fn init_command(repo: &JsonFileCorpusRepository, today: NaiveDate) -> Result<()> {
    repo.init_empty(today)
        .with_context(|| format!("cannot initialize {}", repo.path().display()))?;
    println!("Created empty corpus at {}", repo.path().display());
    Ok(())
}

fn ingest_command(
    repo: &JsonFileCorpusRepository,
    batch_path: &Path,
    today: NaiveDate,
) -> Result<()> {
    let batch = load_batch(batch_path)?;
    let report = IngestService::new(repo)
        .merge_batch(&batch, today)
        .with_context(|| format!("ingestion into {} failed", repo.path().display()))?;

    println!("{}", report.summary_line());
    for rejected in &report.rejected {
        println!(
            "  rejected #{} ({}): {}",
            rejected.position,
            rejected.id.as_deref().unwrap_or("no id"),
            rejected.reason
        );
    }
    Ok(())
}

fn enrich_command(
    repo: &JsonFileCorpusRepository,
    table_paths: &[PathBuf],
    strict: bool,
    today: NaiveDate,
) -> Result<()> {
    let tables = load_nutrition_tables(table_paths)?;
    let index = NutritionIndex::build(&tables);
    let matcher = if strict {
        NutritionMatcher::strict()
    } else {
        NutritionMatcher::default()
    };

    let report = EnrichService::new(repo)
        .enrich(&index, &matcher, today)
        .with_context(|| format!("enrichment of {} failed", repo.path().display()))?;

    for line in report.summary_lines() {
        println!("{line}");
    }
    Ok(())
}

fn verify_command(repo: &JsonFileCorpusRepository) -> Result<()> {
    let corpus = repo.load()?;
    if let Err(err) = corpus.validate() {
        bail!("corpus {} is invalid: {err}", repo.path().display());
    }

    let complete = corpus
        .recipes
        .iter()
        .filter(|recipe| recipe.has_complete_nutrition())
        .count();
    println!(
        "corpus ok (core {}): {} recipes, {} with complete nutrition, last updated {}",
        core_version(),
        corpus.len(),
        complete,
        corpus.meta.last_updated
    );
    Ok(())
}
