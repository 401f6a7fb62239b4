//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the load/save contract for the corpus document.
//! - Isolate file layout and atomic replacement from merge/enrich logic.
//!
//! # Invariants
//! - Repository writes must enforce `Corpus::validate()` before persistence.
//! - Missing or malformed corpus files are fatal, never silently reset.

pub mod corpus_repo;
