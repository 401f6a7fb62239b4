//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate corpus load, in-memory mutation and a single save per run.
//! - Keep CLI layers decoupled from storage details.

pub mod enrich_service;
pub mod ingest_service;
