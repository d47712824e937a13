//! Deterministic near-duplicate removal and similarity ordering for corpora
//! of short text records.
//!
//! `fact-dedup` runs a fixed pass over ingested records: exact duplicates by
//! normalized-text hash, then near-duplicates by either embedding cosine
//! similarity or character n-gram Jaccard similarity, then a per-category
//! ordering that puts similar records next to each other. Every removal is
//! logged against the record it was judged a duplicate of. Identical inputs
//! always produce identical outputs.

pub mod config;
pub mod dedup;
pub mod embedding;
pub mod export;
pub mod ordering;
pub mod pipeline;
pub mod record;
pub mod text;
pub mod types;

pub use config::{ConfigError, DedupConfig};
pub use pipeline::{DedupPipeline, PipelineError, PipelineOutput, PipelineReport};
