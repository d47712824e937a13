pub mod report;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::{ConfigError, DedupConfig};
use crate::dedup::{remove_exact_duplicates, remove_lexical_duplicates, semantic, StageOutcome};
use crate::embedding::{EmbeddingError, EmbeddingProvider, Embeddings, NoEmbedder};
use crate::ordering::order_by_category;
use crate::record::{ingest, RawRecord, Record, RecordError};
use crate::text::normalize;
use crate::types::corpus::Corpus;
use crate::types::removal::{DedupMethod, RemovalDecision};

pub use report::PipelineReport;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Final corpus plus the audit trail of everything removed.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub corpus: Corpus,
    /// Exact removals first, then the similarity stage, each in discovery order.
    pub removals: Vec<RemovalDecision>,
    pub report: PipelineReport,
}

/// Normalize → exact → (semantic | lexical) → per-category ordering.
///
/// Exactly one similarity strategy runs per pass. A pipeline built with
/// [`DedupPipeline::semantic`] uses its provider and drops to lexical only
/// when the provider cannot deliver a complete embedding set.
pub struct DedupPipeline<E = NoEmbedder> {
    config: DedupConfig,
    embedder: Option<E>,
}

impl Default for DedupPipeline<NoEmbedder> {
    fn default() -> Self {
        Self {
            config: DedupConfig::default(),
            embedder: None,
        }
    }
}

impl DedupPipeline<NoEmbedder> {
    /// Lexical-only pipeline.
    pub fn lexical(config: DedupConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            embedder: None,
        })
    }
}

impl<E> DedupPipeline<E>
where
    E: EmbeddingProvider,
{
    /// Pipeline that deduplicates by embedding similarity.
    pub fn semantic(config: DedupConfig, embedder: E) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            embedder: Some(embedder),
        })
    }

    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    /// Ingest raw records (ids in input order) and run a pass.
    pub fn run_raw(&self, raw: Vec<RawRecord>) -> Result<PipelineOutput, PipelineError> {
        let records = ingest(raw)?;
        Ok(self.run(records))
    }

    pub fn run(&self, records: Vec<Record>) -> PipelineOutput {
        let input_records = records.len();

        // 1. Exact duplicates
        let exact = remove_exact_duplicates(records);
        let exact_removed = exact.removals.len();

        // 2. One similarity strategy
        let (similar, similarity_method, fallback_reason) = match &self.embedder {
            Some(embedder) => match self.semantic_stage(embedder, exact.kept) {
                Ok(outcome) => (outcome, DedupMethod::Semantic, None),
                Err((kept, err)) => {
                    warn!(error = %err, "embeddings unusable, falling back to lexical dedup");
                    (
                        remove_lexical_duplicates(kept, &self.config),
                        DedupMethod::Lexical,
                        Some(err.to_string()),
                    )
                }
            },
            None => (
                remove_lexical_duplicates(exact.kept, &self.config),
                DedupMethod::Lexical,
                None,
            ),
        };
        let similarity_removed = similar.removals.len();

        // 3. Ordering
        let corpus = order_by_category(similar.kept);

        let mut removals = exact.removals;
        removals.extend(similar.removals);

        let report = PipelineReport {
            created_at: chrono::Utc::now(),
            config: self.config.clone(),
            input_records,
            exact_removed,
            similarity_method,
            similarity_removed,
            output_records: corpus.len(),
            fallback_reason,
            categories: corpus.category_counts(),
        };

        info!(
            input = input_records,
            exact_removed,
            similarity_removed,
            method = ?similarity_method,
            output = report.output_records,
            "dedup pass complete"
        );

        PipelineOutput {
            corpus,
            removals,
            report,
        }
    }

    /// Hands the records back on failure so the lexical stage can take them.
    fn semantic_stage(
        &self,
        embedder: &E,
        records: Vec<Record>,
    ) -> Result<StageOutcome, (Vec<Record>, EmbeddingError)> {
        let texts: Vec<String> = records.iter().map(|r| normalize(&r.text)).collect();
        match Embeddings::from_provider(embedder, &texts) {
            Ok(embeddings) => Ok(semantic::resolve_aligned(records, &embeddings, &self.config)),
            Err(err) => Err((records, err)),
        }
    }
}
