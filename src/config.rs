use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be within [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },
    #[error("Block size must be at least 1")]
    InvalidBlockSize,
    #[error("N-gram width must be at least 1")]
    InvalidNgramSize,
}

// Unknown keys are rejected: these six options are the whole surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DedupConfig {
    /// Minimum n-gram Jaccard score for a lexical duplicate.
    pub lexical_threshold: f64,
    /// Minimum cosine similarity for a semantic duplicate.
    pub semantic_threshold: f64,
    /// Character n-gram width.
    pub ngram_size: usize,
    /// Rows per block in the semantic similarity matrix.
    pub block_size: usize,
    /// Lexical pre-filter: shorter/longer text length.
    pub min_length_ratio: f64,
    /// Lexical pre-filter: shared words over the smaller word set.
    pub min_word_overlap: f64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            lexical_threshold: 0.75,
            semantic_threshold: 0.92,
            ngram_size: 3,
            block_size: 1000,
            min_length_ratio: 0.5,
            min_word_overlap: 0.4,
        }
    }
}

impl DedupConfig {
    /// Reject any configuration that would make a pass silently wrong.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratios = [
            ("lexical_threshold", self.lexical_threshold),
            ("semantic_threshold", self.semantic_threshold),
            ("min_length_ratio", self.min_length_ratio),
            ("min_word_overlap", self.min_word_overlap),
        ];
        for (name, value) in ratios {
            // NaN fails the range check too
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        if self.block_size == 0 {
            return Err(ConfigError::InvalidBlockSize);
        }
        if self.ngram_size == 0 {
            return Err(ConfigError::InvalidNgramSize);
        }
        Ok(())
    }
}
