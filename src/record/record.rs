use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::metadata::Metadata;
use crate::types::identifiers::RecordId;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Malformed record at index {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },
}

/// A candidate record as handed over by the ingestion side, before it has an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub text: String,
    pub category: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl RawRecord {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        RawRecord {
            text: text.into(),
            category: category.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// The unit the pipeline works on. Never mutated once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub text: String,
    pub category: String,
    pub metadata: Metadata,
}

impl Record {
    /// Validate a raw record and give it an id.
    ///
    /// `index` is only used for error reporting.
    pub fn ingest(id: RecordId, index: usize, raw: RawRecord) -> Result<Self, RecordError> {
        if raw.text.trim().is_empty() {
            return Err(RecordError::MalformedRecord {
                index,
                reason: "text is empty".into(),
            });
        }

        Ok(Record {
            id,
            text: raw.text,
            category: raw.category,
            metadata: raw.metadata,
        })
    }

    /// Length of the original text in characters. The tie-break length.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Ingest a whole batch, assigning ids `0..n` in input order.
///
/// Fails on the first malformed record; nothing from a failed batch enters the core.
pub fn ingest(raw: Vec<RawRecord>) -> Result<Vec<Record>, RecordError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, r)| Record::ingest(RecordId::new(index as u64), index, r))
        .collect()
}
