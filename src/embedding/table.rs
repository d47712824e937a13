use std::collections::HashMap;

use serde::Deserialize;

use super::{EmbeddingError, EmbeddingProvider};
use crate::text::normalize;

#[derive(Debug, Deserialize)]
struct TableEntry {
    text: String,
    embedding: Vec<f32>,
}

/// Precomputed vectors keyed by normalized text.
///
/// Answers only when every requested text is present; a partial answer is
/// reported as `Unavailable`.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingTable {
    vectors: HashMap<String, Vec<f32>>,
}

impl EmbeddingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `[{"text": ..., "embedding": [...]}, ...]`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<TableEntry> = serde_json::from_str(json)?;
        Ok(entries
            .into_iter()
            .map(|e| (e.text, e.embedding))
            .collect())
    }

    pub fn insert(&mut self, text: &str, embedding: Vec<f32>) {
        self.vectors.insert(normalize(text), embedding);
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, Vec<f32>)> for EmbeddingTable {
    fn from_iter<I: IntoIterator<Item = (S, Vec<f32>)>>(iter: I) -> Self {
        let mut table = EmbeddingTable::new();
        for (text, embedding) in iter {
            table.insert(text.as_ref(), embedding);
        }
        table
    }
}

impl EmbeddingProvider for EmbeddingTable {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut out = Vec::with_capacity(texts.len());
        let mut missing = 0usize;
        for text in texts {
            match self.vectors.get(text) {
                Some(v) => out.push(v.clone()),
                None => missing += 1,
            }
        }
        if missing > 0 {
            return Err(EmbeddingError::Unavailable(format!(
                "no embedding for {missing} of {} texts",
                texts.len()
            )));
        }
        Ok(out)
    }
}
