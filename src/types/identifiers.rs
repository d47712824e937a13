use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::text::normalize;

/// Stable handle of a record, assigned in input order at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub fn new(value: u64) -> Self {
        RecordId(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Digest of a record's normalized text. Used only for exact-duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Hash the normalized form of `text`.
    pub fn of_text(text: &str) -> Self {
        Self::of_normalized(&normalize(text))
    }

    /// Hash a string that is already in normalized form.
    pub fn of_normalized(normalized: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());

        let hash = hasher.finalize();
        let hex = hex::encode(hash);

        ContentHash(format!("sha256:{hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
