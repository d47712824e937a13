use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::DedupConfig;
use crate::types::removal::DedupMethod;

/// Summary of one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub created_at: DateTime<Utc>, // informational only
    pub config: DedupConfig,
    pub input_records: usize,
    pub exact_removed: usize,
    /// The similarity stage that actually ran.
    pub similarity_method: DedupMethod,
    pub similarity_removed: usize,
    pub output_records: usize,
    /// Set when an embedding provider was configured but could not be used.
    pub fallback_reason: Option<String>,
    pub categories: BTreeMap<String, usize>,
}
