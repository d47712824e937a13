use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::types::identifiers::RecordId;

/// How a removed record was judged a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupMethod {
    Exact,
    Semantic,
    Lexical,
}

/// A pair that crossed a similarity threshold.
///
/// Transient: produced during comparison, consumed by the resolution pass.
/// `a` is always the record that comes first in the stage's comparison order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityEdge {
    pub a: usize,
    pub b: usize,
    pub score: f64,
}

/// One entry of the removal log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovalDecision {
    pub removed_id: RecordId,
    pub kept_id: RecordId,
    pub score: f64,
    pub method: DedupMethod,
}

/// Human-readable form of a removal decision, for review exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub method: DedupMethod,
    pub score: f64,
    pub kept_id: RecordId,
    pub removed_id: RecordId,
    pub kept: String,
    pub removed: String,
}

/// Join the removal log with the records it refers to.
///
/// `records` must contain every record that entered the pipeline. Decisions
/// that reference unknown ids are skipped.
pub fn audit_trail(records: &[Record], removals: &[RemovalDecision]) -> Vec<AuditEntry> {
    let by_id: HashMap<RecordId, &Record> = records.iter().map(|r| (r.id, r)).collect();

    removals
        .iter()
        .filter_map(|d| {
            let kept = by_id.get(&d.kept_id)?;
            let removed = by_id.get(&d.removed_id)?;
            Some(AuditEntry {
                method: d.method,
                score: d.score,
                kept_id: d.kept_id,
                removed_id: d.removed_id,
                kept: kept.text.clone(),
                removed: removed.text.clone(),
            })
        })
        .collect()
}
