use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::debug;

use super::StageOutcome;
use crate::record::Record;
use crate::types::identifiers::{ContentHash, RecordId};
use crate::types::removal::{DedupMethod, RemovalDecision};

/// Drop records whose normalized text hashes to one already seen.
///
/// First seen wins: the record with the lowest input index is kept.
pub fn remove_exact_duplicates(records: Vec<Record>) -> StageOutcome {
    let mut seen: HashMap<ContentHash, RecordId> = HashMap::with_capacity(records.len());
    let mut kept = Vec::with_capacity(records.len());
    let mut removals = Vec::new();

    for record in records {
        match seen.entry(ContentHash::of_text(&record.text)) {
            Entry::Occupied(first) => removals.push(RemovalDecision {
                removed_id: record.id,
                kept_id: *first.get(),
                score: 1.0,
                method: DedupMethod::Exact,
            }),
            Entry::Vacant(slot) => {
                slot.insert(record.id);
                kept.push(record);
            }
        }
    }

    debug!(kept = kept.len(), removed = removals.len(), "exact dedup done");
    StageOutcome { kept, removals }
}
