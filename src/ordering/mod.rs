pub mod chain;

use std::collections::BTreeMap;

use tracing::debug;

use crate::record::Record;
use crate::types::corpus::Corpus;

pub use chain::{chain_by_similarity, word_similarity};

/// Group by category, chain each group, concatenate groups in label order.
///
/// Order-only: never adds or drops a record.
pub fn order_by_category(records: Vec<Record>) -> Corpus {
    let mut groups: BTreeMap<String, Vec<Record>> = BTreeMap::new();
    for record in records {
        groups.entry(record.category.clone()).or_default().push(record);
    }

    let mut ordered = Vec::new();
    for (category, group) in groups {
        debug!(category = %category, records = group.len(), "ordering category");
        ordered.extend(chain_by_similarity(group));
    }

    Corpus::new(ordered)
}
