use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Surviving records, grouped by category label in sorted order.
///
/// Order within a category is significant and must be kept by consumers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Corpus {
    records: Vec<Record>,
}

impl Corpus {
    /// Wrap records that are already in corpus order.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Contiguous runs of records sharing a category.
    pub fn groups(&self) -> Vec<(&str, &[Record])> {
        let mut groups = Vec::new();
        let mut start = 0;
        for end in 1..=self.records.len() {
            if end == self.records.len() || self.records[end].category != self.records[start].category {
                groups.push((self.records[start].category.as_str(), &self.records[start..end]));
                start = end;
            }
        }
        groups
    }

    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.category.clone()).or_insert(0) += 1;
        }
        counts
    }
}
