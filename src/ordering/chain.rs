use std::collections::HashSet;

use crate::record::Record;
use crate::text::{jaccard, normalize, word_set};

/// Word-set Jaccard similarity of two raw texts.
pub fn word_similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    jaccard(&word_set(&a), &word_set(&b))
}

/// Greedy nearest-neighbour chain.
///
/// Starts from the first record; each step appends the unplaced record most
/// similar to the current tail. Ties go to the earlier input position.
/// Output is a permutation of the input. O(m²) in the group size.
pub fn chain_by_similarity(records: Vec<Record>) -> Vec<Record> {
    if records.len() <= 2 {
        return records;
    }

    let normalized: Vec<String> = records.iter().map(|r| normalize(&r.text)).collect();
    let words: Vec<HashSet<&str>> = normalized.iter().map(|n| word_set(n)).collect();

    let mut placed = vec![false; records.len()];
    let mut order = Vec::with_capacity(records.len());
    let mut tail = 0;
    placed[tail] = true;
    order.push(tail);

    while order.len() < records.len() {
        let mut best: Option<(usize, f64)> = None;
        for (idx, candidate) in words.iter().enumerate() {
            if placed[idx] {
                continue;
            }
            let sim = jaccard(&words[tail], candidate);
            if best.map_or(true, |(_, best_sim)| sim > best_sim) {
                best = Some((idx, sim));
            }
        }
        let Some((next, _)) = best else { break };
        placed[next] = true;
        order.push(next);
        tail = next;
    }

    let mut slots: Vec<Option<Record>> = records.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|idx| slots[idx].take())
        .collect()
}
