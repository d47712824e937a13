use std::collections::HashSet;
use std::sync::OnceLock;

use rayon::prelude::*;
use tracing::debug;

use super::StageOutcome;
use crate::config::DedupConfig;
use crate::record::Record;
use crate::text::normalize::intersection_len;
use crate::text::{char_ngrams, jaccard, normalize, word_set};
use crate::types::removal::{DedupMethod, RemovalDecision, SimilarityEdge};

/// Character n-gram Jaccard similarity of two raw texts.
pub fn ngram_similarity(a: &str, b: &str, n: usize) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    jaccard(&char_ngrams(&a, n), &char_ngrams(&b, n))
}

/// Per-record comparison features. N-grams are built on first full comparison.
struct Features<'a> {
    normalized: &'a str,
    words: HashSet<&'a str>,
    len: usize,
    ngrams: OnceLock<HashSet<&'a str>>,
}

impl<'a> Features<'a> {
    fn new(normalized: &'a str, len: usize) -> Self {
        Features {
            normalized,
            words: word_set(normalized),
            len,
            ngrams: OnceLock::new(),
        }
    }

    fn ngrams(&self, n: usize) -> &HashSet<&'a str> {
        self.ngrams.get_or_init(|| char_ngrams(self.normalized, n))
    }
}

/// Remove near-duplicates by character n-gram Jaccard similarity.
///
/// Records are ranked by descending text length (stable, so equal lengths keep
/// input order) and a record is only ever removed in favour of one ranked
/// before it: the longer text survives.
///
/// Two phases:
/// 1. every ranked pair that passes the length-ratio and word-overlap
///    pre-filters and scores `>= lexical_threshold` becomes an edge. Runs in
///    parallel over ranked positions.
/// 2. edges are resolved in rank order; a record already removed neither
///    removes nor is removed again.
///
/// The result equals a sequential scan that skips removed records, and does
/// not depend on thread scheduling. Worst case is still O(n²) comparisons when
/// the pre-filters rarely reject; that is a cost property only.
pub fn remove_lexical_duplicates(records: Vec<Record>, config: &DedupConfig) -> StageOutcome {
    let n = config.ngram_size;
    let normalized: Vec<String> = records.iter().map(|r| normalize(&r.text)).collect();
    let features: Vec<Features<'_>> = normalized
        .iter()
        .zip(&records)
        .map(|(norm, record)| Features::new(norm, record.text_len()))
        .collect();

    let mut ranked: Vec<usize> = (0..records.len()).collect();
    ranked.sort_by(|&a, &b| features[b].len.cmp(&features[a].len));

    // Phase 1: edges between ranked positions
    let edges: Vec<Vec<SimilarityEdge>> = (0..ranked.len())
        .into_par_iter()
        .map(|pos| {
            let fi = &features[ranked[pos]];
            ((pos + 1)..ranked.len())
                .filter_map(|later| {
                    let fj = &features[ranked[later]];
                    if !passes_prefilters(fi, fj, config) {
                        return None;
                    }
                    let score = jaccard(fi.ngrams(n), fj.ngrams(n));
                    (score >= config.lexical_threshold).then_some(SimilarityEdge {
                        a: pos,
                        b: later,
                        score,
                    })
                })
                .collect::<Vec<_>>()
        })
        .collect();

    // Phase 2: resolve in rank order
    let mut removed = vec![false; ranked.len()];
    let mut removals = Vec::new();
    for (pos, row) in edges.iter().enumerate() {
        if removed[pos] {
            continue;
        }
        for edge in row {
            if removed[edge.b] {
                continue;
            }
            removed[edge.b] = true;
            removals.push(RemovalDecision {
                removed_id: records[ranked[edge.b]].id,
                kept_id: records[ranked[edge.a]].id,
                score: edge.score,
                method: DedupMethod::Lexical,
            });
        }
    }

    let mut removed_by_index = vec![false; records.len()];
    for (pos, &index) in ranked.iter().enumerate() {
        removed_by_index[index] = removed[pos];
    }

    debug!(
        candidates = edges.iter().map(Vec::len).sum::<usize>(),
        removed = removals.len(),
        "lexical dedup done"
    );

    let kept = records
        .into_iter()
        .zip(removed_by_index)
        .filter_map(|(record, gone)| (!gone).then_some(record))
        .collect();

    StageOutcome { kept, removals }
}

fn passes_prefilters(a: &Features<'_>, b: &Features<'_>, config: &DedupConfig) -> bool {
    let longest = a.len.max(b.len);
    if longest == 0 {
        return false;
    }
    let length_ratio = a.len.min(b.len) as f64 / longest as f64;
    if length_ratio < config.min_length_ratio {
        return false;
    }

    let smallest = a.words.len().min(b.words.len()).max(1);
    let word_overlap = intersection_len(&a.words, &b.words) as f64 / smallest as f64;
    word_overlap >= config.min_word_overlap
}
