use rayon::prelude::*;
use tracing::debug;

use super::StageOutcome;
use crate::config::DedupConfig;
use crate::embedding::{EmbeddingError, Embeddings};
use crate::record::Record;
use crate::types::removal::{DedupMethod, RemovalDecision, SimilarityEdge};

/// Within this distance of ±1 a score is rounding noise on (anti)parallel
/// vectors. Inputs are `f32`, so no two distinct directions get this close.
const PARALLEL_EPSILON: f64 = 1e-9;

/// Cosine similarity in `[-1, 1]`. Zero vectors are similar to nothing.
///
/// Parallel vectors score exactly `1.0` whatever their magnitude, so a
/// `semantic_threshold` of `1.0` matches identical embeddings.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    cosine_from_parts(dot(a, b), norm(a) * norm(b))
}

/// Shared by the pairwise and blocked paths so both score identically.
fn cosine_from_parts(dot: f64, denom: f64) -> f64 {
    if denom == 0.0 {
        return 0.0;
    }
    let score = (dot / denom).clamp(-1.0, 1.0);
    if score >= 1.0 - PARALLEL_EPSILON {
        1.0
    } else if score <= PARALLEL_EPSILON - 1.0 {
        -1.0
    } else {
        score
    }
}

fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum()
}

fn norm(v: &[f32]) -> f64 {
    v.iter().map(|x| *x as f64 * *x as f64).sum::<f64>().sqrt()
}

/// Remove near-duplicates by cosine similarity of their embeddings.
///
/// `embeddings.get(i)` must belong to `records[i]`. For every pair `i < j` with
/// `cos >= semantic_threshold` the longer text is kept; equal lengths keep
/// `i`. A record losing several pairs is logged once, against the first pair
/// in `(i, j)` order.
///
/// The matrix is computed in `block_size` squares, block pairs in parallel.
/// Edges are sorted before resolution, so blocking never changes the outcome.
pub fn remove_semantic_duplicates(
    records: Vec<Record>,
    embeddings: &Embeddings,
    config: &DedupConfig,
) -> Result<StageOutcome, EmbeddingError> {
    embeddings.check_aligned(records.len())?;
    Ok(resolve_aligned(records, embeddings, config))
}

/// Body of [`remove_semantic_duplicates`] once alignment is established.
pub(crate) fn resolve_aligned(
    records: Vec<Record>,
    embeddings: &Embeddings,
    config: &DedupConfig,
) -> StageOutcome {
    let total = records.len();
    let norms: Vec<f64> = (0..total).map(|i| norm(embeddings.get(i))).collect();

    let block_size = config.block_size.max(1);
    let starts: Vec<usize> = (0..total).step_by(block_size).collect();
    let block_pairs: Vec<(usize, usize)> = starts
        .iter()
        .enumerate()
        .flat_map(|(bi, &row)| starts[bi..].iter().map(move |&col| (row, col)))
        .collect();

    let mut edges: Vec<SimilarityEdge> = block_pairs
        .par_iter()
        .flat_map_iter(|&(row, col)| {
            block_edges(embeddings, &norms, row, col, block_size, config.semantic_threshold)
        })
        .collect();

    edges.sort_by(|x, y| (x.a, x.b).cmp(&(y.a, y.b)));

    let lengths: Vec<usize> = records.iter().map(Record::text_len).collect();
    let mut removed = vec![false; total];
    let mut removals = Vec::new();
    for edge in &edges {
        let (keep, drop) = if lengths[edge.a] >= lengths[edge.b] {
            (edge.a, edge.b)
        } else {
            (edge.b, edge.a)
        };
        if removed[drop] {
            continue;
        }
        removed[drop] = true;
        removals.push(RemovalDecision {
            removed_id: records[drop].id,
            kept_id: records[keep].id,
            score: edge.score,
            method: DedupMethod::Semantic,
        });
    }

    debug!(
        blocks = block_pairs.len(),
        candidates = edges.len(),
        removed = removals.len(),
        "semantic dedup done"
    );

    let kept = records
        .into_iter()
        .zip(removed)
        .filter_map(|(record, gone)| (!gone).then_some(record))
        .collect();

    StageOutcome { kept, removals }
}

/// Full similarity matrix of one block pair, then every cell above threshold
/// with global `j > i`.
fn block_edges(
    embeddings: &Embeddings,
    norms: &[f64],
    row: usize,
    col: usize,
    block_size: usize,
    threshold: f64,
) -> Vec<SimilarityEdge> {
    let row_end = (row + block_size).min(embeddings.len());
    let col_end = (col + block_size).min(embeddings.len());
    let width = col_end - col;

    let mut matrix = vec![0.0f64; (row_end - row) * width];
    for i in row..row_end {
        for j in col..col_end {
            matrix[(i - row) * width + (j - col)] =
                cosine_from_parts(dot(embeddings.get(i), embeddings.get(j)), norms[i] * norms[j]);
        }
    }

    let mut edges = Vec::new();
    for i in row..row_end {
        for j in col..col_end {
            if j <= i {
                continue;
            }
            let score = matrix[(i - row) * width + (j - col)];
            if score >= threshold {
                edges.push(SimilarityEdge { a: i, b: j, score });
            }
        }
    }
    edges
}
