use std::collections::HashSet;
use std::hash::Hash;

/// Canonical comparison form of a record's text.
///
/// Rules, applied in order:
/// - Lowercase
/// - Every character that is not a letter, digit or whitespace becomes a space
/// - Runs of whitespace collapse to a single space
/// - Leading and trailing whitespace is trimmed
///
/// Every comparison stage goes through this one function. It is total and
/// idempotent: `normalize(&normalize(t)) == normalize(t)`.
pub fn normalize(text: &str) -> String {
    // Lowercase first: some lowercase mappings expand into marks that are
    // not alphanumeric, and they must be stripped on the first pass.
    let lowered = text.to_lowercase();

    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;
    for c in lowered.chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Set of words of an already normalized string.
pub fn word_set(normalized: &str) -> HashSet<&str> {
    normalized.split(' ').filter(|w| !w.is_empty()).collect()
}

/// Set of contiguous character n-grams of an already normalized string.
///
/// Strings shorter than `n` characters have no n-grams.
pub fn char_ngrams(normalized: &str, n: usize) -> HashSet<&str> {
    let mut grams = HashSet::new();
    if n == 0 {
        return grams;
    }

    let bounds: Vec<usize> = normalized
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(normalized.len()))
        .collect();

    // bounds has chars + 1 entries
    for start in 0..bounds.len().saturating_sub(n) {
        grams.insert(&normalized[bounds[start]..bounds[start + n]]);
    }
    grams
}

/// Jaccard similarity `|a ∩ b| / |a ∪ b|`.
///
/// Returns 0.0 when either set is empty.
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = intersection_len(a, b);
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Size of the intersection, probing the larger set with the smaller one.
pub(crate) fn intersection_len<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> usize {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().filter(|x| large.contains(*x)).count()
}
