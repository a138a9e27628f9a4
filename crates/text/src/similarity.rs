//! Sequence similarity scoring
//!
//! Ratcliff/Obershelp-style ratio over normalized strings: find the longest
//! matching block, recurse on the pieces to its left and right, and score
//! `2 * matched / (len(a) + len(b))`. Equivalent utterances phrased with
//! different punctuation or casing score close to 1.0.

use std::collections::HashMap;

/// Normalize an utterance for comparison: lowercase, drop everything that is
/// not a word character or whitespace, trim.
fn normalize(input: &str) -> Vec<char> {
    let lowered = input.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    kept.trim().chars().collect()
}

/// Similarity of two strings in `[0.0, 1.0]`.
///
/// Deterministic and pure. Two empty (after normalization) strings score
/// 1.0; an empty string against a non-empty one scores 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = matching_len(&a, &b);
    2.0 * matched as f64 / total as f64
}

/// Total length of matched blocks, greedy longest-first with recursion on
/// both sides of each match. An explicit work list keeps this off the call
/// stack for long inputs.
fn matching_len(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        total += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    total
}

/// Longest block with `a[i..i+size] == b[j..j+size]` inside the given
/// windows. Ties resolve to the earliest start in `a`, then in `b`, which
/// keeps repeated scoring byte-for-byte stable.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate().take(bhi).skip(blo) {
        b2j.entry(c).or_default().push(j);
    }

    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);
    let mut run_lengths: HashMap<usize, usize> = HashMap::new();

    for i in alo..ahi {
        let mut next_runs: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(&a[i]) {
            for &j in positions {
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| run_lengths.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_runs.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        run_lengths = next_runs;
    }

    (best_i, best_j, best_size)
}
