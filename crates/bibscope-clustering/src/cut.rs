//! Tree cutting: exact-k or silhouette-maximizing auto-k (spec §4.5 stage 4).

use std::collections::HashMap;

use bibscope_common::types::LinkageRow;

use crate::metrics::silhouette_score;

/// Cut the merge tree so exactly `k` clusters remain, by replaying the first
/// `n - k` merges (in the order they were performed) through a union-find.
/// This is equivalent to cutting at the threshold height that yields k
/// clusters whenever the linkage distances are monotone, and remains
/// well-defined even when they are not (spec §8's Ward/cosine caveat).
pub fn cut_to_k(linkage_matrix: &[LinkageRow], n: usize, k: usize) -> Vec<u32> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![0];
    }

    let k = k.clamp(1, n);
    let merges_to_apply = n.saturating_sub(k).min(linkage_matrix.len());

    let mut parent: HashMap<usize, usize> = (0..n).map(|i| (i, i)).collect();

    for (idx, row) in linkage_matrix.iter().enumerate().take(merges_to_apply) {
        let new_id = n + idx;
        parent.insert(row.left, new_id);
        parent.insert(row.right, new_id);
        parent.insert(new_id, new_id);
    }

    fn find(parent: &HashMap<usize, usize>, mut x: usize) -> usize {
        while parent[&x] != x {
            x = parent[&x];
        }
        x
    }

    let mut label_of_root: HashMap<usize, u32> = HashMap::new();
    let mut labels = Vec::with_capacity(n);
    for leaf in 0..n {
        let root = find(&parent, leaf);
        let next_label = label_of_root.len() as u32;
        let label = *label_of_root.entry(root).or_insert(next_label);
        labels.push(label);
    }
    labels
}

/// Select k in `[2, min(n, 20)]` maximizing the silhouette score over the
/// cosine distance matrix. Falls back to k=2 if silhouette is undefined for
/// every candidate (spec §4.5 stage 4).
pub fn auto_cut(linkage_matrix: &[LinkageRow], n: usize, distances: &[Vec<f64>]) -> (Vec<u32>, usize) {
    if n < 2 {
        return (cut_to_k(linkage_matrix, n, 1), n.min(1));
    }

    let max_k = n.min(20);
    let mut best: Option<(usize, f64, Vec<u32>)> = None;

    for k in 2..=max_k {
        let labels = cut_to_k(linkage_matrix, n, k);
        if let Some(score) = silhouette_score(distances, &labels, k) {
            if best.as_ref().map_or(true, |(_, best_score, _)| score > *best_score) {
                best = Some((k, score, labels));
            }
        }
    }

    match best {
        Some((k, _, labels)) => (labels, k),
        None => (cut_to_k(linkage_matrix, n, 2), 2.min(n)),
    }
}
