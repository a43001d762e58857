//! Agglomerative linkage via the Lance-Williams recurrence (spec §4.5 stage 3).

use std::collections::HashMap;

use bibscope_common::types::{LinkageMethod, LinkageRow};

fn lance_williams(method: LinkageMethod, size_i: usize, size_j: usize, size_k: usize, d_ik: f64, d_jk: f64, d_ij: f64) -> f64 {
    match method {
        LinkageMethod::Ward => {
            let total = (size_i + size_j + size_k) as f64;
            let alpha_i = (size_i + size_k) as f64 / total;
            let alpha_j = (size_j + size_k) as f64 / total;
            let beta = -(size_k as f64) / total;
            alpha_i * d_ik + alpha_j * d_jk + beta * d_ij
        }
        LinkageMethod::Average => {
            let total = (size_i + size_j) as f64;
            let alpha_i = size_i as f64 / total;
            let alpha_j = size_j as f64 / total;
            alpha_i * d_ik + alpha_j * d_jk
        }
        LinkageMethod::Complete => 0.5 * d_ik + 0.5 * d_jk + 0.5 * (d_ik - d_jk).abs(),
    }
}

/// Run agglomerative clustering over a precomputed distance matrix, merging
/// the closest pair at each step and updating distances via Lance-Williams.
/// Returns the `n - 1` row linkage matrix and whether a non-monotone merge
/// sequence was observed (expected for Ward under cosine input, spec §8).
pub fn linkage(distance_matrix: &[Vec<f64>], method: LinkageMethod) -> (Vec<LinkageRow>, bool) {
    let n = distance_matrix.len();
    if n < 2 {
        return (Vec::new(), false);
    }

    let mut size: HashMap<usize, usize> = (0..n).map(|i| (i, 1)).collect();
    let mut dist: HashMap<(usize, usize), f64> = HashMap::new();
    for i in 0..n {
        for j in (i + 1)..n {
            dist.insert((i, j), distance_matrix[i][j]);
        }
    }

    let mut active: Vec<usize> = (0..n).collect();
    let mut rows = Vec::with_capacity(n - 1);
    let mut next_id = n;
    let mut last_distance = f64::NEG_INFINITY;
    let mut monotonicity_warning = false;

    let key = |a: usize, b: usize| if a < b { (a, b) } else { (b, a) };

    for _ in 0..(n - 1) {
        let mut best: Option<(usize, usize, f64)> = None;
        for ai in 0..active.len() {
            for bi in (ai + 1)..active.len() {
                let (i, j) = (active[ai], active[bi]);
                let d = *dist.get(&key(i, j)).expect("distance must exist between active nodes");
                if best.map_or(true, |(_, _, best_d)| d < best_d) {
                    best = Some((i, j, d));
                }
            }
        }
        let (i, j, d) = best.expect("at least two active clusters remain");

        if d + 1e-9 < last_distance {
            monotonicity_warning = true;
        }
        last_distance = last_distance.max(d);

        let size_i = size[&i];
        let size_j = size[&j];
        let new_size = size_i + size_j;
        let new_id = next_id;
        next_id += 1;

        rows.push(LinkageRow {
            left: i,
            right: j,
            distance: d,
            size: new_size,
        });

        let others: Vec<usize> = active.iter().copied().filter(|&x| x != i && x != j).collect();
        for k in others {
            let d_ik = *dist.get(&key(i, k)).expect("distance i-k must exist");
            let d_jk = *dist.get(&key(j, k)).expect("distance j-k must exist");
            let size_k = size[&k];
            let new_d = lance_williams(method, size_i, size_j, size_k, d_ik, d_jk, d);
            dist.insert(key(new_id, k), new_d);
        }

        size.insert(new_id, new_size);
        active.retain(|&x| x != i && x != j);
        active.push(new_id);
    }

    (rows, monotonicity_warning)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_matrix() -> Vec<Vec<f64>> {
        // Four points: {0,1} close, {2,3} close, the two pairs far apart.
        vec![
            vec![0.0, 0.1, 0.9, 0.95],
            vec![0.1, 0.0, 0.92, 0.9],
            vec![0.9, 0.92, 0.0, 0.1],
            vec![0.95, 0.9, 0.1, 0.0],
        ]
    }

    #[test]
    fn produces_n_minus_one_rows() {
        let (rows, _) = linkage(&toy_matrix(), LinkageMethod::Average);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn first_merge_is_the_closest_pair() {
        let (rows, _) = linkage(&toy_matrix(), LinkageMethod::Average);
        let first = &rows[0];
        assert!((first.left, first.right) == (0, 1) || (first.left, first.right) == (2, 3));
    }

    #[test]
    fn final_row_contains_every_point() {
        let (rows, _) = linkage(&toy_matrix(), LinkageMethod::Complete);
        assert_eq!(rows.last().unwrap().size, 4);
    }

    #[test]
    fn single_point_yields_no_merges() {
        let (rows, warned) = linkage(&[vec![0.0]], LinkageMethod::Ward);
        assert!(rows.is_empty());
        assert!(!warned);
    }

    #[test]
    fn ward_linkage_runs_without_panicking() {
        let (rows, _) = linkage(&toy_matrix(), LinkageMethod::Ward);
        assert_eq!(rows.len(), 3);
    }
}
