//! Pairwise cosine distance matrix (spec §4.5 stage 2), parallelized across
//! rows with `rayon` (grounded in `nu_plugin_topology`'s dedup command,
//! which pairs `strsim`-style text algorithms with `par_iter` fan-out).

use bibscope_vectorize::cosine_distance;
use rayon::prelude::*;

/// Build the symmetric n x n cosine distance matrix with a zero diagonal.
pub fn distance_matrix(vectors: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = vectors.len();
    (0..n)
        .into_par_iter()
        .map(|i| {
            (0..n)
                .map(|j| {
                    if i == j {
                        0.0
                    } else {
                        cosine_distance(&vectors[i], &vectors[j])
                    }
                })
                .collect::<Vec<f64>>()
        })
        .collect()
}

/// The condensed upper-triangle of a distance matrix, in `(i, j)` row-major
/// order for `i < j` — the form the cophenetic-correlation test consumes.
pub fn condensed(matrix: &[Vec<f64>]) -> Vec<f64> {
    let n = matrix.len();
    let mut out = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            out.push(matrix[i][j]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_is_zero_and_matrix_is_symmetric() {
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]];
        let d = distance_matrix(&vectors);
        for i in 0..3 {
            assert_eq!(d[i][i], 0.0);
        }
        for i in 0..3 {
            for j in 0..3 {
                assert!((d[i][j] - d[j][i]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn condensed_has_n_choose_2_entries() {
        let vectors = vec![vec![1.0, 0.0]; 4];
        let d = distance_matrix(&vectors);
        assert_eq!(condensed(&d).len(), 6);
    }
}
