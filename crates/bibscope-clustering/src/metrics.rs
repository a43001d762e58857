//! Clustering quality metrics (spec §4.5): cophenetic correlation,
//! silhouette, Davies-Bouldin, Calinski-Harabasz.

use std::collections::HashMap;

use bibscope_common::types::LinkageRow;

use crate::distance::condensed;

fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n < 2 || n != y.len() {
        return None;
    }
    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= f64::EPSILON || var_y <= f64::EPSILON {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Build the cophenetic distance matrix implied by a linkage tree: the
/// merge distance at which two leaves' clusters were first joined.
fn cophenetic_matrix(linkage_matrix: &[LinkageRow], n: usize) -> Vec<Vec<f64>> {
    let mut matrix = vec![vec![0.0; n]; n];
    let mut members: HashMap<usize, Vec<usize>> = (0..n).map(|i| (i, vec![i])).collect();

    for (idx, row) in linkage_matrix.iter().enumerate() {
        let new_id = n + idx;
        let left_members = members.get(&row.left).cloned().unwrap_or_default();
        let right_members = members.get(&row.right).cloned().unwrap_or_default();

        for &a in &left_members {
            for &b in &right_members {
                matrix[a][b] = row.distance;
                matrix[b][a] = row.distance;
            }
        }

        let mut combined = left_members;
        combined.extend(right_members);
        members.insert(new_id, combined);
    }

    matrix
}

/// Pearson correlation between the original condensed distances and the
/// cophenetic distances implied by the tree. Defined for n >= 3.
pub fn cophenetic_correlation(original: &[Vec<f64>], linkage_matrix: &[LinkageRow]) -> Option<f64> {
    let n = original.len();
    if n < 3 {
        return None;
    }
    let cophenetic = cophenetic_matrix(linkage_matrix, n);
    let x = condensed(original);
    let y = condensed(&cophenetic);
    pearson_correlation(&x, &y)
}

fn cluster_members(labels: &[u32], k: usize) -> Vec<Vec<usize>> {
    let mut groups = vec![Vec::new(); k];
    for (idx, &label) in labels.iter().enumerate() {
        groups[label as usize].push(idx);
    }
    groups
}

/// Mean silhouette coefficient over cosine distances. Defined when
/// `2 <= k < n` and every cluster has at least one element.
pub fn silhouette_score(distances: &[Vec<f64>], labels: &[u32], k: usize) -> Option<f64> {
    let n = distances.len();
    if k < 2 || k >= n {
        return None;
    }
    let groups = cluster_members(labels, k);
    if groups.iter().any(Vec::is_empty) {
        return None;
    }

    let mut total = 0.0;
    for i in 0..n {
        let own = labels[i] as usize;
        let a = if groups[own].len() <= 1 {
            0.0
        } else {
            groups[own]
                .iter()
                .filter(|&&j| j != i)
                .map(|&j| distances[i][j])
                .sum::<f64>()
                / (groups[own].len() - 1) as f64
        };

        let b = (0..k)
            .filter(|&c| c != own)
            .map(|c| groups[c].iter().map(|&j| distances[i][j]).sum::<f64>() / groups[c].len() as f64)
            .fold(f64::INFINITY, f64::min);

        let denom = a.max(b);
        let s_i = if denom <= f64::EPSILON { 0.0 } else { (b - a) / denom };
        total += s_i;
    }

    Some(total / n as f64)
}

fn centroid(vectors: &[Vec<f64>], members: &[usize]) -> Vec<f64> {
    let dim = vectors.first().map_or(0, Vec::len);
    let mut sum = vec![0.0; dim];
    for &idx in members {
        for (d, v) in sum.iter_mut().zip(&vectors[idx]) {
            *d += v;
        }
    }
    let count = members.len().max(1) as f64;
    sum.iter().map(|x| x / count).collect()
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt()
}

/// Davies-Bouldin index (lower is better). Defined when `2 <= k < n`.
pub fn davies_bouldin(vectors: &[Vec<f64>], labels: &[u32], k: usize) -> Option<f64> {
    let n = vectors.len();
    if k < 2 || k >= n {
        return None;
    }
    let groups = cluster_members(labels, k);
    if groups.iter().any(Vec::is_empty) {
        return None;
    }

    let centroids: Vec<Vec<f64>> = groups.iter().map(|g| centroid(vectors, g)).collect();
    let scatter: Vec<f64> = groups
        .iter()
        .zip(&centroids)
        .map(|(g, c)| g.iter().map(|&idx| euclidean(&vectors[idx], c)).sum::<f64>() / g.len() as f64)
        .collect();

    let mut total = 0.0;
    for i in 0..k {
        let worst = (0..k)
            .filter(|&j| j != i)
            .map(|j| {
                let centroid_dist = euclidean(&centroids[i], &centroids[j]);
                if centroid_dist <= f64::EPSILON {
                    f64::INFINITY
                } else {
                    (scatter[i] + scatter[j]) / centroid_dist
                }
            })
            .fold(f64::NEG_INFINITY, f64::max);
        total += worst;
    }

    Some(total / k as f64)
}

/// Calinski-Harabasz index (higher is better). Defined when `2 <= k < n`.
pub fn calinski_harabasz(vectors: &[Vec<f64>], labels: &[u32], k: usize) -> Option<f64> {
    let n = vectors.len();
    if k < 2 || k >= n {
        return None;
    }
    let groups = cluster_members(labels, k);
    if groups.iter().any(Vec::is_empty) {
        return None;
    }

    let all_indices: Vec<usize> = (0..n).collect();
    let overall_centroid = centroid(vectors, &all_indices);
    let centroids: Vec<Vec<f64>> = groups.iter().map(|g| centroid(vectors, g)).collect();

    let between: f64 = groups
        .iter()
        .zip(&centroids)
        .map(|(g, c)| g.len() as f64 * euclidean(c, &overall_centroid).powi(2))
        .sum();

    let within: f64 = groups
        .iter()
        .zip(&centroids)
        .map(|(g, c)| g.iter().map(|&idx| euclidean(&vectors[idx], c).powi(2)).sum::<f64>())
        .sum();

    if within <= f64::EPSILON {
        return None;
    }

    let numerator = between / (k - 1) as f64;
    let denominator = within / (n - k) as f64;
    Some(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pearson_correlation_of_identical_vectors_is_one() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        assert!((pearson_correlation(&x, &x).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn pearson_correlation_undefined_for_constant_vector() {
        let x = vec![1.0, 1.0, 1.0];
        let y = vec![1.0, 2.0, 3.0];
        assert!(pearson_correlation(&x, &y).is_none());
    }

    #[test]
    fn silhouette_undefined_when_k_equals_n() {
        let distances = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let labels = vec![0, 1];
        assert!(silhouette_score(&distances, &labels, 2).is_none());
    }

    #[test]
    fn silhouette_rewards_well_separated_clusters() {
        let distances = vec![
            vec![0.0, 0.05, 0.9, 0.95],
            vec![0.05, 0.0, 0.92, 0.9],
            vec![0.9, 0.92, 0.0, 0.05],
            vec![0.95, 0.9, 0.05, 0.0],
        ];
        let labels = vec![0, 0, 1, 1];
        let score = silhouette_score(&distances, &labels, 2).unwrap();
        assert!(score > 0.7);
    }

    #[test]
    fn davies_bouldin_and_calinski_harabasz_are_defined_for_separated_clusters() {
        let vectors = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![5.0, 5.0],
            vec![5.1, 5.0],
        ];
        let labels = vec![0, 0, 1, 1];
        assert!(davies_bouldin(&vectors, &labels, 2).unwrap() < 1.0);
        assert!(calinski_harabasz(&vectors, &labels, 2).unwrap() > 1.0);
    }
}
