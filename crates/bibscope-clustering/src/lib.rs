//! Hierarchical clustering engine (spec §4.5): vectorize, pairwise distance,
//! Lance-Williams linkage, tree cut, and quality metrics.

pub mod comparison;
pub mod cut;
pub mod distance;
pub mod linkage;
pub mod metrics;

use bibscope_common::types::{ClusteringResult, DendrogramNode, LinkageMethod, LinkageRow, QualityMetrics};
use bibscope_vectorize::{fit_transform, TfidfParams};

pub use comparison::{compare, MethodComparison};

/// How many clusters to cut the tree into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClusterCount {
    Exact(usize),
    Auto,
}

fn build_dendrogram(linkage_matrix: &[LinkageRow], n: usize) -> Vec<DendrogramNode> {
    linkage_matrix
        .iter()
        .enumerate()
        .map(|(idx, row)| DendrogramNode {
            node_id: n + idx,
            left: row.left,
            right: row.right,
            distance: row.distance,
            size: row.size,
        })
        .collect()
}

/// Run the full pipeline for one linkage method over raw document texts
/// (spec §4.5 stages 1-4).
pub fn cluster(abstracts: &[String], params: &TfidfParams, method: LinkageMethod, count: ClusterCount) -> ClusteringResult {
    let (_, vectors) = fit_transform(abstracts, params);
    let distances = distance::distance_matrix(&vectors);
    let n = abstracts.len();

    let (linkage_matrix, monotonicity_warning) = linkage::linkage(&distances, method);

    let (labels, num_clusters) = match count {
        ClusterCount::Exact(k) => (cut::cut_to_k(&linkage_matrix, n, k), k.clamp(1, n.max(1))),
        ClusterCount::Auto => cut::auto_cut(&linkage_matrix, n, &distances),
    };

    let cophenetic_correlation = metrics::cophenetic_correlation(&distances, &linkage_matrix);
    let silhouette = metrics::silhouette_score(&distances, &labels, num_clusters);
    let davies_bouldin = metrics::davies_bouldin(&vectors, &labels, num_clusters);
    let calinski_harabasz = metrics::calinski_harabasz(&vectors, &labels, num_clusters);

    // Metrics above index clusters 0-based; the reported label vector is
    // 1-based (spec §3: "integers in [1, k]").
    let labels: Vec<u32> = labels.into_iter().map(|l| l + 1).collect();

    ClusteringResult {
        method,
        dendrogram: build_dendrogram(&linkage_matrix, n),
        linkage_matrix,
        labels,
        num_clusters,
        cophenetic_correlation,
        quality: QualityMetrics {
            silhouette,
            davies_bouldin,
            calinski_harabasz,
        },
        monotonicity_warning,
    }
}

/// Run all three linkage methods over the same input and rank them (spec
/// §4.5 "Method comparison").
pub fn compare_methods(abstracts: &[String], params: &TfidfParams, count: ClusterCount) -> MethodComparison {
    let results = [LinkageMethod::Ward, LinkageMethod::Average, LinkageMethod::Complete]
        .into_iter()
        .map(|method| cluster(abstracts, params, method, count))
        .collect();
    comparison::compare(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_abstracts() -> Vec<String> {
        vec![
            "diffusion models generate images via iterative denoising steps".to_string(),
            "denoising diffusion probabilistic models synthesize high quality images".to_string(),
            "transformers use self attention for sequence modeling".to_string(),
            "attention is all you need for sequence to sequence transduction".to_string(),
            "reinforcement learning optimizes an agent's policy via reward signals".to_string(),
            "policy gradient methods train agents using reward feedback".to_string(),
        ]
    }

    #[test]
    fn cluster_with_exact_k_yields_requested_cluster_count() {
        let result = cluster(&sample_abstracts(), &TfidfParams::default(), LinkageMethod::Average, ClusterCount::Exact(3));
        assert_eq!(result.num_clusters, 3);
        assert_eq!(result.labels.len(), 6);
        assert_eq!(result.linkage_matrix.len(), 5);
        assert_eq!(result.dendrogram.len(), 5);
    }

    #[test]
    fn cluster_with_auto_picks_k_in_valid_range() {
        let result = cluster(&sample_abstracts(), &TfidfParams::default(), LinkageMethod::Average, ClusterCount::Auto);
        assert!(result.num_clusters >= 2 && result.num_clusters <= 6);
    }

    #[test]
    fn cophenetic_correlation_is_defined_for_six_documents() {
        let result = cluster(&sample_abstracts(), &TfidfParams::default(), LinkageMethod::Complete, ClusterCount::Exact(3));
        assert!(result.cophenetic_correlation.is_some());
    }

    #[test]
    fn compare_methods_returns_all_three_with_a_recommendation() {
        let comparison = compare_methods(&sample_abstracts(), &TfidfParams::default(), ClusterCount::Exact(3));
        assert_eq!(comparison.results.len(), 3);
        assert_eq!(comparison.composite_scores.len(), 3);
    }
}
