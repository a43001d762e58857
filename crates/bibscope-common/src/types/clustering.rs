use serde::{Deserialize, Serialize};

/// Linkage method (spec §4.5).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkageMethod {
    Ward,
    Average,
    Complete,
}

impl LinkageMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ward => "ward",
            Self::Average => "average",
            Self::Complete => "complete",
        }
    }
}

/// One row of a SciPy-style linkage matrix: two merged node ids, the merge
/// distance, and the resulting cluster size (spec §3, GLOSSARY).
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LinkageRow {
    pub left: usize,
    pub right: usize,
    pub distance: f64,
    pub size: usize,
}

/// A node in the reconstructed merge tree, sufficient for external rendering
/// (spec §4.5 "Dendrogram output").
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DendrogramNode {
    pub node_id: usize,
    pub left: usize,
    pub right: usize,
    pub distance: f64,
    pub size: usize,
}

/// Quality metrics for a clustering cut (spec §3, §4.5). Each may be `None`
/// when undefined for the current `k` or cluster sizes.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct QualityMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silhouette: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub davies_bouldin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calinski_harabasz: Option<f64>,
}

/// Full result of one hierarchical clustering run (spec §3).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClusteringResult {
    pub method: LinkageMethod,
    pub linkage_matrix: Vec<LinkageRow>,
    pub labels: Vec<u32>,
    pub num_clusters: usize,
    pub cophenetic_correlation: Option<f64>,
    pub quality: QualityMetrics,
    pub dendrogram: Vec<DendrogramNode>,
    /// True when the Lance-Williams update produced a non-monotone merge
    /// sequence (expected possibility for Ward under cosine input, spec §8).
    pub monotonicity_warning: bool,
}
