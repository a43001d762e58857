//! Method comparison across Ward / Average / Complete linkage, with a
//! weighted composite score recommending the best method (spec §4.5).

use bibscope_common::types::{ClusteringResult, LinkageMethod};
use serde::{Deserialize, Serialize};

const WEIGHT_COPHENETIC: f64 = 0.40;
const WEIGHT_SILHOUETTE: f64 = 0.30;
const WEIGHT_DAVIES_BOULDIN: f64 = 0.15;
const WEIGHT_CALINSKI_HARABASZ: f64 = 0.15;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MethodComparison {
    pub results: Vec<ClusteringResult>,
    pub composite_scores: Vec<(LinkageMethod, f64)>,
    pub recommended: LinkageMethod,
}

fn normalize(values: &[Option<f64>], invert: bool) -> Vec<f64> {
    let present: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    if present.is_empty() {
        return vec![0.0; values.len()];
    }
    let min = present.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = present.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    values
        .iter()
        .map(|v| match v {
            None => 0.0,
            Some(x) => {
                if (max - min).abs() <= f64::EPSILON {
                    1.0
                } else if invert {
                    (max - x) / (max - min)
                } else {
                    (x - min) / (max - min)
                }
            }
        })
        .collect()
}

/// Score and rank a set of per-method clustering results (spec §4.5
/// "Method comparison"): cophenetic 0.40, silhouette 0.30, Davies-Bouldin
/// (inverted, normalized) 0.15, Calinski-Harabasz (normalized) 0.15.
pub fn compare(results: Vec<ClusteringResult>) -> MethodComparison {
    let cophenetic: Vec<Option<f64>> = results.iter().map(|r| r.cophenetic_correlation).collect();
    let silhouette: Vec<Option<f64>> = results.iter().map(|r| r.quality.silhouette).collect();
    let davies_bouldin: Vec<Option<f64>> = results.iter().map(|r| r.quality.davies_bouldin).collect();
    let calinski_harabasz: Vec<Option<f64>> = results.iter().map(|r| r.quality.calinski_harabasz).collect();

    let norm_cophenetic = normalize(&cophenetic, false);
    let norm_silhouette = normalize(&silhouette, false);
    let norm_db = normalize(&davies_bouldin, true);
    let norm_ch = normalize(&calinski_harabasz, false);

    let composite_scores: Vec<(LinkageMethod, f64)> = results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let score = WEIGHT_COPHENETIC * norm_cophenetic[i]
                + WEIGHT_SILHOUETTE * norm_silhouette[i]
                + WEIGHT_DAVIES_BOULDIN * norm_db[i]
                + WEIGHT_CALINSKI_HARABASZ * norm_ch[i];
            (r.method, score)
        })
        .collect();

    let recommended = composite_scores
        .iter()
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(method, _)| *method)
        .unwrap_or(LinkageMethod::Average);

    MethodComparison {
        results,
        composite_scores,
        recommended,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bibscope_common::types::{DendrogramNode, QualityMetrics};

    fn result(method: LinkageMethod, cophenetic: f64, silhouette: f64, db: f64, ch: f64) -> ClusteringResult {
        ClusteringResult {
            method,
            linkage_matrix: Vec::new(),
            labels: Vec::new(),
            num_clusters: 2,
            cophenetic_correlation: Some(cophenetic),
            quality: QualityMetrics {
                silhouette: Some(silhouette),
                davies_bouldin: Some(db),
                calinski_harabasz: Some(ch),
            },
            dendrogram: Vec::<DendrogramNode>::new(),
            monotonicity_warning: false,
        }
    }

    #[test]
    fn recommends_the_dominating_method() {
        let results = vec![
            result(LinkageMethod::Ward, 0.9, 0.8, 0.2, 50.0),
            result(LinkageMethod::Average, 0.5, 0.4, 0.8, 10.0),
            result(LinkageMethod::Complete, 0.6, 0.5, 0.6, 20.0),
        ];
        let comparison = compare(results);
        assert_eq!(comparison.recommended, LinkageMethod::Ward);
    }

    #[test]
    fn composite_scores_cover_every_method() {
        let results = vec![
            result(LinkageMethod::Ward, 0.7, 0.6, 0.5, 30.0),
            result(LinkageMethod::Average, 0.7, 0.6, 0.5, 30.0),
            result(LinkageMethod::Complete, 0.7, 0.6, 0.5, 30.0),
        ];
        let comparison = compare(results);
        assert_eq!(comparison.composite_scores.len(), 3);
    }
}
