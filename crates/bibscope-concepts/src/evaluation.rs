//! Precision/recall/F1 evaluation of extracted keywords against a reference
//! concept list (spec §4.4.3).

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub exact_matches: usize,
    pub partial_matches: usize,
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// True if `candidate` exactly equals `reference` (case-insensitive) or one
/// contains the other as a substring (spec §4.4.3's "exact OR partial").
fn matches(candidate: &str, reference: &str) -> (bool, bool) {
    let c = normalize(candidate);
    let r = normalize(reference);
    let exact = c == r;
    let partial = !exact && (c.contains(&r) || r.contains(&c));
    (exact, partial)
}

/// Evaluate extracted keywords `e` against reference concepts `r`. Matching
/// is exact OR partial (substring containment), with each counted
/// separately; a reference/extracted item counts toward the intersection
/// at most once. Empty denominators yield a metric value of 0.
pub fn precision_recall_f1(extracted: &[String], reference: &[String]) -> EvaluationResult {
    let mut exact_matches = 0usize;
    let mut partial_matches = 0usize;
    let mut matched_reference_indices = std::collections::HashSet::new();

    for candidate in extracted {
        let mut best: Option<(usize, bool)> = None;
        for (ri, reference_term) in reference.iter().enumerate() {
            if matched_reference_indices.contains(&ri) {
                continue;
            }
            let (exact, partial) = matches(candidate, reference_term);
            if exact {
                best = Some((ri, true));
                break;
            }
            if partial && best.is_none() {
                best = Some((ri, false));
            }
        }
        if let Some((ri, exact)) = best {
            matched_reference_indices.insert(ri);
            if exact {
                exact_matches += 1;
            } else {
                partial_matches += 1;
            }
        }
    }

    let intersection = exact_matches + partial_matches;

    let precision = if extracted.is_empty() {
        0.0
    } else {
        intersection as f64 / extracted.len() as f64
    };
    let recall = if reference.is_empty() {
        0.0
    } else {
        intersection as f64 / reference.len() as f64
    };
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };

    EvaluationResult {
        precision,
        recall,
        f1,
        exact_matches,
        partial_matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_overlap_scores_one() {
        let extracted = vec!["diffusion model".to_string(), "transformer".to_string()];
        let reference = vec!["diffusion model".to_string(), "transformer".to_string()];
        let result = precision_recall_f1(&extracted, &reference);
        assert_eq!(result.precision, 1.0);
        assert_eq!(result.recall, 1.0);
        assert_eq!(result.f1, 1.0);
        assert_eq!(result.exact_matches, 2);
        assert_eq!(result.partial_matches, 0);
    }

    #[test]
    fn partial_substring_match_is_counted_separately() {
        let extracted = vec!["large language model".to_string()];
        let reference = vec!["language model".to_string()];
        let result = precision_recall_f1(&extracted, &reference);
        assert_eq!(result.exact_matches, 0);
        assert_eq!(result.partial_matches, 1);
        assert_eq!(result.precision, 1.0);
    }

    #[test]
    fn empty_extracted_list_yields_zero_precision() {
        let result = precision_recall_f1(&[], &["transformer".to_string()]);
        assert_eq!(result.precision, 0.0);
        assert_eq!(result.recall, 0.0);
        assert_eq!(result.f1, 0.0);
    }

    #[test]
    fn empty_reference_list_yields_zero_recall() {
        let result = precision_recall_f1(&["transformer".to_string()], &[]);
        assert_eq!(result.recall, 0.0);
    }

    #[test]
    fn disjoint_terms_score_zero() {
        let result = precision_recall_f1(&["baseball".to_string()], &["transformer".to_string()]);
        assert_eq!(result.f1, 0.0);
    }
}
