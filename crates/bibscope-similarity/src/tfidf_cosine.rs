//! TF-IDF + cosine similarity (spec §4.3.2).

use bibscope_vectorize::{cosine_similarity, dot, norm, top_weighted_terms, TfidfParams};
use serde_json::json;

use crate::common::{validate_inputs, AnalysisDetail, SimilarityOutcome};

fn params() -> TfidfParams {
    TfidfParams {
        max_features: Some(5000),
        ngram_range: (1, 1),
        min_df: 1,
        max_df: 1.0,
        lowercase: true,
        strip_accents: true,
        remove_stopwords: true,
    }
}

pub fn similarity(text1: &str, text2: &str) -> f64 {
    let (a, b, short_circuit) = validate_inputs(text1, text2);
    if let Some(v) = short_circuit {
        return v;
    }

    // Fit on the pair as the entire corpus, per spec §4.3.2.
    let (_, matrix) = bibscope_vectorize::fit_transform(&[a, b], &params());
    cosine_similarity(&matrix[0], &matrix[1])
}

pub fn outcome(text1: &str, text2: &str) -> SimilarityOutcome {
    let sim = similarity(text1, text2);
    SimilarityOutcome {
        algorithm: "tfidf_cosine".to_string(),
        similarity: sim,
        details: json!({}),
    }
}

pub fn analyze(text1: &str, text2: &str) -> AnalysisDetail {
    let (a, b, short_circuit) = validate_inputs(text1, text2);

    if let Some(sim) = short_circuit {
        return AnalysisDetail {
            algorithm: "tfidf_cosine".to_string(),
            similarity: sim,
            intermediate: json!({}),
            explanation: "at least one input is empty after trimming".to_string(),
        };
    }

    let (model, matrix) = bibscope_vectorize::fit_transform(&[a, b], &params());
    let (v1, v2) = (&matrix[0], &matrix[1]);

    let n1 = norm(v1);
    let n2 = norm(v2);
    let d = dot(v1, v2);
    let sim = cosine_similarity(v1, v2);
    let angle_degrees = sim.clamp(-1.0, 1.0).acos().to_degrees();

    let top1 = top_weighted_terms(v1, &model, 5);
    let top2 = top_weighted_terms(v2, &model, 5);

    AnalysisDetail {
        algorithm: "tfidf_cosine".to_string(),
        similarity: sim,
        intermediate: json!({
            "norm_text1": n1,
            "norm_text2": n2,
            "dot_product": d,
            "angle_degrees": angle_degrees,
            "vocabulary_size": model.vocabulary_size(),
            "top_terms_text1": top1,
            "top_terms_text2": top2,
        }),
        explanation: format!(
            "cosine similarity {:.4} corresponds to an angle of {:.2} degrees between the two TF-IDF vectors",
            sim, angle_degrees
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_text_is_one() {
        let sim = similarity("abstract A", "abstract A");
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_text_is_zero() {
        let sim = similarity("quantum chemistry", "baseball statistics");
        assert!(sim.abs() < 1e-9);
    }

    #[test]
    fn empty_vs_empty_is_one() {
        assert_eq!(similarity("", ""), 1.0);
    }
}
