//! Jaccard similarity, token-set or character-n-gram mode (spec §4.3.3).

use std::collections::HashSet;

use bibscope_text::{preprocess, PreprocessConfig};
use serde_json::json;

use crate::common::{validate_inputs, AnalysisDetail, SimilarityOutcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JaccardMode {
    Token,
    CharNgram(usize),
}

impl Default for JaccardMode {
    fn default() -> Self {
        Self::Token
    }
}

fn token_set(text: &str) -> HashSet<String> {
    preprocess(text, &PreprocessConfig::default()).into_iter().collect()
}

fn char_ngram_set(text: &str, n: usize) -> HashSet<String> {
    let chars: Vec<char> = text.to_lowercase().chars().collect();
    if chars.len() < n {
        return [chars.into_iter().collect::<String>()].into_iter().collect();
    }
    chars
        .windows(n)
        .map(|w| w.iter().collect::<String>())
        .collect()
}

fn build_sets(text1: &str, text2: &str, mode: JaccardMode) -> (HashSet<String>, HashSet<String>) {
    match mode {
        JaccardMode::Token => (token_set(text1), token_set(text2)),
        JaccardMode::CharNgram(n) => (char_ngram_set(text1, n), char_ngram_set(text2, n)),
    }
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        1.0
    } else {
        intersection as f64 / union as f64
    }
}

pub fn similarity(text1: &str, text2: &str, mode: JaccardMode) -> f64 {
    let (a, b, short_circuit) = validate_inputs(text1, text2);
    if let Some(v) = short_circuit {
        return v;
    }
    let (set_a, set_b) = build_sets(&a, &b, mode);
    jaccard(&set_a, &set_b)
}

pub fn outcome(text1: &str, text2: &str, mode: JaccardMode) -> SimilarityOutcome {
    let sim = similarity(text1, text2, mode);
    SimilarityOutcome {
        algorithm: "jaccard".to_string(),
        similarity: sim,
        details: json!({}),
    }
}

pub fn analyze(text1: &str, text2: &str, mode: JaccardMode) -> AnalysisDetail {
    let (a, b, short_circuit) = validate_inputs(text1, text2);

    if let Some(sim) = short_circuit {
        return AnalysisDetail {
            algorithm: "jaccard".to_string(),
            similarity: sim,
            intermediate: json!({}),
            explanation: "at least one input is empty after trimming".to_string(),
        };
    }

    let (set_a, set_b) = build_sets(&a, &b, mode);
    let sim = jaccard(&set_a, &set_b);

    let intersection: Vec<&String> = set_a.intersection(&set_b).collect();
    let union_size = set_a.union(&set_b).count();

    AnalysisDetail {
        algorithm: "jaccard".to_string(),
        similarity: sim,
        intermediate: json!({
            "size_a": set_a.len(),
            "size_b": set_b.len(),
            "intersection_size": intersection.len(),
            "union_size": union_size,
            "sample_overlap": intersection.iter().take(10).collect::<Vec<_>>(),
        }),
        explanation: format!(
            "{} shared of {} total distinct items ({:.4} Jaccard)",
            intersection.len(),
            union_size,
            sim
        ),
    }
}
