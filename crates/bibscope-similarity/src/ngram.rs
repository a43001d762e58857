//! N-gram overlap similarity: Dice, Jaccard, or cosine over n-gram multisets
//! (spec §4.3.4). Dice is the default returned by `similarity()`.

use std::collections::HashMap;

use bibscope_text::{preprocess, PreprocessConfig};
use serde_json::json;

use crate::common::{validate_inputs, AnalysisDetail, SimilarityOutcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NgramUnit {
    Word,
    Char,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NgramMetric {
    Dice,
    Jaccard,
    Cosine,
}

fn word_ngrams(text: &str, n: usize) -> HashMap<String, u32> {
    let tokens = preprocess(text, &PreprocessConfig::default());
    let mut counts = HashMap::new();
    if tokens.len() < n {
        return counts;
    }
    for window in tokens.windows(n) {
        *counts.entry(window.join(" ")).or_insert(0u32) += 1;
    }
    counts
}

fn char_ngrams(text: &str, n: usize) -> HashMap<String, u32> {
    let chars: Vec<char> = text.to_lowercase().chars().collect();
    let mut counts = HashMap::new();
    if chars.len() < n {
        return counts;
    }
    for window in chars.windows(n) {
        *counts.entry(window.iter().collect::<String>()).or_insert(0u32) += 1;
    }
    counts
}

fn build_counts(text: &str, n: usize, unit: NgramUnit) -> HashMap<String, u32> {
    match unit {
        NgramUnit::Word => word_ngrams(text, n),
        NgramUnit::Char => char_ngrams(text, n),
    }
}

fn intersection_size(a: &HashMap<String, u32>, b: &HashMap<String, u32>) -> u32 {
    a.iter()
        .map(|(gram, &count_a)| count_a.min(*b.get(gram).unwrap_or(&0)))
        .sum()
}

fn total(counts: &HashMap<String, u32>) -> u32 {
    counts.values().sum()
}

fn score(a: &HashMap<String, u32>, b: &HashMap<String, u32>, metric: NgramMetric) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let shared = intersection_size(a, b) as f64;
    let total_a = total(a) as f64;
    let total_b = total(b) as f64;

    match metric {
        NgramMetric::Dice => {
            if total_a + total_b == 0.0 {
                1.0
            } else {
                2.0 * shared / (total_a + total_b)
            }
        }
        NgramMetric::Jaccard => {
            let union: f64 = total_a + total_b - shared;
            if union == 0.0 {
                1.0
            } else {
                shared / union
            }
        }
        NgramMetric::Cosine => {
            let denom = total_a.sqrt() * total_b.sqrt();
            if denom == 0.0 {
                1.0
            } else {
                shared / denom
            }
        }
    }
}

pub fn similarity(text1: &str, text2: &str, n: usize, unit: NgramUnit) -> f64 {
    let (a, b, short_circuit) = validate_inputs(text1, text2);
    if let Some(v) = short_circuit {
        return v;
    }
    let counts_a = build_counts(&a, n, unit);
    let counts_b = build_counts(&b, n, unit);
    score(&counts_a, &counts_b, NgramMetric::Dice)
}

pub fn outcome(text1: &str, text2: &str, n: usize, unit: NgramUnit) -> SimilarityOutcome {
    let sim = similarity(text1, text2, n, unit);
    SimilarityOutcome {
        algorithm: "ngram".to_string(),
        similarity: sim,
        details: json!({ "n": n }),
    }
}

pub fn analyze(text1: &str, text2: &str, n: usize, unit: NgramUnit) -> AnalysisDetail {
    let (a, b, short_circuit) = validate_inputs(text1, text2);

    if let Some(sim) = short_circuit {
        return AnalysisDetail {
            algorithm: "ngram".to_string(),
            similarity: sim,
            intermediate: json!({}),
            explanation: "at least one input is empty after trimming".to_string(),
        };
    }

    let counts_a = build_counts(&a, n, unit);
    let counts_b = build_counts(&b, n, unit);

    let dice = score(&counts_a, &counts_b, NgramMetric::Dice);
    let jaccard = score(&counts_a, &counts_b, NgramMetric::Jaccard);
    let cosine = score(&counts_a, &counts_b, NgramMetric::Cosine);
    let shared = intersection_size(&counts_a, &counts_b);

    AnalysisDetail {
        algorithm: "ngram".to_string(),
        similarity: dice,
        intermediate: json!({
            "n": n,
            "unit": match unit { NgramUnit::Word => "word", NgramUnit::Char => "char" },
            "ngrams_text1": total(&counts_a),
            "ngrams_text2": total(&counts_b),
            "shared_ngrams": shared,
            "dice": dice,
            "jaccard": jaccard,
            "cosine": cosine,
        }),
        explanation: format!(
            "{}-gram overlap over {} units: dice {:.4}, jaccard {:.4}, cosine {:.4}",
            n,
            match unit { NgramUnit::Word => "word", NgramUnit::Char => "char" },
            dice,
            jaccard,
            cosine
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_text_is_one() {
        assert!((similarity("neural network training", "neural network training", 2, NgramUnit::Word) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_text_is_zero() {
        assert_eq!(similarity("alpha beta gamma", "delta epsilon zeta", 2, NgramUnit::Word), 0.0);
    }

    #[test]
    fn char_bigrams_catch_partial_overlap() {
        let sim = similarity("night", "nacht", 2, NgramUnit::Char);
        assert!(sim > 0.0 && sim < 1.0);
    }

    #[test]
    fn empty_vs_empty_is_one() {
        assert_eq!(similarity("", "", 2, NgramUnit::Word), 1.0);
    }
}
