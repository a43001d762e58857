use serde::Serialize;

/// Uniform result of `similarity(text1, text2)` (spec §4.3).
#[derive(Clone, Debug, Serialize)]
pub struct SimilarityOutcome {
    pub algorithm: String,
    pub similarity: f64,
    pub details: serde_json::Value,
}

/// Uniform result of `analyze_step_by_step(text1, text2)` (spec §4.3).
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisDetail {
    pub algorithm: String,
    pub similarity: f64,
    pub intermediate: serde_json::Value,
    pub explanation: String,
}

/// Shared input-validation rule (spec §4.3): texts are trimmed; an empty
/// text compared with an empty text yields 1.0; an empty text compared with
/// a non-empty text yields 0.0. Returns `Some(short_circuit_value)` when the
/// algorithm should not run, `None` when both trimmed texts are non-empty.
pub fn validate_inputs(text1: &str, text2: &str) -> (String, String, Option<f64>) {
    let a = text1.trim().to_string();
    let b = text2.trim().to_string();

    let outcome = match (a.is_empty(), b.is_empty()) {
        (true, true) => Some(1.0),
        (true, false) | (false, true) => Some(0.0),
        (false, false) => None,
    };

    (a, b, outcome)
}
