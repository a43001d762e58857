//! Text similarity endpoints (spec §6 `/similarity/...`).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use bibscope_similarity::{dispatch, SimilarityAlgorithm};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::AppState;

#[derive(Deserialize)]
pub struct CompareRequest {
    text1: String,
    text2: String,
    #[serde(flatten)]
    algorithm: SimilarityAlgorithm,
}

#[derive(Serialize)]
pub struct CompareResponse {
    algorithm: String,
    similarity: f64,
    distance: f64,
    execution_time_s: f64,
    details: serde_json::Value,
}

pub async fn compare(
    State(_state): State<Arc<AppState>>,
    Json(request): Json<CompareRequest>,
) -> ApiResult<impl IntoResponse> {
    let start = Instant::now();
    let outcome = dispatch(&request.algorithm, &request.text1, &request.text2)?;
    let execution_time_s = start.elapsed().as_secs_f64();

    Ok(Json(CompareResponse {
        algorithm: outcome.algorithm,
        similarity: outcome.similarity,
        distance: 1.0 - outcome.similarity,
        execution_time_s,
        details: outcome.details,
    }))
}

#[derive(Deserialize)]
pub struct CompareAllRequest {
    text1: String,
    text2: String,
}

fn all_algorithms() -> Vec<SimilarityAlgorithm> {
    vec![
        SimilarityAlgorithm::Levenshtein,
        SimilarityAlgorithm::TfidfCosine,
        SimilarityAlgorithm::Jaccard { char_ngram: None },
        SimilarityAlgorithm::Ngram { n: 3, unit: Default::default() },
        SimilarityAlgorithm::BertEmbedding,
        SimilarityAlgorithm::SentenceEmbedding,
    ]
}

pub async fn compare_all(
    State(_state): State<Arc<AppState>>,
    Json(request): Json<CompareAllRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut results = HashMap::new();
    for algorithm in all_algorithms() {
        let outcome = dispatch(&algorithm, &request.text1, &request.text2)?;
        results.insert(outcome.algorithm.clone(), outcome);
    }
    Ok(Json(results))
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    text1: String,
    text2: String,
    #[serde(flatten)]
    algorithm: SimilarityAlgorithm,
}

pub async fn analyze(
    State(_state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<impl IntoResponse> {
    let detail = request.algorithm.analyze_step_by_step(&request.text1, &request.text2)?;
    Ok(Json(detail))
}

#[derive(Deserialize)]
pub struct BatchRequest {
    pairs: Vec<(String, String)>,
    #[serde(flatten)]
    algorithm: SimilarityAlgorithm,
}

pub async fn batch(
    State(_state): State<Arc<AppState>>,
    Json(request): Json<BatchRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut outcomes = Vec::with_capacity(request.pairs.len());
    for (a, b) in &request.pairs {
        outcomes.push(dispatch(&request.algorithm, a, b)?);
    }
    Ok(Json(outcomes))
}

#[derive(Serialize)]
pub struct AlgorithmDescriptor {
    name: &'static str,
    kind: &'static str,
    description: &'static str,
}

pub async fn algorithms() -> impl IntoResponse {
    Json(vec![
        AlgorithmDescriptor {
            name: "levenshtein",
            kind: "classical",
            description: "Normalized edit distance similarity.",
        },
        AlgorithmDescriptor {
            name: "tfidf_cosine",
            kind: "classical",
            description: "Cosine similarity over TF-IDF vectors.",
        },
        AlgorithmDescriptor {
            name: "jaccard",
            kind: "classical",
            description: "Token or character n-gram set overlap.",
        },
        AlgorithmDescriptor {
            name: "ngram",
            kind: "classical",
            description: "Character or word n-gram Jaccard overlap.",
        },
        AlgorithmDescriptor {
            name: "bert_embedding",
            kind: "neural",
            description: "Mean-pooled transformer embedding cosine similarity.",
        },
        AlgorithmDescriptor {
            name: "sentence_embedding",
            kind: "neural",
            description: "Sentence-transformer siamese encoder cosine similarity.",
        },
    ])
}
