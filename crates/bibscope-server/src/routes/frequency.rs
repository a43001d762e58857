//! Concept / frequency analyzer endpoints (spec §6 `/frequency/...`).

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use bibscope_common::types::{Concept, ConceptFrequency};
use bibscope_concepts::{
    default_vocabulary, extract_keywords, precision_recall_f1, analyze_concepts, EvaluationResult,
    ExtractedKeyword, KeywordMode, DEFAULT_MAX_CONTEXTS_PER_DOC, DEFAULT_WINDOW,
};
use bibscope_vectorize::TfidfParams;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::AppState;

fn resolve_concepts(requested: Option<Vec<Concept>>) -> Vec<Concept> {
    match requested {
        Some(concepts) if !concepts.is_empty() => concepts,
        _ => default_vocabulary(),
    }
}

#[derive(Deserialize)]
pub struct AnalyzeConceptsRequest {
    abstracts: Vec<String>,
    #[serde(default)]
    concepts: Option<Vec<Concept>>,
}

pub async fn analyze_concepts_handler(
    State(_state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeConceptsRequest>,
) -> ApiResult<impl IntoResponse> {
    let concepts = resolve_concepts(request.concepts);
    let results = analyze_concepts(&request.abstracts, &concepts, DEFAULT_WINDOW, DEFAULT_MAX_CONTEXTS_PER_DOC);
    let map: HashMap<String, ConceptFrequency> = results.into_iter().collect();
    Ok(Json(map))
}

#[derive(Deserialize)]
pub struct ExtractKeywordsRequest {
    abstracts: Vec<String>,
    method: KeywordMode,
    #[serde(default = "default_max_keywords")]
    max_keywords: usize,
    #[serde(default)]
    ngram_range: Option<(usize, usize)>,
}

fn default_max_keywords() -> usize {
    20
}

pub async fn extract_keywords_handler(
    State(_state): State<Arc<AppState>>,
    Json(request): Json<ExtractKeywordsRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut params = TfidfParams::default();
    if let Some(range) = request.ngram_range {
        params.ngram_range = range;
    }
    let keywords: Vec<ExtractedKeyword> =
        extract_keywords(&request.abstracts, request.max_keywords, request.method, &params);
    Ok(Json(keywords))
}

#[derive(Deserialize)]
pub struct PrecisionAnalysisRequest {
    abstracts: Vec<String>,
    method: KeywordMode,
    reference_concepts: Vec<String>,
}

pub async fn precision_analysis_handler(
    State(_state): State<Arc<AppState>>,
    Json(request): Json<PrecisionAnalysisRequest>,
) -> ApiResult<impl IntoResponse> {
    let params = TfidfParams::default();
    let extracted = extract_keywords(&request.abstracts, request.reference_concepts.len().max(10), request.method, &params);
    let extracted_terms: Vec<String> = extracted.into_iter().map(|k| k.term).collect();
    let result = precision_recall_f1(&extracted_terms, &request.reference_concepts);
    Ok(Json(result))
}

#[derive(Deserialize)]
pub struct FullReportRequest {
    abstracts: Vec<String>,
    #[serde(default)]
    concepts: Option<Vec<Concept>>,
    method: KeywordMode,
    #[serde(default = "default_max_keywords")]
    max_keywords: usize,
    reference_concepts: Vec<String>,
}

#[derive(Serialize)]
pub struct FullReport {
    concept_frequencies: HashMap<String, ConceptFrequency>,
    keywords: Vec<ExtractedKeyword>,
    evaluation: EvaluationResult,
}

pub async fn full_report_handler(
    State(_state): State<Arc<AppState>>,
    Json(request): Json<FullReportRequest>,
) -> ApiResult<impl IntoResponse> {
    let concepts = resolve_concepts(request.concepts);
    let concept_frequencies: HashMap<String, ConceptFrequency> =
        analyze_concepts(&request.abstracts, &concepts, DEFAULT_WINDOW, DEFAULT_MAX_CONTEXTS_PER_DOC)
            .into_iter()
            .collect();

    let params = TfidfParams::default();
    let keywords = extract_keywords(&request.abstracts, request.max_keywords, request.method, &params);
    let extracted_terms: Vec<String> = keywords.iter().map(|k| k.term.clone()).collect();
    let evaluation = precision_recall_f1(&extracted_terms, &request.reference_concepts);

    Ok(Json(FullReport {
        concept_frequencies,
        keywords,
        evaluation,
    }))
}

pub async fn predefined_concepts() -> impl IntoResponse {
    let concepts = default_vocabulary();
    let mut by_category: HashMap<String, Vec<Concept>> = HashMap::new();
    for concept in concepts {
        let category = concept.category.clone().unwrap_or_else(|| "uncategorized".to_string());
        by_category.entry(category).or_default().push(concept);
    }
    Json(by_category)
}
