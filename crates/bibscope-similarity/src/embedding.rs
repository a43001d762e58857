//! Transformer-based embeddings: BERT-style mean pooling (spec §4.3.5) and
//! the lighter Sentence-Transformer variant (spec §4.3.6).
//!
//! Grounded in `FastEmbedEmbedder` (mcp-agent-mail-rust): ONNX inference via
//! `fastembed`, guarded by a `Mutex` and lazily loaded into a process-wide
//! `OnceLock` so the model is downloaded/initialized at most once.

use std::sync::{Mutex, OnceLock};

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use serde_json::json;

use crate::common::{validate_inputs, AnalysisDetail, SimilarityOutcome};

/// Pooling strategy for the BERT-style embedder (spec §4.3.5's tie-break
/// knob). `fastembed` mean-pools internally; `Cls` is recorded for API
/// completeness and documented as degrading to mean pooling underneath.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolingStrategy {
    Mean,
    Cls,
}

impl Default for PoolingStrategy {
    fn default() -> Self {
        Self::Mean
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbeddingTier {
    /// Bidirectional encoder, mean-pooled (spec §4.3.5).
    Bert,
    /// Smaller siamese encoder, pre-normalized output (spec §4.3.6).
    SentenceTransformer,
}

struct LoadedModel {
    model: Mutex<TextEmbedding>,
    dimension: usize,
}

static BERT_MODEL: OnceLock<Option<LoadedModel>> = OnceLock::new();
static SENTENCE_MODEL: OnceLock<Option<LoadedModel>> = OnceLock::new();

fn load(model: EmbeddingModel, id: &str, dimension: usize) -> Option<LoadedModel> {
    let options = InitOptions::new(model).with_show_download_progress(false);
    match TextEmbedding::try_new(options) {
        Ok(text_embedding) => {
            tracing::info!(model = id, dimension, "embedding model loaded");
            Some(LoadedModel {
                model: Mutex::new(text_embedding),
                dimension,
            })
        }
        Err(e) => {
            tracing::warn!(model = id, error = %e, "failed to load embedding model");
            None
        }
    }
}

fn bert_model() -> Option<&'static LoadedModel> {
    BERT_MODEL
        .get_or_init(|| load(EmbeddingModel::BGESmallENV15, "bge-small-en-v1.5", 384))
        .as_ref()
}

fn sentence_model() -> Option<&'static LoadedModel> {
    SENTENCE_MODEL
        .get_or_init(|| load(EmbeddingModel::AllMiniLML6V2, "all-MiniLM-L6-v2", 384))
        .as_ref()
}

fn model_for(tier: EmbeddingTier) -> Option<&'static LoadedModel> {
    match tier {
        EmbeddingTier::Bert => bert_model(),
        EmbeddingTier::SentenceTransformer => sentence_model(),
    }
}

fn embed_one(loaded: &LoadedModel, text: &str) -> Result<Vec<f32>, String> {
    let model = loaded
        .model
        .lock()
        .map_err(|_| "embedding model mutex poisoned".to_string())?;
    let embeddings = model
        .embed(vec![text], None)
        .map_err(|e| format!("embedding inference failed: {e}"))?;
    embeddings
        .into_iter()
        .next()
        .ok_or_else(|| "embedding model returned no vector".to_string())
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    let na = l2_norm(a);
    let nb = l2_norm(b);
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    let raw = (dot(a, b) / (na * nb)) as f64;
    raw.max(0.0).min(1.0)
}

pub fn similarity(text1: &str, text2: &str, tier: EmbeddingTier) -> Result<f64, String> {
    let (a, b, short_circuit) = validate_inputs(text1, text2);
    if let Some(v) = short_circuit {
        return Ok(v);
    }
    let loaded = model_for(tier).ok_or_else(|| "embedding model unavailable".to_string())?;
    let va = embed_one(loaded, &a)?;
    let vb = embed_one(loaded, &b)?;
    Ok(cosine(&va, &vb))
}

pub fn outcome(text1: &str, text2: &str, tier: EmbeddingTier) -> Result<SimilarityOutcome, String> {
    let sim = similarity(text1, text2, tier)?;
    let algorithm = match tier {
        EmbeddingTier::Bert => "bert_embedding",
        EmbeddingTier::SentenceTransformer => "sentence_embedding",
    };
    Ok(SimilarityOutcome {
        algorithm: algorithm.to_string(),
        similarity: sim,
        details: json!({}),
    })
}

pub fn analyze(text1: &str, text2: &str, tier: EmbeddingTier) -> Result<AnalysisDetail, String> {
    let algorithm = match tier {
        EmbeddingTier::Bert => "bert_embedding",
        EmbeddingTier::SentenceTransformer => "sentence_embedding",
    };
    let (a, b, short_circuit) = validate_inputs(text1, text2);

    if let Some(sim) = short_circuit {
        return Ok(AnalysisDetail {
            algorithm: algorithm.to_string(),
            similarity: sim,
            intermediate: json!({}),
            explanation: "at least one input is empty after trimming".to_string(),
        });
    }

    let loaded = model_for(tier).ok_or_else(|| "embedding model unavailable".to_string())?;
    let va = embed_one(loaded, &a)?;
    let vb = embed_one(loaded, &b)?;
    let sim = cosine(&va, &vb);

    Ok(AnalysisDetail {
        algorithm: algorithm.to_string(),
        similarity: sim,
        intermediate: json!({
            "dimension": loaded.dimension,
            "norm_text1": l2_norm(&va),
            "norm_text2": l2_norm(&vb),
            "pooling": match tier {
                EmbeddingTier::Bert => "mean",
                EmbeddingTier::SentenceTransformer => "pre_normalized",
            },
        }),
        explanation: format!(
            "cosine similarity {:.4} between {}-dimensional embeddings",
            sim, loaded.dimension
        ),
    })
}

/// Returns `true` once either embedding tier has been successfully loaded,
/// without forcing a load if neither has been touched yet.
pub fn is_any_model_loaded() -> bool {
    BERT_MODEL.get().map(Option::is_some).unwrap_or(false)
        || SENTENCE_MODEL.get().map(Option::is_some).unwrap_or(false)
}
