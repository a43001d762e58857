//! Shared TF-IDF vectorizer (leaf module, used by similarity §4.3.2,
//! keyword extraction §4.4.2, and clustering §4.5 stage 1).

use std::collections::HashMap;

use bibscope_text::{preprocess, PreprocessConfig, Tokenizer};
use serde::{Deserialize, Serialize};

/// Parameters controlling vocabulary construction (spec §4.3.2, §4.5).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TfidfParams {
    pub max_features: Option<usize>,
    pub ngram_range: (usize, usize),
    /// Minimum number of documents a term must appear in to be kept.
    pub min_df: usize,
    /// Maximum fraction of documents a term may appear in (0.0, 1.0].
    pub max_df: f64,
    pub lowercase: bool,
    pub strip_accents: bool,
    pub remove_stopwords: bool,
}

impl Default for TfidfParams {
    fn default() -> Self {
        Self {
            max_features: Some(1000),
            ngram_range: (1, 1),
            min_df: 1,
            max_df: 1.0,
            lowercase: true,
            strip_accents: true,
            remove_stopwords: true,
        }
    }
}

impl TfidfParams {
    fn preprocess_config(&self) -> PreprocessConfig {
        PreprocessConfig {
            lowercase: self.lowercase,
            strip_accents: self.strip_accents,
            remove_urls_emails_numbers: true,
            remove_punctuation: true,
            tokenizer: Tokenizer::Word,
            remove_stopwords: self.remove_stopwords,
            lemmatize: false,
            min_token_length: 2,
            ngram_range: self.ngram_range,
        }
    }
}

/// A fitted vocabulary with per-term inverse document frequency.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TfidfModel {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    pub terms: Vec<String>,
}

impl TfidfModel {
    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }
}

/// Fit a vectorizer on `docs` and return both the model and the row-major,
/// L2-normalized TF-IDF matrix (one dense row per document).
pub fn fit_transform(docs: &[String], params: &TfidfParams) -> (TfidfModel, Vec<Vec<f64>>) {
    let cfg = params.preprocess_config();
    let tokenized: Vec<Vec<String>> = docs.iter().map(|d| preprocess(d, &cfg)).collect();

    let n_docs = docs.len().max(1);

    let mut doc_freq: HashMap<String, usize> = HashMap::new();
    for tokens in &tokenized {
        let mut seen = std::collections::HashSet::new();
        for t in tokens {
            if seen.insert(t.clone()) {
                *doc_freq.entry(t.clone()).or_insert(0) += 1;
            }
        }
    }

    let max_df_count = ((params.max_df * n_docs as f64).floor() as usize).max(1);

    let mut candidates: Vec<(String, usize)> = doc_freq
        .into_iter()
        .filter(|(_, df)| *df >= params.min_df.max(1) && *df <= max_df_count)
        .collect();

    // Rank by document frequency (descending) then lexicographically for a
    // deterministic tie-break, then cap to max_features.
    candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    if let Some(max_features) = params.max_features {
        candidates.truncate(max_features);
    }

    let mut terms: Vec<String> = candidates.iter().map(|(t, _)| t.clone()).collect();
    terms.sort();

    let vocabulary: HashMap<String, usize> = terms
        .iter()
        .enumerate()
        .map(|(i, t)| (t.clone(), i))
        .collect();

    let df_by_term: HashMap<String, usize> = candidates.into_iter().collect();

    let idf: Vec<f64> = terms
        .iter()
        .map(|t| {
            let df = df_by_term.get(t).copied().unwrap_or(1) as f64;
            ((1.0 + n_docs as f64) / (1.0 + df)).ln() + 1.0
        })
        .collect();

    let model = TfidfModel {
        vocabulary,
        idf,
        terms,
    };

    let matrix: Vec<Vec<f64>> = tokenized.iter().map(|tokens| transform_tokens(tokens, &model)).collect();

    (model, matrix)
}

/// Vectorize already-fitted documents against an existing model.
pub fn transform(docs: &[String], params: &TfidfParams, model: &TfidfModel) -> Vec<Vec<f64>> {
    let cfg = params.preprocess_config();
    docs.iter()
        .map(|d| transform_tokens(&preprocess(d, &cfg), model))
        .collect()
}

fn transform_tokens(tokens: &[String], model: &TfidfModel) -> Vec<f64> {
    let mut counts: HashMap<usize, f64> = HashMap::new();
    for t in tokens {
        if let Some(&idx) = model.vocabulary.get(t) {
            *counts.entry(idx).or_insert(0.0) += 1.0;
        }
    }

    let mut vec = vec![0.0; model.vocabulary_size()];
    for (idx, tf) in counts {
        vec[idx] = tf * model.idf[idx];
    }

    l2_normalize(&mut vec);
    vec
}

pub fn l2_normalize(vec: &mut [f64]) {
    let norm = vec.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > f64::EPSILON {
        for x in vec.iter_mut() {
            *x /= norm;
        }
    }
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// Cosine similarity clamped to [0, 1] (spec §4.3.2: TF-IDF vectors are
/// non-negative, so this should never clamp in practice, but the clamp is
/// required for numerical safety).
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let denom = norm(a) * norm(b);
    if denom <= f64::EPSILON {
        return 0.0;
    }
    (dot(a, b) / denom).clamp(0.0, 1.0)
}

/// Cosine distance (1 - similarity), used by the clustering engine (spec §4.5).
pub fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    1.0 - cosine_similarity(a, b)
}

/// The `top_k` highest-weighted (term, weight) pairs in a TF-IDF row,
/// descending by weight (used by similarity diagnostics §4.3.2).
pub fn top_weighted_terms(row: &[f64], model: &TfidfModel, top_k: usize) -> Vec<(String, f64)> {
    let mut weighted: Vec<(String, f64)> = model
        .terms
        .iter()
        .zip(row)
        .filter(|(_, &w)| w > 0.0)
        .map(|(t, &w)| (t.clone(), w))
        .collect();
    weighted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    weighted.truncate(top_k);
    weighted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_documents_have_cosine_similarity_one() {
        let docs = vec![
            "diffusion models for image synthesis".to_string(),
            "diffusion models for image synthesis".to_string(),
        ];
        let (_, matrix) = fit_transform(&docs, &TfidfParams::default());
        let sim = cosine_similarity(&matrix[0], &matrix[1]);
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_vocabularies_are_orthogonal() {
        let docs = vec![
            "quantum chemistry simulation".to_string(),
            "baseball statistics analytics".to_string(),
        ];
        let (_, matrix) = fit_transform(&docs, &TfidfParams::default());
        let sim = cosine_similarity(&matrix[0], &matrix[1]);
        assert!(sim.abs() < 1e-9);
    }

    #[test]
    fn max_features_bounds_vocabulary_size() {
        let docs = vec![
            "alpha beta gamma delta epsilon zeta".to_string(),
            "eta theta iota kappa lambda mu".to_string(),
        ];
        let mut params = TfidfParams::default();
        params.max_features = Some(3);
        params.remove_stopwords = false;
        let (model, _) = fit_transform(&docs, &params);
        assert!(model.vocabulary_size() <= 3);
    }

    #[test]
    fn transform_reuses_fitted_vocabulary() {
        let docs = vec!["large language model".to_string()];
        let (model, _) = fit_transform(&docs, &TfidfParams::default());
        let unseen = vec!["completely unrelated text".to_string()];
        let rows = transform(&unseen, &TfidfParams::default(), &model);
        assert_eq!(rows[0].len(), model.vocabulary_size());
        assert!(rows[0].iter().all(|&x| x == 0.0));
    }
}
