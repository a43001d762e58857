//! Text similarity engine (spec §4.3): six interchangeable algorithms behind
//! a uniform `similarity` / `analyze_step_by_step` contract.

pub mod common;
pub mod embedding;
pub mod jaccard;
pub mod levenshtein;
pub mod ngram;
pub mod tfidf_cosine;

use bibscope_common::BibscopeError;
use serde::{Deserialize, Serialize};

pub use common::{AnalysisDetail, SimilarityOutcome};
pub use embedding::{EmbeddingTier, PoolingStrategy};
pub use jaccard::JaccardMode;
pub use ngram::NgramUnit;

/// Tagged algorithm selector, dispatched over at the API boundary (spec §9).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum SimilarityAlgorithm {
    Levenshtein,
    TfidfCosine,
    Jaccard {
        #[serde(default)]
        char_ngram: Option<usize>,
    },
    Ngram {
        #[serde(default = "default_ngram_n")]
        n: usize,
        #[serde(default)]
        unit: NgramUnitDto,
    },
    BertEmbedding,
    SentenceEmbedding,
}

fn default_ngram_n() -> usize {
    3
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NgramUnitDto {
    #[default]
    Character,
    Word,
}

impl From<NgramUnitDto> for NgramUnit {
    fn from(value: NgramUnitDto) -> Self {
        match value {
            NgramUnitDto::Character => NgramUnit::Char,
            NgramUnitDto::Word => NgramUnit::Word,
        }
    }
}

impl SimilarityAlgorithm {
    fn jaccard_mode(char_ngram: Option<usize>) -> JaccardMode {
        match char_ngram {
            Some(n) if n > 0 => JaccardMode::CharNgram(n),
            _ => JaccardMode::Token,
        }
    }

    /// Compute just the scalar similarity, per spec §4.3's uniform contract.
    pub fn similarity(&self, text1: &str, text2: &str) -> Result<f64, BibscopeError> {
        match *self {
            Self::Levenshtein => Ok(levenshtein::similarity(text1, text2)),
            Self::TfidfCosine => Ok(tfidf_cosine::similarity(text1, text2)),
            Self::Jaccard { char_ngram } => {
                Ok(jaccard::similarity(text1, text2, Self::jaccard_mode(char_ngram)))
            }
            Self::Ngram { n, unit } => Ok(ngram::similarity(text1, text2, n, unit.into())),
            Self::BertEmbedding => embedding::similarity(text1, text2, EmbeddingTier::Bert)
                .map_err(BibscopeError::computation),
            Self::SentenceEmbedding => {
                embedding::similarity(text1, text2, EmbeddingTier::SentenceTransformer)
                    .map_err(BibscopeError::computation)
            }
        }
    }

    /// Compute the scalar similarity plus the algorithm-specific diagnostic.
    pub fn analyze_step_by_step(&self, text1: &str, text2: &str) -> Result<AnalysisDetail, BibscopeError> {
        match *self {
            Self::Levenshtein => Ok(levenshtein::analyze(text1, text2)),
            Self::TfidfCosine => Ok(tfidf_cosine::analyze(text1, text2)),
            Self::Jaccard { char_ngram } => {
                Ok(jaccard::analyze(text1, text2, Self::jaccard_mode(char_ngram)))
            }
            Self::Ngram { n, unit } => Ok(ngram::analyze(text1, text2, n, unit.into())),
            Self::BertEmbedding => {
                embedding::analyze(text1, text2, EmbeddingTier::Bert).map_err(BibscopeError::computation)
            }
            Self::SentenceEmbedding => {
                embedding::analyze(text1, text2, EmbeddingTier::SentenceTransformer)
                    .map_err(BibscopeError::computation)
            }
        }
    }

    /// The wire-facing algorithm name, matching the `#[serde(tag = "algorithm")]` value.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Levenshtein => "levenshtein",
            Self::TfidfCosine => "tfidf_cosine",
            Self::Jaccard { .. } => "jaccard",
            Self::Ngram { .. } => "ngram",
            Self::BertEmbedding => "bert_embedding",
            Self::SentenceEmbedding => "sentence_embedding",
        }
    }
}

/// Dispatch a request by tag, rejecting unknown algorithm names at the
/// boundary rather than deep inside a match arm (spec §9).
pub fn dispatch(algorithm: &SimilarityAlgorithm, text1: &str, text2: &str) -> Result<SimilarityOutcome, BibscopeError> {
    let similarity = algorithm.similarity(text1, text2)?;
    Ok(SimilarityOutcome {
        algorithm: algorithm.name().to_string(),
        similarity,
        details: serde_json::json!({}),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_routes_to_levenshtein() {
        let algo = SimilarityAlgorithm::Levenshtein;
        let outcome = dispatch(&algo, "kitten", "sitting").unwrap();
        assert_eq!(outcome.algorithm, "levenshtein");
        assert!(outcome.similarity > 0.0 && outcome.similarity < 1.0);
    }

    #[test]
    fn dispatch_routes_to_jaccard_char_ngram_mode() {
        let algo = SimilarityAlgorithm::Jaccard { char_ngram: Some(3) };
        let outcome = dispatch(&algo, "neural networks", "neural networks").unwrap();
        assert_eq!(outcome.similarity, 1.0);
    }

    #[test]
    fn ngram_default_n_is_three() {
        let json = r#"{"algorithm":"ngram"}"#;
        let algo: SimilarityAlgorithm = serde_json::from_str(json).unwrap();
        match algo {
            SimilarityAlgorithm::Ngram { n, unit } => {
                assert_eq!(n, 3);
                assert_eq!(unit, NgramUnitDto::Character);
            }
            _ => panic!("expected Ngram variant"),
        }
    }

    #[test]
    fn unknown_algorithm_tag_fails_to_deserialize() {
        let json = r#"{"algorithm":"not_a_real_algorithm"}"#;
        let result: Result<SimilarityAlgorithm, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
