//! Automatic keyword extraction (spec §4.4.2): tfidf, frequency, or combined.

use std::collections::HashMap;

use bibscope_text::{preprocess, PreprocessConfig, Tokenizer};
use bibscope_vectorize::{fit_transform, TfidfParams};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordMode {
    Tfidf,
    Frequency,
    Combined,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtractedKeyword {
    pub term: String,
    pub score: f64,
}

fn frequency_preprocess_config(ngram_range: (usize, usize)) -> PreprocessConfig {
    PreprocessConfig {
        lowercase: true,
        strip_accents: true,
        remove_urls_emails_numbers: true,
        remove_punctuation: true,
        tokenizer: Tokenizer::Word,
        remove_stopwords: true,
        lemmatize: true,
        min_token_length: 2,
        ngram_range,
    }
}

fn tfidf_keywords(corpus: &[String], top_k: usize, params: &TfidfParams) -> Vec<ExtractedKeyword> {
    let (model, matrix) = fit_transform(corpus, params);

    let mut totals = vec![0.0_f64; model.vocabulary_size()];
    for row in &matrix {
        for (i, &w) in row.iter().enumerate() {
            totals[i] += w;
        }
    }

    let mut scored: Vec<ExtractedKeyword> = model
        .terms
        .iter()
        .zip(totals)
        .map(|(term, score)| ExtractedKeyword {
            term: term.clone(),
            score,
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.term.cmp(&b.term)));
    scored.truncate(top_k);
    scored
}

fn frequency_keywords(corpus: &[String], top_k: usize, ngram_range: (usize, usize)) -> Vec<ExtractedKeyword> {
    let cfg = frequency_preprocess_config(ngram_range);
    let mut counts: HashMap<String, u64> = HashMap::new();
    for doc in corpus {
        for token in preprocess(doc, &cfg) {
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let mut scored: Vec<ExtractedKeyword> = counts
        .into_iter()
        .map(|(term, count)| ExtractedKeyword {
            term,
            score: count as f64,
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.term.cmp(&b.term)));
    scored.truncate(top_k);
    scored
}

/// Union the top-K of both modes, de-duplicate, and sort by average rank
/// across the two lists (a term missing from one list is ranked after the
/// worst-observed rank in that list, per the "union... sort by average
/// rank" contract).
fn combined_keywords(corpus: &[String], top_k: usize, params: &TfidfParams) -> Vec<ExtractedKeyword> {
    let tfidf = tfidf_keywords(corpus, top_k, params);
    let freq = frequency_keywords(corpus, top_k, params.ngram_range);

    let rank_of = |list: &[ExtractedKeyword], term: &str| -> usize {
        list.iter()
            .position(|k| k.term == term)
            .unwrap_or(list.len())
    };

    let mut terms: Vec<String> = tfidf.iter().chain(freq.iter()).map(|k| k.term.clone()).collect();
    terms.sort();
    terms.dedup();

    let mut scored: Vec<ExtractedKeyword> = terms
        .into_iter()
        .map(|term| {
            let r1 = rank_of(&tfidf, &term);
            let r2 = rank_of(&freq, &term);
            let avg_rank = (r1 + r2) as f64 / 2.0;
            ExtractedKeyword {
                term,
                score: avg_rank,
            }
        })
        .collect();

    // Lower average rank is better; invert score ordering relative to the
    // other modes (where higher is better) by sorting ascending here.
    scored.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.term.cmp(&b.term)));
    scored.truncate(top_k);
    scored
}

/// Extract up to `top_k` keywords from `corpus` using the selected `mode`
/// (spec §4.4.2). `params` supplies the n-gram range and document-frequency
/// bounds shared by the tfidf and frequency paths.
pub fn extract_keywords(corpus: &[String], top_k: usize, mode: KeywordMode, params: &TfidfParams) -> Vec<ExtractedKeyword> {
    match mode {
        KeywordMode::Tfidf => tfidf_keywords(corpus, top_k, params),
        KeywordMode::Frequency => frequency_keywords(corpus, top_k, params.ngram_range),
        KeywordMode::Combined => combined_keywords(corpus, top_k, params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<String> {
        vec![
            "diffusion models generate images through iterative denoising".to_string(),
            "diffusion models are a class of generative models".to_string(),
            "transformers use self attention instead of recurrence".to_string(),
        ]
    }

    #[test]
    fn tfidf_mode_ranks_distinctive_terms_highly() {
        let keywords = extract_keywords(&corpus(), 5, KeywordMode::Tfidf, &TfidfParams::default());
        assert!(!keywords.is_empty());
        assert!(keywords.iter().any(|k| k.term == "diffusion"));
    }

    #[test]
    fn frequency_mode_counts_raw_occurrences() {
        let keywords = extract_keywords(&corpus(), 5, KeywordMode::Frequency, &TfidfParams::default());
        let diffusion = keywords.iter().find(|k| k.term == "diffusion").unwrap();
        assert_eq!(diffusion.score, 2.0);
    }

    #[test]
    fn combined_mode_deduplicates_and_bounds_to_top_k() {
        let keywords = extract_keywords(&corpus(), 3, KeywordMode::Combined, &TfidfParams::default());
        assert!(keywords.len() <= 3);
        let terms: Vec<&str> = keywords.iter().map(|k| k.term.as_str()).collect();
        let mut unique = terms.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(terms.len(), unique.len());
    }
}
