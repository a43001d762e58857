//! Shared leaf module (L2): a pure, stateless text preprocessor (spec §4.1).

mod lemma;
mod stopwords;

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Tokenization granularity (spec §4.1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tokenizer {
    Word,
    Character,
}

/// Preprocessing configuration (spec §4.1 table).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PreprocessConfig {
    pub lowercase: bool,
    pub strip_accents: bool,
    pub remove_urls_emails_numbers: bool,
    pub remove_punctuation: bool,
    pub tokenizer: Tokenizer,
    pub remove_stopwords: bool,
    pub lemmatize: bool,
    pub min_token_length: usize,
    /// Inclusive (min, max) n-gram size range.
    pub ngram_range: (usize, usize),
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            strip_accents: true,
            remove_urls_emails_numbers: true,
            remove_punctuation: true,
            tokenizer: Tokenizer::Word,
            remove_stopwords: true,
            lemmatize: true,
            min_token_length: 2,
            ngram_range: (1, 1),
        }
    }
}

impl PreprocessConfig {
    /// A config that keeps stop words — used for concept context windows
    /// (spec §4.4.1 operates over the "non-stop-word-removed" form).
    pub fn keep_stopwords() -> Self {
        Self {
            remove_stopwords: false,
            lemmatize: false,
            ngram_range: (1, 1),
            ..Default::default()
        }
    }
}

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://\S+|www\.\S+").unwrap())
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[[:alnum:].+-]+@[[:alnum:].-]+\.[[:alpha:]]{2,}").unwrap())
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d+(\.\d+)?\b").unwrap())
}

fn strip_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F)
}

fn strip_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() || c.is_whitespace() {
            out.push(c);
        } else if c == '-' {
            // Keep intra-word hyphens, drop leading/trailing ones.
            let prev_word = i > 0 && chars[i - 1].is_alphanumeric();
            let next_word = i + 1 < chars.len() && chars[i + 1].is_alphanumeric();
            if prev_word && next_word {
                out.push(c);
            } else {
                out.push(' ');
            }
        } else {
            out.push(' ');
        }
    }
    out
}

fn emit_ngrams(tokens: &[String], (min_n, max_n): (usize, usize)) -> Vec<String> {
    let mut out = Vec::new();
    for n in min_n.max(1)..=max_n.max(min_n.max(1)) {
        if n > tokens.len() {
            continue;
        }
        for window in tokens.windows(n) {
            out.push(window.join(" "));
        }
    }
    out
}

/// Apply the full preprocessing pipeline. Deterministic: same input + config
/// always yields the same output (spec §4.1 contract).
pub fn preprocess(text: &str, config: &PreprocessConfig) -> Vec<String> {
    let mut working = text.trim().to_string();

    if config.lowercase {
        working = working.to_lowercase();
    }
    if config.strip_accents {
        working = strip_accents(&working);
    }
    if config.remove_urls_emails_numbers {
        working = url_re().replace_all(&working, " ").into_owned();
        working = email_re().replace_all(&working, " ").into_owned();
        working = number_re().replace_all(&working, " ").into_owned();
    }
    if config.remove_punctuation {
        working = strip_punctuation(&working);
    }

    let raw_tokens: Vec<String> = match config.tokenizer {
        Tokenizer::Word => working.split_whitespace().map(|s| s.to_string()).collect(),
        Tokenizer::Character => working
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_string())
            .collect(),
    };

    let mut tokens: Vec<String> = raw_tokens
        .into_iter()
        .filter(|t| !config.remove_stopwords || !stopwords::contains(t))
        .map(|t| if config.lemmatize { lemma::lemmatize(&t) } else { t })
        .filter(|t| t.chars().count() >= config.min_token_length)
        .collect();

    if config.ngram_range != (1, 1) {
        tokens = emit_ngrams(&tokens, config.ngram_range);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_lowercases_strips_and_removes_stopwords() {
        let tokens = preprocess(
            "The Transformer Architecture is a Novel Approach!",
            &PreprocessConfig::default(),
        );
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"is".to_string()));
        assert!(!tokens.contains(&"a".to_string()));
        assert!(tokens.contains(&"transformer".to_string()));
        assert!(tokens.contains(&"architecture".to_string()));
        assert!(!tokens.contains(&"approach".to_string()));
    }

    #[test]
    fn strips_urls_emails_numbers() {
        let tokens = preprocess(
            "Contact me at a@b.com or http://example.com, cites 42 papers",
            &PreprocessConfig::default(),
        );
        assert!(!tokens.iter().any(|t| t.contains('@')));
        assert!(!tokens.iter().any(|t| t.contains("http")));
        assert!(!tokens.contains(&"42".to_string()));
    }

    #[test]
    fn min_token_length_drops_short_tokens() {
        let mut cfg = PreprocessConfig::default();
        cfg.remove_stopwords = false;
        cfg.lemmatize = false;
        cfg.min_token_length = 3;
        let tokens = preprocess("ai is a cat", &cfg);
        assert_eq!(tokens, vec!["cat".to_string()]);
    }

    #[test]
    fn emits_bigrams_when_configured() {
        let mut cfg = PreprocessConfig::default();
        cfg.remove_stopwords = false;
        cfg.lemmatize = false;
        cfg.ngram_range = (1, 2);
        let tokens = preprocess("large language model", &cfg);
        assert!(tokens.contains(&"large".to_string()));
        assert!(tokens.contains(&"large language".to_string()));
        assert!(tokens.contains(&"language model".to_string()));
    }

    #[test]
    fn is_deterministic() {
        let cfg = PreprocessConfig::default();
        let a = preprocess("Diffusion models for image synthesis", &cfg);
        let b = preprocess("Diffusion models for image synthesis", &cfg);
        assert_eq!(a, b);
    }

    #[test]
    fn keeps_intra_word_hyphens() {
        let mut cfg = PreprocessConfig::default();
        cfg.remove_stopwords = false;
        cfg.lemmatize = false;
        let tokens = preprocess("state-of-the-art results", &cfg);
        assert!(tokens.iter().any(|t| t.contains('-')));
    }
}
