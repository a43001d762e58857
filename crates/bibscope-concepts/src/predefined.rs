//! Predefined-concept analysis (spec §4.4.1): count occurrences, document
//! frequency, and sample context windows for a fixed concept list.

use bibscope_common::types::{Concept, ConceptFrequency, ContextWindow};
use bibscope_text::{preprocess, PreprocessConfig};

/// Up to this many context windows are retained per document per concept.
pub const DEFAULT_MAX_CONTEXTS_PER_DOC: usize = 3;
/// Tokens captured on either side of an occurrence (spec §4.4.1 default W=5).
pub const DEFAULT_WINDOW: usize = 5;

/// Find every contiguous occurrence of `form` (already-tokenized) inside
/// `tokens`, returning the starting index of each match.
fn find_occurrences(tokens: &[String], form: &[String]) -> Vec<usize> {
    if form.is_empty() || tokens.len() < form.len() {
        return Vec::new();
    }
    (0..=tokens.len() - form.len())
        .filter(|&start| tokens[start..start + form.len()] == *form)
        .collect()
}

fn context_window(tokens: &[String], start: usize, form_len: usize, window: usize) -> String {
    let lo = start.saturating_sub(window);
    let hi = (start + form_len + window).min(tokens.len());
    tokens[lo..hi].join(" ")
}

/// Analyze occurrences of every `concept` across `corpus` (spec §4.4.1).
/// Matching runs over the non-stop-word-removed, lowercased, punctuation-
/// stripped token stream, respecting word boundaries; a concept containing
/// whitespace must match the same contiguous sequence of tokens.
pub fn analyze_concepts(
    corpus: &[String],
    concepts: &[Concept],
    window: usize,
    max_contexts_per_doc: usize,
) -> Vec<(String, ConceptFrequency)> {
    let cfg = PreprocessConfig::keep_stopwords();
    let tokenized: Vec<Vec<String>> = corpus.iter().map(|doc| preprocess(doc, &cfg)).collect();

    concepts
        .iter()
        .map(|concept| {
            let forms: Vec<Vec<String>> = concept
                .all_forms()
                .into_iter()
                .map(|form| form.split_whitespace().map(str::to_string).collect::<Vec<_>>())
                .filter(|f: &Vec<String>| !f.is_empty())
                .collect();

            let mut record = ConceptFrequency::default();

            for (doc_idx, tokens) in tokenized.iter().enumerate() {
                let mut doc_occurrences = 0u64;
                let mut doc_contexts_taken = 0usize;

                for form in &forms {
                    for start in find_occurrences(tokens, form) {
                        doc_occurrences += 1;
                        if doc_contexts_taken < max_contexts_per_doc {
                            record.contexts.push(ContextWindow {
                                document_index: doc_idx,
                                text: context_window(tokens, start, form.len(), window),
                            });
                            doc_contexts_taken += 1;
                        }
                    }
                }

                if doc_occurrences > 0 {
                    record.total_occurrences += doc_occurrences;
                    record.document_frequency += 1;
                    record.document_indices.push(doc_idx);
                }
            }

            record.relative_frequency = if corpus.is_empty() {
                0.0
            } else {
                record.document_frequency as f64 / corpus.len() as f64
            };

            (concept.name.clone(), record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_occurrences_and_document_frequency() {
        let corpus = vec![
            "the transformer architecture uses self attention".to_string(),
            "recurrent networks predate the transformer".to_string(),
            "convolutional networks are unrelated".to_string(),
        ];
        let concept = Concept::new("transformer");
        let results = analyze_concepts(&corpus, &[concept], DEFAULT_WINDOW, DEFAULT_MAX_CONTEXTS_PER_DOC);

        let (_, record) = &results[0];
        assert_eq!(record.total_occurrences, 2);
        assert_eq!(record.document_frequency, 2);
        assert_eq!(record.document_indices, vec![0, 1]);
    }

    #[test]
    fn matches_multi_word_concepts_as_contiguous_tokens() {
        let corpus = vec!["large language models scale with compute".to_string()];
        let concept = Concept::new("large language models");
        let results = analyze_concepts(&corpus, &[concept], DEFAULT_WINDOW, DEFAULT_MAX_CONTEXTS_PER_DOC);
        assert_eq!(results[0].1.total_occurrences, 1);
    }

    #[test]
    fn variants_are_matched_in_addition_to_the_primary_name() {
        let corpus = vec!["gans and generative adversarial networks are related".to_string()];
        let mut concept = Concept::new("generative adversarial network");
        concept.variants.push("gan".to_string());
        concept.variants.push("generative adversarial networks".to_string());
        let results = analyze_concepts(&corpus, &[concept], DEFAULT_WINDOW, DEFAULT_MAX_CONTEXTS_PER_DOC);
        assert_eq!(results[0].1.total_occurrences, 2);
    }

    #[test]
    fn context_window_captures_tokens_on_both_sides() {
        let corpus = vec!["a b c concept d e f".to_string()];
        let concept = Concept::new("concept");
        let results = analyze_concepts(&corpus, &[concept], 2, DEFAULT_MAX_CONTEXTS_PER_DOC);
        assert_eq!(results[0].1.contexts[0].text, "b c concept d e");
    }

    #[test]
    fn no_occurrences_yields_zeroed_record() {
        let corpus = vec!["unrelated text entirely".to_string()];
        let concept = Concept::new("nonexistent concept");
        let results = analyze_concepts(&corpus, &[concept], DEFAULT_WINDOW, DEFAULT_MAX_CONTEXTS_PER_DOC);
        let (_, record) = &results[0];
        assert_eq!(record.total_occurrences, 0);
        assert_eq!(record.document_frequency, 0);
        assert!(record.contexts.is_empty());
    }
}
