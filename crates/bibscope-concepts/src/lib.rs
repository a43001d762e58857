//! Concept / frequency analyzer (spec §4.4): predefined-concept occurrence
//! counting, automatic keyword extraction, and extraction quality evaluation.

pub mod evaluation;
pub mod keywords;
pub mod predefined;
pub mod vocabulary;

pub use evaluation::{precision_recall_f1, EvaluationResult};
pub use keywords::{extract_keywords, ExtractedKeyword, KeywordMode};
pub use predefined::{analyze_concepts, DEFAULT_MAX_CONTEXTS_PER_DOC, DEFAULT_WINDOW};
pub use vocabulary::{default_vocabulary, vocabulary_for_category, CATEGORIES};
