//! Default stop-word corpus: a small English list plus a domain-specific
//! technical list for the "generative artificial intelligence" default
//! domain (spec §4.1).

pub const ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
    "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only",
    "or", "other", "our", "ours", "ourselves", "out", "over", "own", "s", "same", "she", "should",
    "so", "some", "such", "t", "than", "that", "the", "their", "theirs", "them", "themselves",
    "then", "there", "these", "they", "this", "those", "through", "to", "too", "under", "until",
    "up", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom",
    "why", "will", "with", "you", "your", "yours", "yourself", "yourselves",
];

/// Technical filler terms common in generative-AI abstracts that carry
/// little discriminative weight for concept/keyword analysis.
pub const DOMAIN_TECHNICAL: &[&str] = &[
    "paper", "propose", "proposed", "approach", "method", "methods", "result", "results",
    "show", "shows", "demonstrate", "demonstrates", "novel", "experiments", "experiment",
    "dataset", "datasets", "study", "work", "using", "based", "via", "state-of-the-art", "sota",
];

pub fn contains(word: &str) -> bool {
    ENGLISH.contains(&word) || DOMAIN_TECHNICAL.contains(&word)
}
