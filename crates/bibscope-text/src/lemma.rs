//! Deterministic suffix-stripping lemmatizer fallback.
//!
//! No ML lemmatizer dependency appears anywhere in the retrieval pack, so per
//! spec §4.1 ("fall back to identity otherwise") this is a small rule table.
//! It handles the common English inflections seen in scientific abstracts
//! without attempting full morphological analysis.

const IRREGULAR: &[(&str, &str)] = &[
    ("data", "datum"),
    ("analyses", "analysis"),
    ("children", "child"),
    ("studies", "study"),
    ("properties", "property"),
];

pub fn lemmatize(word: &str) -> String {
    if let Some((_, lemma)) = IRREGULAR.iter().find(|(inflected, _)| *inflected == word) {
        return lemma.to_string();
    }

    if word.len() > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if word.len() > 5 && word.ends_with("ing") {
        return word[..word.len() - 3].to_string();
    }
    if word.len() > 4 && word.ends_with("ed") {
        return word[..word.len() - 2].to_string();
    }
    if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        return word[..word.len() - 1].to_string();
    }

    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_common_suffixes() {
        assert_eq!(lemmatize("models"), "model");
        assert_eq!(lemmatize("training"), "train");
        assert_eq!(lemmatize("studies"), "study");
        assert_eq!(lemmatize("evaluated"), "evaluat");
    }

    #[test]
    fn leaves_short_or_unmatched_words_alone() {
        assert_eq!(lemmatize("ai"), "ai");
        assert_eq!(lemmatize("class"), "class");
    }
}
