use serde::{Deserialize, Serialize};

/// A predefined concept with optional alternative surface forms (spec §4.4.1).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Concept {
    pub name: String,
    #[serde(default)]
    pub variants: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Concept {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
            category: None,
        }
    }

    /// All surface forms this concept matches against, lowercased.
    pub fn all_forms(&self) -> Vec<String> {
        let mut forms = vec![self.name.to_lowercase()];
        forms.extend(self.variants.iter().map(|v| v.to_lowercase()));
        forms
    }
}

/// A short token span surrounding a concept occurrence (spec §3).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContextWindow {
    pub document_index: usize,
    pub text: String,
}

/// Frequency record for a single concept across the corpus (spec §3).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConceptFrequency {
    pub total_occurrences: u64,
    pub document_frequency: u64,
    pub relative_frequency: f64,
    pub document_indices: Vec<usize>,
    pub contexts: Vec<ContextWindow>,
}
