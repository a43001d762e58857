//! Built-in generative-AI reference vocabulary (SPEC_FULL.md §4.4), grouped
//! by category and overridable per-request via the `concepts?` field.

use bibscope_common::types::Concept;

struct RawConcept {
    name: &'static str,
    variants: &'static [&'static str],
    category: &'static str,
}

const RAW_CONCEPTS: &[RawConcept] = &[
    RawConcept { name: "transformer", variants: &["transformers", "transformer architecture"], category: "architectures" },
    RawConcept { name: "diffusion model", variants: &["diffusion models", "denoising diffusion"], category: "architectures" },
    RawConcept { name: "generative adversarial network", variants: &["gan", "gans"], category: "architectures" },
    RawConcept { name: "variational autoencoder", variants: &["vae", "vaes"], category: "architectures" },
    RawConcept { name: "recurrent neural network", variants: &["rnn", "rnns"], category: "architectures" },
    RawConcept { name: "attention mechanism", variants: &["self attention", "cross attention"], category: "architectures" },
    RawConcept { name: "mixture of experts", variants: &["moe"], category: "architectures" },
    RawConcept { name: "reinforcement learning from human feedback", variants: &["rlhf"], category: "training" },
    RawConcept { name: "fine-tuning", variants: &["finetuning", "fine tune"], category: "training" },
    RawConcept { name: "transfer learning", variants: &[], category: "training" },
    RawConcept { name: "self-supervised learning", variants: &["self supervised learning"], category: "training" },
    RawConcept { name: "contrastive learning", variants: &[], category: "training" },
    RawConcept { name: "gradient descent", variants: &["stochastic gradient descent", "sgd"], category: "training" },
    RawConcept { name: "pretraining", variants: &["pre-training", "pre training"], category: "training" },
    RawConcept { name: "perplexity", variants: &[], category: "evaluation" },
    RawConcept { name: "bleu score", variants: &["bleu"], category: "evaluation" },
    RawConcept { name: "rouge score", variants: &["rouge"], category: "evaluation" },
    RawConcept { name: "benchmark", variants: &["benchmarks", "benchmarking"], category: "evaluation" },
    RawConcept { name: "ablation study", variants: &["ablation studies"], category: "evaluation" },
    RawConcept { name: "few-shot learning", variants: &["few shot learning"], category: "evaluation" },
    RawConcept { name: "natural language processing", variants: &["nlp"], category: "applications" },
    RawConcept { name: "computer vision", variants: &[], category: "applications" },
    RawConcept { name: "text generation", variants: &[], category: "applications" },
    RawConcept { name: "image synthesis", variants: &[], category: "applications" },
    RawConcept { name: "code generation", variants: &[], category: "applications" },
    RawConcept { name: "conversational agent", variants: &["chatbot", "chatbots"], category: "applications" },
    RawConcept { name: "alignment", variants: &["ai alignment"], category: "safety" },
    RawConcept { name: "hallucination", variants: &["hallucinations"], category: "safety" },
    RawConcept { name: "bias mitigation", variants: &["algorithmic bias"], category: "safety" },
    RawConcept { name: "adversarial robustness", variants: &["adversarial attack", "adversarial attacks"], category: "safety" },
    RawConcept { name: "interpretability", variants: &["explainability"], category: "safety" },
];

/// The default built-in vocabulary, grouped into the categories
/// `architectures`, `training`, `evaluation`, `applications`, `safety`.
pub fn default_vocabulary() -> Vec<Concept> {
    RAW_CONCEPTS
        .iter()
        .map(|raw| Concept {
            name: raw.name.to_string(),
            variants: raw.variants.iter().map(|v| v.to_string()).collect(),
            category: Some(raw.category.to_string()),
        })
        .collect()
}

/// The default vocabulary restricted to a single category.
pub fn vocabulary_for_category(category: &str) -> Vec<Concept> {
    default_vocabulary()
        .into_iter()
        .filter(|c| c.category.as_deref() == Some(category))
        .collect()
}

pub const CATEGORIES: &[&str] = &["architectures", "training", "evaluation", "applications", "safety"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_vocabulary_covers_every_category() {
        let concepts = default_vocabulary();
        for category in CATEGORIES {
            assert!(concepts.iter().any(|c| c.category.as_deref() == Some(*category)));
        }
    }

    #[test]
    fn category_filter_returns_only_matching_entries() {
        let training = vocabulary_for_category("training");
        assert!(!training.is_empty());
        assert!(training.iter().all(|c| c.category.as_deref() == Some("training")));
    }
}
