//! Three-level duplicate detector (spec §4.2): DOI identity, normalized-title
//! hash, then fuzzy title similarity. Runs over the already-accepted set in
//! first-seen arrival order so "kept ∪ duplicates = input" and the unique
//! result is stable under a documented total order (spec §5 "Ordering
//! guarantees").

use std::collections::HashMap;

use bibscope_common::types::{DedupLevel, DuplicateEntry, DuplicateReport, Publication};
use md5::{Digest, Md5};

/// Default fuzzy-title threshold tau (spec §4.2, overridable via config).
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.95;

fn title_hash(normalized_title: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(normalized_title.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Character-level `SequenceMatcher`-style ratio (spec §4.2 level 3), via
/// the `similar` crate's `TextDiff::ratio`, matching Python difflib's
/// `SequenceMatcher(a, b).ratio()` semantics.
fn title_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    similar::TextDiff::from_chars(a, b).ratio() as f64
}

/// Incremental three-level deduplicator. Holds the running accepted set and
/// its DOI / normalized-title-hash indices.
pub struct Deduplicator {
    threshold: f64,
    accepted: Vec<Publication>,
    doi_index: HashMap<String, usize>,
    hash_index: HashMap<String, usize>,
    normalized_titles: Vec<String>,
}

/// Outcome of classifying one incoming record.
pub enum DedupOutcome {
    Kept,
    Duplicate(DuplicateEntry),
}

impl Deduplicator {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            accepted: Vec::new(),
            doi_index: HashMap::new(),
            hash_index: HashMap::new(),
            normalized_titles: Vec::new(),
        }
    }

    pub fn accepted(&self) -> &[Publication] {
        &self.accepted
    }

    /// Classify `record` against everything accepted so far, updating the
    /// indices when it is kept (spec §4.2 levels 1-3, tie-break rules).
    pub fn classify(&mut self, record: Publication) -> DedupOutcome {
        let normalized_title = record.normalized_title();

        // Level 1: DOI identity. Edge case: empty title -> level 1 only is
        // reachable for this record (an empty title with no DOI falls
        // through every level and is always kept).
        if let Some(doi) = record.doi.as_ref().filter(|d| !d.is_empty()) {
            if let Some(&kept_idx) = self.doi_index.get(doi) {
                let kept = self.accepted[kept_idx].clone();
                return DedupOutcome::Duplicate(DuplicateEntry {
                    duplicate: record,
                    kept,
                    level: DedupLevel::Doi,
                    fuzzy_ratio: None,
                });
            }
        }

        // Edge case: empty DOI and empty title -> cannot be deduplicated.
        if record.doi.as_ref().map(|d| d.is_empty()).unwrap_or(true) && normalized_title.is_empty() {
            return self.accept(record, normalized_title);
        }

        // Level 2: normalized-title hash.
        if !normalized_title.is_empty() {
            let hash = title_hash(&normalized_title);
            if let Some(&kept_idx) = self.hash_index.get(&hash) {
                let kept = self.accepted[kept_idx].clone();
                return DedupOutcome::Duplicate(DuplicateEntry {
                    duplicate: record,
                    kept,
                    level: DedupLevel::Hash,
                    fuzzy_ratio: None,
                });
            }

            // Level 3: fuzzy title similarity. Highest ratio wins; ties
            // broken by earliest arrival (first max retained, spec §4.2 /
            // §9 "Open questions").
            let mut best: Option<(usize, f64)> = None;
            for (idx, existing_title) in self.normalized_titles.iter().enumerate() {
                let ratio = title_ratio(&normalized_title, existing_title);
                if ratio >= self.threshold {
                    let replace = match best {
                        None => true,
                        Some((_, best_ratio)) => ratio > best_ratio,
                    };
                    if replace {
                        best = Some((idx, ratio));
                    }
                }
            }

            if let Some((kept_idx, ratio)) = best {
                let kept = self.accepted[kept_idx].clone();
                return DedupOutcome::Duplicate(DuplicateEntry {
                    duplicate: record,
                    kept,
                    level: DedupLevel::FuzzyTitle,
                    fuzzy_ratio: Some(ratio),
                });
            }

            return self.accept_with_hash(record, normalized_title, hash);
        }

        self.accept(record, normalized_title)
    }

    fn accept(&mut self, record: Publication, normalized_title: String) -> DedupOutcome {
        if let Some(doi) = record.doi.as_ref().filter(|d| !d.is_empty()) {
            self.doi_index.insert(doi.clone(), self.accepted.len());
        }
        self.normalized_titles.push(normalized_title);
        self.accepted.push(record);
        DedupOutcome::Kept
    }

    fn accept_with_hash(&mut self, record: Publication, normalized_title: String, hash: String) -> DedupOutcome {
        self.hash_index.insert(hash, self.accepted.len());
        self.accept(record, normalized_title)
    }
}

/// Run the full pipeline over an ordered batch of incoming records (spec
/// §4.2, §5 "the concatenated raw-record list is ordered by source
/// completion, but the unique result is stable under a documented total
/// order"). Returns the unique, order-preserved accepted set and the
/// duplicate report.
pub fn deduplicate(records: Vec<Publication>, threshold: f64) -> (Vec<Publication>, DuplicateReport) {
    let mut dedup = Deduplicator::new(threshold);
    let mut report = DuplicateReport::default();

    for record in records {
        if let DedupOutcome::Duplicate(entry) = dedup.classify(record) {
            report.push(entry);
        }
    }

    (dedup.accepted, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_doi(title: &str, doi: &str) -> Publication {
        let mut p = Publication::new(title, "fixture");
        p.doi = Some(doi.to_string());
        p
    }

    #[test]
    fn doi_identity_catches_exact_repeats() {
        let records = vec![
            with_doi("AI in Education", "10.1/a"),
            with_doi("AI in Education", "10.1/a"),
        ];
        let (kept, report) = deduplicate(records, DEFAULT_FUZZY_THRESHOLD);
        assert_eq!(kept.len(), 1);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].level, DedupLevel::Doi);
    }

    #[test]
    fn scenario_4_low_threshold_catches_doi_and_fuzzy() {
        let records = vec![
            with_doi("AI in Education", "10.1/a"),
            with_doi("AI in Education", "10.1/a"),
            with_doi("AI in Educational Contexts", "10.1/b"),
        ];
        let (kept, report) = deduplicate(records, 0.80);
        assert_eq!(kept.len(), 1);
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].level, DedupLevel::Doi);
        assert_eq!(report.entries[1].level, DedupLevel::FuzzyTitle);
        assert!(report.entries[1].fuzzy_ratio.unwrap() >= 0.80);
    }

    #[test]
    fn scenario_4_high_threshold_keeps_fuzzy_candidate_distinct() {
        let records = vec![
            with_doi("AI in Education", "10.1/a"),
            with_doi("AI in Education", "10.1/a"),
            with_doi("AI in Educational Contexts", "10.1/b"),
        ];
        let (kept, report) = deduplicate(records, 0.99);
        assert_eq!(kept.len(), 2);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].level, DedupLevel::Doi);
    }

    #[test]
    fn empty_doi_and_title_is_always_kept() {
        let records = vec![Publication::new(" ", "fixture"), Publication::new(" ", "fixture")];
        let (kept, report) = deduplicate(records, DEFAULT_FUZZY_THRESHOLD);
        assert_eq!(kept.len(), 2);
        assert!(report.entries.is_empty());
    }

    #[test]
    fn dedup_is_idempotent() {
        let records = vec![
            with_doi("AI in Education", "10.1/a"),
            with_doi("AI in Education", "10.1/a"),
            with_doi("AI in Educational Contexts", "10.1/b"),
        ];
        let (kept_once, _) = deduplicate(records, 0.80);
        let (kept_twice, report_twice) = deduplicate(kept_once.clone(), 0.80);
        assert_eq!(kept_once.len(), kept_twice.len());
        assert!(report_twice.entries.is_empty());
    }

    #[test]
    fn kept_union_duplicates_equals_input_count() {
        let records = vec![
            with_doi("AI in Education", "10.1/a"),
            with_doi("AI in Education", "10.1/a"),
            with_doi("AI in Educational Contexts", "10.1/b"),
        ];
        let input_len = records.len();
        let (kept, report) = deduplicate(records, 0.80);
        assert_eq!(kept.len() + report.entries.len(), input_len);
    }

    #[test]
    fn hash_level_catches_same_normalized_title_without_doi() {
        let records = vec![
            Publication::new("The AI, in Education!", "fixture"),
            Publication::new("ai in education", "fixture"),
        ];
        let (kept, report) = deduplicate(records, DEFAULT_FUZZY_THRESHOLD);
        assert_eq!(kept.len(), 1);
        assert_eq!(report.entries[0].level, DedupLevel::Hash);
    }
}
