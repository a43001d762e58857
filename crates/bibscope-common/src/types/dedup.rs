use serde::{Deserialize, Serialize};

use super::publication::Publication;

/// Which pipeline stage caught a duplicate (spec §3, §4.2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupLevel {
    Doi,
    Hash,
    FuzzyTitle,
}

/// One detected duplicate (spec §3).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DuplicateEntry {
    pub duplicate: Publication,
    pub kept: Publication,
    pub level: DedupLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuzzy_ratio: Option<f64>,
}

/// The full deduplication report for a job (spec §3).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DuplicateReport {
    pub entries: Vec<DuplicateEntry>,
}

impl DuplicateReport {
    pub fn push(&mut self, entry: DuplicateEntry) {
        self.entries.push(entry);
    }
}
