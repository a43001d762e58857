use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::JobId;

/// Job lifecycle states (spec §3). `pending -> running -> {completed|failed|cancelled}`,
/// no other transitions are permitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// Whether `self -> next` is a legal transition per spec §3.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Running)
                | (JobStatus::Running, JobStatus::Completed)
                | (JobStatus::Running, JobStatus::Failed)
                | (JobStatus::Running, JobStatus::Cancelled)
                | (JobStatus::Pending, JobStatus::Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

/// Per-source progress within a job.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SourceProgress {
    pub downloaded: u64,
    pub errors: Vec<String>,
    pub completed: bool,
}

/// Aggregate counters maintained across the job's lifetime.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct JobCounts {
    pub downloaded: u64,
    pub unique: u64,
    pub duplicates: u64,
}

/// Full job state snapshot (spec §3).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobState {
    pub job_id: JobId,
    pub query: String,
    pub requested_sources: Vec<String>,
    pub export_formats: Vec<String>,
    pub status: JobStatus,
    pub per_source_progress: HashMap<String, SourceProgress>,
    pub counts: JobCounts,
    pub errors: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Paths to produced artifacts, keyed by format ("json", "bibtex", "ris", "csv").
    #[serde(default)]
    pub artifact_paths: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl JobState {
    pub fn new(query: String, requested_sources: Vec<String>, export_formats: Vec<String>) -> Self {
        let per_source_progress = requested_sources
            .iter()
            .map(|s| (s.clone(), SourceProgress::default()))
            .collect();

        Self {
            job_id: JobId::new(),
            query,
            requested_sources,
            export_formats,
            status: JobStatus::Pending,
            per_source_progress,
            counts: JobCounts::default(),
            errors: Vec::new(),
            created_at: Utc::now(),
            completed_at: None,
            artifact_paths: HashMap::new(),
            failure_reason: None,
        }
    }
}
