//! Process-wide job registry (spec §3, §5): a map from job id to
//! [`JobState`] behind a single lock, generalizing the teacher's
//! `StoreClient` shape to an in-memory store with an explicit eviction
//! operation (spec §5: "the job registry MUST expose an explicit removal
//! operation").

use std::collections::HashMap;
use std::sync::Arc;

use bibscope_common::types::{JobState, JobStatus};
use bibscope_common::{BibscopeError, JobId, Result};
use chrono::Utc;
use tokio::sync::RwLock;

/// Shared, cloneable handle to the job registry. Reads are frequent and
/// short; contention is expected to be low (spec §5).
#[derive(Clone)]
pub struct JobRegistry {
    inner: Arc<RwLock<HashMap<JobId, JobState>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn insert(&self, job: JobState) {
        let mut guard = self.inner.write().await;
        guard.insert(job.job_id, job);
    }

    pub async fn get(&self, job_id: JobId) -> Option<JobState> {
        self.inner.read().await.get(&job_id).cloned()
    }

    pub async fn list(&self) -> Vec<JobState> {
        let mut jobs: Vec<JobState> = self.inner.read().await.values().cloned().collect();
        jobs.sort_by_key(|j| j.created_at);
        jobs
    }

    /// Mutate an existing job's state in place under the lock. Returns
    /// `NotFound` when the job id is unregistered.
    pub async fn update<F>(&self, job_id: JobId, f: F) -> Result<()>
    where
        F: FnOnce(&mut JobState),
    {
        let mut guard = self.inner.write().await;
        match guard.get_mut(&job_id) {
            Some(job) => {
                f(job);
                Ok(())
            }
            None => Err(BibscopeError::NotFound(format!("job {job_id}"))),
        }
    }

    /// Transition `job_id` to `next`, enforcing the legal-transition table
    /// from spec §3 (`pending -> running -> {completed|failed|cancelled}`).
    pub async fn transition(&self, job_id: JobId, next: JobStatus) -> Result<()> {
        self.update(job_id, |job| {
            if job.status.can_transition_to(next) {
                job.status = next;
                if next.is_terminal() {
                    job.completed_at = Some(Utc::now());
                }
            }
        })
        .await?;

        let current = self.get(job_id).await.map(|j| j.status);
        if current != Some(next) {
            return Err(BibscopeError::Conflict(format!(
                "illegal transition for job {job_id}: -> {next:?}"
            )));
        }
        Ok(())
    }

    /// Explicit removal, so a deployment with a `job_ttl_s` policy can evict
    /// terminal jobs without relying on process restart (spec §5).
    pub async fn evict(&self, job_id: JobId) -> bool {
        self.inner.write().await.remove(&job_id).is_some()
    }

    /// Evict every terminal job whose `completed_at` is older than `ttl`.
    pub async fn evict_expired(&self, ttl: chrono::Duration) -> usize {
        let now = Utc::now();
        let mut guard = self.inner.write().await;
        let before = guard.len();
        guard.retain(|_, job| match job.completed_at {
            Some(completed_at) => now - completed_at < ttl,
            None => true,
        });
        before - guard.len()
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_job() -> JobState {
        JobState::new("ai".into(), vec!["fixture".into()], vec!["json".into()])
    }

    #[tokio::test]
    async fn insert_and_get_round_trips() {
        let registry = JobRegistry::new();
        let job = fixture_job();
        let id = job.job_id;
        registry.insert(job).await;
        let fetched = registry.get(id).await.unwrap();
        assert_eq!(fetched.job_id, id);
    }

    #[tokio::test]
    async fn transition_enforces_legal_moves() {
        let registry = JobRegistry::new();
        let job = fixture_job();
        let id = job.job_id;
        registry.insert(job).await;

        registry.transition(id, JobStatus::Running).await.unwrap();
        assert!(registry.transition(id, JobStatus::Pending).await.is_err());
        registry.transition(id, JobStatus::Completed).await.unwrap();
        assert_eq!(registry.get(id).await.unwrap().status, JobStatus::Completed);
    }

    #[tokio::test]
    async fn evict_removes_the_job() {
        let registry = JobRegistry::new();
        let job = fixture_job();
        let id = job.job_id;
        registry.insert(job).await;
        assert!(registry.evict(id).await);
        assert!(registry.get(id).await.is_none());
    }

    #[tokio::test]
    async fn unknown_job_update_is_not_found() {
        let registry = JobRegistry::new();
        let result = registry.transition(JobId::new(), JobStatus::Running).await;
        assert!(result.is_err());
    }
}
