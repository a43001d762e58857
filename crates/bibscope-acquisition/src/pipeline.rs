//! Acquisition pipeline orchestration (spec §4.2, §5): fan out a query
//! across registered source adapters, normalize, deduplicate, export, and
//! expose job status. Generalizes the teacher's `ProcessorPool::start`/
//! `join` task-per-worker shape to a task-per-source-adapter shape, and its
//! `watch::channel(false)` shutdown signal to a per-job cancel flag.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bibscope_common::config::{AcquisitionConfig, RetryConfig};
use bibscope_common::types::{JobCounts, JobState, JobStatus, Publication, SourceDescriptor, SourceProgress};
use bibscope_common::{BibscopeError, JobId, Result};
use tokio::sync::Mutex;

use crate::adapter::{BoxedAdapter, SourceError, YearRange};
use crate::dedup::deduplicate;
use crate::export::{ArtifactWriter, ExportFormat};
use crate::rate_limit::AdapterRateLimiter;
use crate::registry::JobRegistry;
use crate::retry::with_retry;

/// A `POST /data/download` request body (spec §6).
#[derive(Clone, Debug)]
pub struct SubmitRequest {
    pub query: String,
    pub sources: Vec<String>,
    pub max_results_per_source: usize,
    pub export_formats: Vec<ExportFormat>,
    pub year_range: Option<YearRange>,
}

/// Coordinates source adapters, rate limiting, retries, deduplication, and
/// export for every submitted job.
#[derive(Clone)]
pub struct AcquisitionPipeline {
    registry: JobRegistry,
    adapters: Arc<HashMap<String, BoxedAdapter>>,
    rate_limiter: Arc<AdapterRateLimiter>,
    retry_config: RetryConfig,
    base_dir: PathBuf,
    similarity_threshold: f64,
    cancel_flags: Arc<Mutex<HashMap<JobId, Arc<AtomicBool>>>>,
}

/// Result of running a single source adapter for one job.
struct SourceRun {
    source_id: String,
    records: Vec<Publication>,
    errors: Vec<String>,
}

impl AcquisitionPipeline {
    pub fn new(
        config: &AcquisitionConfig,
        retry_config: RetryConfig,
        download_base_dir: &str,
        adapters: Vec<BoxedAdapter>,
    ) -> Self {
        let adapters = adapters.into_iter().map(|a| (a.id().to_string(), a)).collect();
        Self {
            registry: JobRegistry::new(),
            adapters: Arc::new(adapters),
            rate_limiter: Arc::new(AdapterRateLimiter::new()),
            retry_config,
            base_dir: PathBuf::from(download_base_dir),
            similarity_threshold: config.similarity_threshold,
            cancel_flags: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Where a job's artifacts are (or will be) written, for handlers that
    /// need to read an exported file directly off disk.
    pub fn job_dir(&self, job_id: JobId) -> PathBuf {
        ArtifactWriter::new(&self.base_dir, job_id).job_dir().to_path_buf()
    }

    pub fn list_sources(&self) -> Vec<SourceDescriptor> {
        self.adapters
            .values()
            .map(|a| SourceDescriptor {
                id: a.id().to_string(),
                name: a.id().to_string(),
                rate_limit_s: a.rate_limit_s(),
                registered: true,
            })
            .collect()
    }

    /// Submit a job: returns a handle immediately; the actual work runs as
    /// a background task (spec §4.2 "Job lifecycle").
    pub async fn submit(&self, request: SubmitRequest) -> Result<JobId> {
        if request.query.trim().is_empty() {
            return Err(BibscopeError::Validation("query must not be empty".into()));
        }
        if request.sources.is_empty() {
            return Err(BibscopeError::Validation("at least one source is required".into()));
        }

        let job = JobState::new(
            request.query.clone(),
            request.sources.clone(),
            request.export_formats.iter().map(|f| f.key().to_string()).collect(),
        );
        let job_id = job.job_id;
        self.registry.insert(job).await;
        self.cancel_flags.lock().await.insert(job_id, Arc::new(AtomicBool::new(false)));

        let pipeline = self.clone();
        tokio::spawn(async move {
            pipeline.run(job_id, request).await;
        });

        Ok(job_id)
    }

    /// Cooperative cancellation (spec §5): settable from outside, checked
    /// at source-completion boundaries and between dedup/export.
    pub async fn cancel(&self, job_id: JobId) -> Result<()> {
        let job = self
            .registry
            .get(job_id)
            .await
            .ok_or_else(|| BibscopeError::NotFound(format!("job {job_id}")))?;

        if job.status.is_terminal() {
            return Err(BibscopeError::Conflict(format!("job {job_id} is already in a terminal state")));
        }

        let flags = self.cancel_flags.lock().await;
        if let Some(flag) = flags.get(&job_id) {
            flag.store(true, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn is_cancelled(&self, job_id: JobId) -> bool {
        self.cancel_flags
            .lock()
            .await
            .get(&job_id)
            .map(|f| f.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    async fn finish_cancelled(&self, job_id: JobId, writer: &ArtifactWriter) {
        let _ = writer.delete_all().await;
        let _ = self.registry.transition(job_id, JobStatus::Cancelled).await;
        metrics::counter!("acquisition.job.cancelled").increment(1);
    }

    async fn run(&self, job_id: JobId, request: SubmitRequest) {
        if self.registry.transition(job_id, JobStatus::Running).await.is_err() {
            return;
        }
        metrics::counter!("acquisition.job.started").increment(1);

        let writer = ArtifactWriter::new(&self.base_dir, job_id);

        let mut handles = Vec::new();
        for source_id in &request.sources {
            let source_id = source_id.clone();
            let query = request.query.clone();
            let max_results = request.max_results_per_source;
            let year_range = request.year_range;
            let adapters = Arc::clone(&self.adapters);
            let rate_limiter = Arc::clone(&self.rate_limiter);
            let retry_config = self.retry_config.clone();

            handles.push(tokio::spawn(async move {
                run_source(adapters, rate_limiter, &retry_config, source_id, query, max_results, year_range).await
            }));
        }

        let mut raw_records = Vec::new();
        let mut per_source_progress: HashMap<String, SourceProgress> = HashMap::new();
        let mut sources_with_data = 0usize;
        let total_sources = request.sources.len();

        for handle in handles {
            let run = match handle.await {
                Ok(run) => run,
                Err(join_err) => SourceRun {
                    source_id: "unknown".to_string(),
                    records: Vec::new(),
                    errors: vec![join_err.to_string()],
                },
            };

            if !run.records.is_empty() {
                sources_with_data += 1;
            }
            let downloaded = run.records.len() as u64;
            raw_records.extend(run.records);
            per_source_progress.insert(
                run.source_id.clone(),
                SourceProgress {
                    downloaded,
                    errors: run.errors,
                    completed: true,
                },
            );

            if self.is_cancelled(job_id).await {
                self.finish_cancelled(job_id, &writer).await;
                return;
            }
        }

        let all_errors: Vec<String> = per_source_progress.values().flat_map(|p| p.errors.clone()).collect();

        // spec §4.2 "Job lifecycle": failed when the aggregate error count
        // exceeds the adapter-count threshold, i.e. every requested source
        // failed to produce data.
        if total_sources > 0 && sources_with_data == 0 && !all_errors.is_empty() {
            let _ = self
                .registry
                .update(job_id, |job| {
                    job.per_source_progress = per_source_progress.clone();
                    job.errors = all_errors.clone();
                    job.failure_reason = Some("all sources failed".to_string());
                })
                .await;
            let _ = self.registry.transition(job_id, JobStatus::Failed).await;
            metrics::counter!("acquisition.job.failed", "reason" => "all_sources").increment(1);
            return;
        }

        if self.is_cancelled(job_id).await {
            self.finish_cancelled(job_id, &writer).await;
            return;
        }

        let downloaded_count = raw_records.len() as u64;
        let (unique, duplicates_report) = deduplicate(raw_records, self.similarity_threshold);
        let unique_count = unique.len() as u64;
        let duplicate_count = duplicates_report.entries.len() as u64;

        if self.is_cancelled(job_id).await {
            self.finish_cancelled(job_id, &writer).await;
            return;
        }

        let summary = serde_json::json!({
            "query": request.query,
            "downloaded": downloaded_count,
            "unique": unique_count,
            "duplicates": duplicate_count,
        });

        // `unified.json` is always written, independent of the requested
        // export formats, so `GET /data/unified` can always be served.
        let mut formats = request.export_formats.clone();
        if !formats.contains(&ExportFormat::Json) {
            formats.push(ExportFormat::Json);
        }

        let export_result = writer.write_all(&unique, &duplicates_report, &summary, &formats).await;

        if self.is_cancelled(job_id).await {
            self.finish_cancelled(job_id, &writer).await;
            return;
        }

        match export_result {
            Ok(written) => {
                let artifact_paths: HashMap<String, String> = written
                    .into_iter()
                    .map(|(format, path)| (format.key().to_string(), path.display().to_string()))
                    .collect();

                let _ = self
                    .registry
                    .update(job_id, |job| {
                        job.per_source_progress = per_source_progress.clone();
                        job.errors = all_errors.clone();
                        job.counts = JobCounts {
                            downloaded: downloaded_count,
                            unique: unique_count,
                            duplicates: duplicate_count,
                        };
                        job.artifact_paths = artifact_paths.clone();
                    })
                    .await;
                let _ = self.registry.transition(job_id, JobStatus::Completed).await;
                metrics::counter!("acquisition.job.completed").increment(1);
            }
            Err(e) => {
                let _ = self
                    .registry
                    .update(job_id, |job| {
                        job.per_source_progress = per_source_progress.clone();
                        job.errors = all_errors.clone();
                        job.failure_reason = Some(e.to_string());
                    })
                    .await;
                let _ = self.registry.transition(job_id, JobStatus::Failed).await;
                metrics::counter!("acquisition.job.failed", "reason" => "export").increment(1);
            }
        }
    }
}

async fn run_source(
    adapters: Arc<HashMap<String, BoxedAdapter>>,
    rate_limiter: Arc<AdapterRateLimiter>,
    retry_config: &RetryConfig,
    source_id: String,
    query: String,
    max_results: usize,
    year_range: Option<YearRange>,
) -> SourceRun {
    use futures::StreamExt;

    let Some(adapter) = adapters.get(&source_id).cloned() else {
        return SourceRun {
            source_id: source_id.clone(),
            records: Vec::new(),
            errors: vec![format!("unregistered source: {source_id}")],
        };
    };

    rate_limiter.acquire(&source_id, adapter.rate_limit_s()).await;

    let attempt = || {
        let adapter = Arc::clone(&adapter);
        let query = query.clone();
        async move {
            let mut records = Vec::new();
            let mut stream = adapter.search(&query, max_results, year_range);
            while let Some(item) = stream.next().await {
                match item {
                    Ok(record) => records.push(record),
                    Err(e) => return Err(e),
                }
            }
            Ok(records)
        }
    };

    match with_retry(retry_config, &source_id, attempt).await {
        Ok(records) => SourceRun { source_id, records, errors: Vec::new() },
        Err(e) => SourceRun { source_id, records: Vec::new(), errors: vec![e.to_string()] },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::FixtureSourceAdapter;
    use bibscope_common::config::SystemConfig;
    use std::time::Duration;

    fn pipeline_with(adapters: Vec<BoxedAdapter>) -> AcquisitionPipeline {
        let config = SystemConfig::default();
        let base_dir = std::env::temp_dir().join(format!("bibscope-pipeline-test-{}", uuid::Uuid::new_v4()));
        AcquisitionPipeline::new(
            &config.acquisition,
            config.retry,
            base_dir.to_str().unwrap(),
            adapters,
        )
    }

    fn fixture_adapter(id: &str, titles: &[&str]) -> BoxedAdapter {
        let records = titles.iter().map(|t| Publication::new(*t, id)).collect();
        Arc::new(FixtureSourceAdapter::new(id, records))
    }

    #[tokio::test]
    async fn submit_rejects_empty_query() {
        let pipeline = pipeline_with(vec![fixture_adapter("acm", &["A"])]);
        let result = pipeline
            .submit(SubmitRequest {
                query: "  ".into(),
                sources: vec!["acm".into()],
                max_results_per_source: 10,
                export_formats: vec![ExportFormat::Json],
                year_range: None,
            })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn submit_runs_job_to_completion() {
        let pipeline = pipeline_with(vec![fixture_adapter("acm", &["AI in Education", "Diffusion Models"])]);
        let job_id = pipeline
            .submit(SubmitRequest {
                query: "generative ai".into(),
                sources: vec!["acm".into()],
                max_results_per_source: 10,
                export_formats: vec![ExportFormat::Json],
                year_range: None,
            })
            .await
            .unwrap();

        let mut job = pipeline.registry().get(job_id).await.unwrap();
        for _ in 0..50 {
            if job.status.is_terminal() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
            job = pipeline.registry().get(job_id).await.unwrap();
        }

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.counts.unique, 2);
    }

    #[tokio::test]
    async fn all_sources_failing_marks_job_failed() {
        let failing: BoxedAdapter = Arc::new(FixtureSourceAdapter::new("acm", Vec::new()).failing("boom"));
        let pipeline = pipeline_with(vec![failing]);
        let job_id = pipeline
            .submit(SubmitRequest {
                query: "x".into(),
                sources: vec!["acm".into()],
                max_results_per_source: 10,
                export_formats: vec![ExportFormat::Json],
                year_range: None,
            })
            .await
            .unwrap();

        let mut job = pipeline.registry().get(job_id).await.unwrap();
        for _ in 0..50 {
            if job.status.is_terminal() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
            job = pipeline.registry().get(job_id).await.unwrap();
        }

        assert_eq!(job.status, JobStatus::Failed);
    }

    #[tokio::test]
    async fn cancel_on_terminal_job_is_a_conflict() {
        let pipeline = pipeline_with(vec![fixture_adapter("acm", &["A"])]);
        let job_id = pipeline
            .submit(SubmitRequest {
                query: "a".into(),
                sources: vec!["acm".into()],
                max_results_per_source: 10,
                export_formats: vec![ExportFormat::Json],
                year_range: None,
            })
            .await
            .unwrap();

        for _ in 0..50 {
            let job = pipeline.registry().get(job_id).await.unwrap();
            if job.status.is_terminal() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert!(pipeline.cancel(job_id).await.is_err());
    }
}
