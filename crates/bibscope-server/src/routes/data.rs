//! Acquisition & deduplication endpoints (spec §6 `/data/...`).

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use bibscope_acquisition::{ExportFormat, SubmitRequest, YearRange};
use bibscope_common::types::Publication;
use bibscope_common::{BibscopeError, JobId};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Deserialize)]
pub struct DownloadRequest {
    query: String,
    sources: Vec<String>,
    #[serde(default = "default_max_results")]
    max_results_per_source: usize,
    export_formats: Vec<String>,
    #[serde(default)]
    year_range: Option<YearRangeDto>,
}

fn default_max_results() -> usize {
    100
}

#[derive(Deserialize)]
pub struct YearRangeDto {
    from: Option<i32>,
    to: Option<i32>,
}

#[derive(Serialize)]
pub struct DownloadResponse {
    job_id: JobId,
}

pub async fn download(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DownloadRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut export_formats = Vec::with_capacity(request.export_formats.len());
    for raw in &request.export_formats {
        let format = ExportFormat::parse(raw)
            .ok_or_else(|| BibscopeError::Validation(format!("unknown export format: {raw}")))?;
        export_formats.push(format);
    }

    let job_id = state
        .pipeline
        .submit(SubmitRequest {
            query: request.query,
            sources: request.sources,
            max_results_per_source: request.max_results_per_source,
            export_formats,
            year_range: request.year_range.map(|r| YearRange { from: r.from, to: r.to }),
        })
        .await?;

    Ok((StatusCode::ACCEPTED, Json(DownloadResponse { job_id })))
}

pub async fn status(State(state): State<Arc<AppState>>, Path(job_id): Path<JobId>) -> ApiResult<impl IntoResponse> {
    let job = state
        .pipeline
        .registry()
        .get(job_id)
        .await
        .ok_or_else(|| BibscopeError::NotFound(format!("job {job_id}")))?;
    Ok(Json(job))
}

pub async fn jobs(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.pipeline.registry().list().await)
}

#[derive(Deserialize)]
pub struct UnifiedQuery {
    job_id: JobId,
}

pub async fn unified(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UnifiedQuery>,
) -> ApiResult<impl IntoResponse> {
    let job = state
        .pipeline
        .registry()
        .get(params.job_id)
        .await
        .ok_or_else(|| BibscopeError::NotFound(format!("job {}", params.job_id)))?;

    if job.artifact_paths.get("json").is_none() {
        return Err(ApiError(BibscopeError::NotFound(format!(
            "job {} has no unified export yet",
            params.job_id
        ))));
    }

    let path = state.pipeline.job_dir(params.job_id).join("unified.json");
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| BibscopeError::Internal(e.to_string()))?;
    let records: Vec<Publication> =
        serde_json::from_str(&content).map_err(|e| BibscopeError::Internal(e.to_string()))?;
    Ok(Json(records))
}

pub async fn duplicates(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<JobId>,
) -> ApiResult<impl IntoResponse> {
    state
        .pipeline
        .registry()
        .get(job_id)
        .await
        .ok_or_else(|| BibscopeError::NotFound(format!("job {job_id}")))?;

    let path = state.pipeline.job_dir(job_id).join("duplicates.json");
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| BibscopeError::NotFound(format!("no duplicate report for job {job_id}: {e}")))?;
    let report: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| BibscopeError::Internal(e.to_string()))?;
    Ok(Json(report))
}

pub async fn download_artifact(
    State(state): State<Arc<AppState>>,
    Path((job_id, format)): Path<(JobId, String)>,
) -> ApiResult<impl IntoResponse> {
    let format = ExportFormat::parse(&format)
        .ok_or_else(|| BibscopeError::NotFound(format!("unknown export format: {format}")))?;

    let job = state
        .pipeline
        .registry()
        .get(job_id)
        .await
        .ok_or_else(|| BibscopeError::NotFound(format!("job {job_id}")))?;

    let path = job.artifact_paths.get(format.key()).cloned().unwrap_or_else(|| {
        state
            .pipeline
            .job_dir(job_id)
            .join(format.filename())
            .display()
            .to_string()
    });

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| BibscopeError::NotFound(format!("artifact not available for job {job_id}: {e}")))?;

    Ok(([(header::CONTENT_TYPE, format.content_type())], bytes))
}

#[derive(Serialize)]
pub struct CancelResponse {
    status: &'static str,
}

pub async fn cancel(State(state): State<Arc<AppState>>, Path(job_id): Path<JobId>) -> ApiResult<impl IntoResponse> {
    state.pipeline.cancel(job_id).await?;
    Ok(Json(CancelResponse { status: "cancelled" }))
}

pub async fn sources(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.pipeline.list_sources())
}
