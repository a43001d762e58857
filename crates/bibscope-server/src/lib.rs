//! Bibliometric analysis backend: HTTP surface over acquisition,
//! similarity, concept-frequency, and clustering engines (spec §6).

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::{Json, Router};
use bibscope_acquisition::{AcquisitionPipeline, BoxedAdapter, FixtureSourceAdapter};
use bibscope_common::types::Publication;
use bibscope_common::config::SystemConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, AllowOrigin, CorsLayer};

/// Shared application state accessible from every handler.
pub struct AppState {
    pub pipeline: AcquisitionPipeline,
    pub metrics_handle: PrometheusHandle,
}

/// Synthetic adapters standing in for the real ACM/SAGE/ScienceDirect
/// integrations, which are external collaborators (spec §4.2, Non-goal).
/// Production deployments register real adapters the same way.
fn default_adapters() -> Vec<BoxedAdapter> {
    vec![
        Arc::new(FixtureSourceAdapter::new("acm", Vec::<Publication>::new())),
        Arc::new(FixtureSourceAdapter::new("sage", Vec::<Publication>::new())),
        Arc::new(FixtureSourceAdapter::new("sciencedirect", Vec::<Publication>::new())),
    ]
}

pub fn build_router(system: &SystemConfig, metrics_handle: PrometheusHandle) -> Router {
    let pipeline = AcquisitionPipeline::new(
        &system.acquisition,
        system.retry.clone(),
        &system.server.download_base_dir,
        default_adapters(),
    );

    let state = Arc::new(AppState { pipeline, metrics_handle });

    let cors = if system.server.cors_allowed_origins.is_empty() {
        tracing::warn!("no cors_allowed_origins configured — allowing any origin");
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        let origins: Vec<_> = system
            .server
            .cors_allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/metrics", get(metrics_handler))
        .route("/api/v1/data/download", post(routes::data::download))
        .route("/api/v1/data/status/{job_id}", get(routes::data::status))
        .route("/api/v1/data/jobs", get(routes::data::jobs))
        .route("/api/v1/data/unified", get(routes::data::unified))
        .route("/api/v1/data/duplicates/{job_id}", get(routes::data::duplicates))
        .route("/api/v1/data/download/{job_id}/{format}", get(routes::data::download_artifact))
        .route("/api/v1/data/cancel/{job_id}", delete(routes::data::cancel))
        .route("/api/v1/data/sources", get(routes::data::sources))
        .route("/api/v1/similarity/compare", post(routes::similarity::compare))
        .route("/api/v1/similarity/compare-all", post(routes::similarity::compare_all))
        .route("/api/v1/similarity/analyze", post(routes::similarity::analyze))
        .route("/api/v1/similarity/batch", post(routes::similarity::batch))
        .route("/api/v1/similarity/algorithms", get(routes::similarity::algorithms))
        .route(
            "/api/v1/frequency/analyze-concepts",
            post(routes::frequency::analyze_concepts_handler),
        )
        .route(
            "/api/v1/frequency/extract-keywords",
            post(routes::frequency::extract_keywords_handler),
        )
        .route(
            "/api/v1/frequency/precision-analysis",
            post(routes::frequency::precision_analysis_handler),
        )
        .route("/api/v1/frequency/full-report", post(routes::frequency::full_report_handler))
        .route(
            "/api/v1/frequency/predefined-concepts",
            get(routes::frequency::predefined_concepts),
        )
        .route("/api/v1/clustering/hierarchical", post(routes::clustering::hierarchical))
        .route(
            "/api/v1/clustering/compare-methods",
            post(routes::clustering::compare_methods_handler),
        )
        .route("/api/v1/clustering/methods", get(routes::clustering::methods))
        .layer(cors)
        .with_state(state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

async fn metrics_handler(axum::extract::State(state): axum::extract::State<Arc<AppState>>) -> String {
    state.metrics_handle.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let (_recorder, handle) = PrometheusBuilder::new().build().expect("build prometheus recorder");
        let mut system = SystemConfig::default();
        system.server.download_base_dir =
            std::env::temp_dir().join(format!("bibscope-server-test-{}", uuid::Uuid::new_v4())).display().to_string();
        build_router(&system, handle)
    }

    #[tokio::test]
    async fn health_endpoint_reports_healthy() {
        let app = test_router();
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn sources_endpoint_lists_registered_adapters() {
        let app = test_router();
        let response = app
            .oneshot(Request::builder().uri("/api/v1/data/sources").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_job_status_is_not_found() {
        let app = test_router();
        let uri = format!("/api/v1/data/status/{}", uuid::Uuid::new_v4());
        let response = app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn download_rejects_empty_sources() {
        let app = test_router();
        let body = serde_json::json!({
            "query": "machine learning",
            "sources": [],
            "export_formats": ["json"],
        });
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/data/download")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
