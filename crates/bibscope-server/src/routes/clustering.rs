//! Hierarchical clustering endpoints (spec §6 `/clustering/...`).

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use bibscope_clustering::{cluster, compare_methods, ClusterCount};
use bibscope_common::types::LinkageMethod;
use bibscope_vectorize::TfidfParams;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::AppState;

#[derive(Deserialize)]
pub struct HierarchicalRequest {
    abstracts: Vec<String>,
    method: LinkageMethod,
    #[serde(default)]
    num_clusters: Option<usize>,
    #[serde(default)]
    labels: Option<Vec<String>>,
    #[serde(default)]
    generate_dendrogram: bool,
}

pub async fn hierarchical(
    State(_state): State<Arc<AppState>>,
    Json(request): Json<HierarchicalRequest>,
) -> ApiResult<impl IntoResponse> {
    let count = match request.num_clusters {
        Some(k) => ClusterCount::Exact(k),
        None => ClusterCount::Auto,
    };
    let mut result = cluster(&request.abstracts, &TfidfParams::default(), request.method, count);
    if !request.generate_dendrogram {
        result.dendrogram.clear();
    }
    Ok(Json(WithLabels {
        result,
        labels: request.labels,
    }))
}

#[derive(Serialize)]
struct WithLabels {
    #[serde(flatten)]
    result: bibscope_common::types::ClusteringResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct CompareMethodsRequest {
    abstracts: Vec<String>,
    #[serde(default)]
    num_clusters: Option<usize>,
}

pub async fn compare_methods_handler(
    State(_state): State<Arc<AppState>>,
    Json(request): Json<CompareMethodsRequest>,
) -> ApiResult<impl IntoResponse> {
    let count = match request.num_clusters {
        Some(k) => ClusterCount::Exact(k),
        None => ClusterCount::Auto,
    };
    let comparison = compare_methods(&request.abstracts, &TfidfParams::default(), count);
    Ok(Json(comparison))
}

#[derive(Serialize)]
pub struct MethodDescriptor {
    name: &'static str,
    formula: &'static str,
}

pub async fn methods() -> impl IntoResponse {
    Json(vec![
        MethodDescriptor {
            name: "ward",
            formula: "minimizes the increase in total within-cluster variance at each merge",
        },
        MethodDescriptor {
            name: "average",
            formula: "d(A ∪ B, C) = mean over a in A, b in B of d({a}, {b})",
        },
        MethodDescriptor {
            name: "complete",
            formula: "d(A, B) = max over a in A, b in B of d(a, b)",
        },
    ])
}
