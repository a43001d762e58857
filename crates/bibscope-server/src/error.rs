//! Maps `BibscopeError` onto HTTP responses (spec §7's table). Never
//! serializes the `Debug` representation into the body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bibscope_common::BibscopeError;

pub struct ApiError(pub BibscopeError);

impl From<BibscopeError> for ApiError {
    fn from(e: BibscopeError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            BibscopeError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BibscopeError::NotFound(_) => StatusCode::NOT_FOUND,
            BibscopeError::Source { .. } => StatusCode::BAD_GATEWAY,
            BibscopeError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BibscopeError::Computation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BibscopeError::Cancelled(_) => StatusCode::OK,
            BibscopeError::Conflict(_) => StatusCode::CONFLICT,
            BibscopeError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BibscopeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
