//! Mapping from engine errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lendchain_ledger::EngineError;
use serde_json::json;

/// Wrapper giving engine errors an HTTP rendering: validation failures are
/// 400, missing pools 404, conflicts 409, all as `{"error": ...}` JSON.
pub struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            EngineError::SameParty
            | EngineError::BlankIdentifier
            | EngineError::NonPositiveAmount
            | EngineError::ExceedsMintLimit { .. }
            | EngineError::InsufficientBalance { .. }
            | EngineError::InvalidSplitRate(_)
            | EngineError::Queue(_) => StatusCode::BAD_REQUEST,
            EngineError::PoolNotFound(_) => StatusCode::NOT_FOUND,
            EngineError::DuplicatePool(_) | EngineError::Pool(_) => StatusCode::CONFLICT,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
