//! # API Errors
//!
//! Error taxonomy for the HTTP layer:
//! - validation (400, field-level detail)
//! - not-found (404)
//! - conflict / duplicate SKU (409)
//! - bad-request / semantic (400)
//! - insufficient-stock (400, carries available and requested quantities)
//! - internal (500, detail only exposed in development mode)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

use super::envelope::ApiResponse;
use crate::config::Environment;
use crate::observability::{Logger, Severity};
use crate::product::FieldError;
use crate::store::RepoError;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// API errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Payload failed the declarative validation rules
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// No visible record for the requested id
    #[error("{0}")]
    NotFound(String),

    /// Live-SKU unique constraint violated
    #[error("{0}")]
    Conflict(String),

    /// Semantically invalid request (empty patch, bad report type, ...)
    #[error("{0}")]
    BadRequest(String),

    /// Subtract operation exceeds stock on hand
    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i64, requested: i64 },

    /// Restore requested for a record that is not deleted
    #[error("product is not deleted")]
    NotDeleted,

    /// Unclassified failure
    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotDeleted => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(id) => ApiError::NotFound(format!("product {} not found", id)),
            RepoError::DuplicateSku(sku) => {
                ApiError::Conflict(format!("SKU '{}' is already in use", sku))
            }
            RepoError::NotDeleted(_) => ApiError::NotDeleted,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body: ApiResponse<Value> = match &self {
            ApiError::Validation(errors) => {
                ApiResponse::fail("validation failed", Some(errors.clone()))
            }
            ApiError::InsufficientStock {
                available,
                requested,
            } => {
                let mut response = ApiResponse::fail(self.to_string(), None);
                response.data = Some(json!({
                    "available": available,
                    "requested": requested,
                }));
                response
            }
            ApiError::Internal(detail) => {
                Logger::log_stderr(
                    Severity::Error,
                    "request_failed",
                    &[("detail", detail.as_str())],
                );
                if Environment::current().is_development() {
                    ApiResponse::fail(format!("internal server error: {}", detail), None)
                } else {
                    ApiResponse::fail("internal server error", None)
                }
            }
            _ => ApiResponse::fail(self.to_string(), None),
        };
        (status, Json(body)).into_response()
    }
}
