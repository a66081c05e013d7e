//! Error handling for the Mlimi Wanzeru advisory server
//!
//! Provides consistent JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::AdvisoryError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Advisory computation errors
    #[error(transparent)]
    Advisory(#[from] AdvisoryError),

    #[error("Requested grid has {requested} points, limit is {limit}")]
    GridTooLarge { requested: usize, limit: usize },

    // External service errors
    #[error("{service} unavailable: {message}")]
    ExternalService { service: String, message: String },

    #[error("Invalid response from {service}: {message}")]
    UpstreamParse { service: String, message: String },

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn external(service: &str, message: impl Into<String>) -> Self {
        AppError::ExternalService {
            service: service.to_string(),
            message: message.into(),
        }
    }

    pub fn upstream_parse(service: &str, message: impl Into<String>) -> Self {
        AppError::UpstreamParse {
            service: service.to_string(),
            message: message.into(),
        }
    }

    /// Machine-readable code, as sent in error responses
    pub fn code(&self) -> String {
        self.status_and_detail().1.code
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        match fields.first() {
            Some((field, field_errors)) => AppError::Validation {
                field: field.to_string(),
                message: field_errors
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field)),
            },
            None => AppError::ValidationError(errors.to_string()),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
            AppError::Advisory(err) => {
                let (status, field) = match err {
                    AdvisoryError::MissingInput(field) => {
                        (StatusCode::BAD_REQUEST, Some(field.clone()))
                    }
                    AdvisoryError::InvalidResolution(_) => {
                        (StatusCode::BAD_REQUEST, Some("resolution".to_string()))
                    }
                    AdvisoryError::InvalidBounds(_) => {
                        (StatusCode::BAD_REQUEST, Some("bounds".to_string()))
                    }
                    AdvisoryError::InvalidRange { field, .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, Some(field.clone()))
                    }
                    AdvisoryError::InsufficientData { .. } | AdvisoryError::NoCropsAvailable => {
                        (StatusCode::SERVICE_UNAVAILABLE, None)
                    }
                    AdvisoryError::InvariantViolation(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, None)
                    }
                };
                (
                    status,
                    ErrorDetail {
                        code: err.kind().to_string(),
                        message: err.to_string(),
                        field,
                    },
                )
            }
            AppError::GridTooLarge { .. } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "GRID_TOO_LARGE".to_string(),
                    message: format!("{}. Use smaller bounds or a coarser resolution", self),
                    field: Some("resolution".to_string()),
                },
            ),
            AppError::ExternalService { service, .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "EXTERNAL_SERVICE_UNAVAILABLE".to_string(),
                    message: format!(
                        "{} is temporarily unavailable and no cached data exists",
                        service
                    ),
                    field: None,
                },
            ),
            AppError::UpstreamParse { service, .. } => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "UPSTREAM_RESPONSE_INVALID".to_string(),
                    message: format!("Unexpected response from {}", service),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message: "A database error occurred".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
