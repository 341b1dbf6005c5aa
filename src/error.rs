//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::assessment::desk::SubmissionInProgress;
use crate::assessment::AssessError;
use crate::models::FieldError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Form errors
    InvalidField { field: &'static str, message: String },

    // Submission errors
    NotConfigured(String),
    SubmissionInProgress,

    // Model backend errors (auth, upstream, malformed reply)
    ExternalServiceError(String),

    // Generic errors
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, field) = match &self {
            AppError::InvalidField { field, message } => {
                (StatusCode::BAD_REQUEST, message.as_str(), Some(*field))
            }
            AppError::NotConfigured(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.as_str(), None),
            AppError::SubmissionInProgress => {
                (StatusCode::CONFLICT, "An assessment is already in progress.", None)
            }
            AppError::ExternalServiceError(msg) => {
                tracing::error!("External service error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.as_str(), None)
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
            }
        };

        let mut body = json!({
            "error": error_message,
            "status": status.as_u16()
        });
        if let Some(field) = field {
            body["field"] = json!(field);
        }

        (status, Json(body)).into_response()
    }
}

impl From<FieldError> for AppError {
    fn from(err: FieldError) -> Self {
        AppError::InvalidField {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<AssessError> for AppError {
    fn from(err: AssessError) -> Self {
        match err {
            AssessError::Configuration => {
                AppError::NotConfigured(AssessError::Configuration.user_message())
            }
            other => AppError::ExternalServiceError(other.user_message()),
        }
    }
}

impl From<SubmissionInProgress> for AppError {
    fn from(_: SubmissionInProgress) -> Self {
        AppError::SubmissionInProgress
    }
}
