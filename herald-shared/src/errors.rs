use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{service}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E5xxx: Notification errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    ServiceUnavailable,
    BadRequest,

    // Notification (E5xxx)
    PreferenceNotFound,
    NotificationsDisabled,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::ServiceUnavailable => "E0007",
            Self::BadRequest => "E0008",

            // Notification
            Self::PreferenceNotFound => "E5001",
            Self::NotificationsDisabled => "E5002",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::ValidationError | Self::BadRequest | Self::NotificationsDisabled => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound | Self::PreferenceNotFound => StatusCode::NOT_FOUND,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// The error code carried by a `Known` error, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Known { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message, details) = match self {
            AppError::Known { code, message, details } => (code, message, details),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (ErrorCode::InternalError, "internal server error".to_string(), None)
            }
            AppError::Database(diesel::result::Error::NotFound) => {
                (ErrorCode::NotFound, "resource not found".to_string(), None)
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                (ErrorCode::InternalError, "database error".to_string(), None)
            }
            AppError::Validation(msg) => (ErrorCode::ValidationError, msg, None),
        };

        let mut body = ApiErrorResponse::new(code.code(), message);
        if let Some(d) = details {
            body = body.with_details(d);
        }

        (code.status_code(), Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
