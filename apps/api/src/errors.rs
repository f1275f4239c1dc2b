use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::store::StoreError;
use crate::webhook_client::WebhookError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Option<String>,
    },

    #[error("Upstream error: {0}")]
    Upstream(#[from] WebhookError),

    /// The webhook answered 2xx with no recognizable tailored text and
    /// placeholder fallback is disabled.
    #[error("Upstream reply not recognized")]
    UnrecognizedReply,

    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            details: None,
        }
    }

    pub fn validation_with(message: impl Into<String>, details: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            details: Some(details.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                message.clone(),
                details.clone(),
            ),
            AppError::Upstream(e) => {
                tracing::error!("Upstream error: {e}");
                let details = match e {
                    WebhookError::Timeout(_) => "Tailoring service timed out".to_string(),
                    WebhookError::Status { status, .. } => {
                        format!("Tailoring service returned status {status}")
                    }
                    WebhookError::Http(_) => "Tailoring service unreachable".to_string(),
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    "Failed to process resume".to_string(),
                    Some(details),
                )
            }
            AppError::UnrecognizedReply => {
                tracing::error!("Upstream reply matched no known shape");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    "Failed to process resume".to_string(),
                    Some("Tailoring service reply not recognized".to_string()),
                )
            }
            AppError::Persistence(e) => {
                tracing::error!("Persistence error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PERSISTENCE_ERROR",
                    "A storage error occurred".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = Value::String(details);
        }

        (status, Json(body)).into_response()
    }
}
