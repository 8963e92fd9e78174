/*
 * Responsibility
 * - App-wide AppError definition
 * - IntoResponse impl (HTTP status / JSON error body)
 * - Convert repo / validation / token errors into one taxonomy
 *
 * Body shape is `{"message": ...}` plus an `errors` list for validation
 * failures. The 401 messages are part of the client contract and must not
 * carry internal detail.
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

/// One failed field of a validated payload.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request data")]
    Validation(Vec<FieldError>),
    #[error("not authorized, no token")]
    MissingToken,
    #[error("not authorized, token failed")]
    TokenRejected,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Invalid request data".to_string(),
                errors,
            ),
            AppError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "Not authorized, no token".to_string(),
                Vec::new(),
            ),
            AppError::TokenRejected => (
                StatusCode::UNAUTHORIZED,
                "Not authorized, token failed".to_string(),
                Vec::new(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
                Vec::new(),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                format!("{resource} not found"),
                Vec::new(),
            ),
            AppError::Conflict(message) => {
                (StatusCode::CONFLICT, message.to_string(), Vec::new())
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
                Vec::new(),
            ),
        };

        (status, Json(ErrorResponse { message, errors })).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::Conflict("resource already exists"),
            RepoError::Db(err) => {
                // Full detail stays server-side; the client sees a generic 500.
                tracing::error!(error = %err, "database error");
                AppError::Internal
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let errors = e
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| FieldError {
                    field: field.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string()),
                })
            })
            .collect();

        AppError::Validation(errors)
    }
}
