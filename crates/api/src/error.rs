use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mockview_core::authoring::AuthoringError;
use mockview_core::error::CoreError;
use mockview_core::store::StoreError;
use mockview_core::types::FieldErrors;
use serde_json::json;

/// User-facing message for any failed submit, whatever the cause.
pub const SUBMIT_FAILED_MESSAGE: &str = "Something went wrong. Please try again later";

/// Application-level error type for HTTP handlers.
///
/// Wraps domain errors from `mockview_core` and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses of
/// the form `{ "error": ..., "code": ... }`, plus `fields` for field-level
/// validation failures.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `mockview_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failed or rejected interview submission.
    #[error(transparent)]
    Authoring(#[from] AuthoringError),

    /// A document-store error outside the authoring flow.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A request body that is not a JSON document.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, fields) = match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                    None,
                ),
                CoreError::InvalidFields(fields) => validation_failed(fields),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg, None),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg, None)
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg, None),
            },

            // --- Authoring outcomes ---
            AppError::Authoring(err) => match err {
                AuthoringError::Invalid(fields) => validation_failed(fields),
                AuthoringError::Busy => (
                    StatusCode::CONFLICT,
                    "SUBMISSION_IN_PROGRESS",
                    "A submission for this form is already in progress".to_string(),
                    None,
                ),
                AuthoringError::SubmitFailed(cause) => {
                    tracing::error!(error = %cause, "Interview submission failed");
                    (
                        StatusCode::BAD_GATEWAY,
                        "SUBMIT_FAILED",
                        SUBMIT_FAILED_MESSAGE.to_string(),
                        None,
                    )
                }
            },

            // --- Store errors ---
            AppError::Store(err) => match err {
                StoreError::NotFound(id) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("Interview with id {id} not found"),
                    None,
                ),
                StoreError::Backend(source) => {
                    tracing::error!(error = %source, "Document store error");
                    internal()
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(fields) = fields {
            body["fields"] = json!(fields);
        }

        (status, axum::Json(body)).into_response()
    }
}

type ErrorParts = (StatusCode, &'static str, String, Option<FieldErrors>);

fn validation_failed(fields: FieldErrors) -> ErrorParts {
    (
        StatusCode::BAD_REQUEST,
        "VALIDATION_ERROR",
        "Validation failed".to_string(),
        Some(fields),
    )
}

fn internal() -> ErrorParts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
        None,
    )
}
