use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use parlance_core::error::CoreError;
use parlance_jobs::gateway::{ErrorCategory, GatewayError};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`GatewayError`] for provider
/// pipelines. Implements [`IntoResponse`] to produce consistent
/// `{ "error": CODE, "details": message }` bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `parlance_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A categorised failure from an image or conversation pipeline.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, details) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Pipeline errors ---
            AppError::Gateway(err) => (
                category_status(err.category),
                err.category.as_str(),
                err.details.clone(),
            ),
        };

        let body = json!({
            "error": code,
            "details": details,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// HTTP status for each pipeline error category.
pub fn category_status(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::ConfigurationError => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCategory::ValidationError => StatusCode::BAD_REQUEST,
        ErrorCategory::UpstreamRequestError
        | ErrorCategory::UpstreamJobFailure
        | ErrorCategory::MissingResult => StatusCode::BAD_GATEWAY,
        ErrorCategory::PollTimeout => StatusCode::GATEWAY_TIMEOUT,
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
