use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::uploads::UploadError;
use crate::views;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to render a consistent HTML error page.
/// Expected failures (rejected form input as
/// [`CoreError`](wanderlust_core::error::CoreError), missing records) are
/// handled in the handler with a flash and redirect; whatever reaches this
/// type is the catch-all path.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Storing an uploaded image failed.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Message shown for every 5xx response.
const GENERIC_FAILURE: &str = "Something went wrong";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Upload errors ---
            AppError::Upload(UploadError::NotAnImage(content_type)) => (
                StatusCode::BAD_REQUEST,
                format!("Only image uploads are accepted, got '{content_type}'"),
            ),
            AppError::Upload(err) => {
                tracing::error!(error = %err, "Image upload failed");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE.to_string())
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE.to_string())
            }
        };

        (status, views::error_page(status, &message)).into_response()
    }
}

/// True when `err` is a PostgreSQL unique violation (`23505`) on `constraint`.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

/// Classify a sqlx error into an HTTP status and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String) {
    match err {
        sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE.to_string())
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE.to_string())
        }
    }
}
