//! Request handlers, one module per resource.
//!
//! Handlers follow the post/redirect/get pattern: expected failures (bad
//! input, missing records, duplicate submissions) become a flash message and
//! a redirect; only unexpected errors propagate as [`AppError`](crate::error::AppError).

pub mod account;
pub mod auth;
pub mod booking;
pub mod listing;
pub mod review;

use axum::response::{IntoResponse, Redirect, Response};
use validator::ValidationErrors;

use crate::session::Session;

/// Flash an error and redirect.
pub(crate) fn redirect_with_error(session: &Session, to: &str, message: impl Into<String>) -> Response {
    session.flash_error(message);
    Redirect::to(to).into_response()
}

/// Flash a success message and redirect.
pub(crate) fn redirect_with_success(
    session: &Session,
    to: &str,
    message: impl Into<String>,
) -> Response {
    session.flash_success(message);
    Redirect::to(to).into_response()
}

/// First human-readable message out of a validation failure, picked in field
/// name order so the result is stable.
pub(crate) fn first_validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid input".to_string())
}
