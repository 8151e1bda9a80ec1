//! Session-based authentication guard for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use wanderlust_db::models::user::SessionUser;
use wanderlust_db::repositories::UserRepo;

use crate::error::AppError;
use crate::session::Session;
use crate::state::AppState;

/// Flash shown when an anonymous visitor hits a guarded route.
pub const LOGIN_REQUIRED_MESSAGE: &str = "You must be logged in";

/// Authenticated user resolved from the session cookie.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication. Anonymous requests (no session, or a session pointing at
/// a user that no longer exists) are redirected to `/login` with a flash:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Redirect> {
///     tracing::info!(user_id = user.id, "handling request");
///     Ok(Redirect::to("/listings"))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: wanderlust_core::types::DbId,
    pub user: SessionUser,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        if let Some(user_id) = session.user_id() {
            let user = UserRepo::find_session_user(&state.pool, user_id)
                .await
                .map_err(|e| AppError::from(e).into_response())?;
            if let Some(user) = user {
                return Ok(AuthUser { id: user.id, user });
            }
            tracing::debug!(user_id, "Session refers to a missing user");
        }

        session.flash_error(LOGIN_REQUIRED_MESSAGE);
        Err(Redirect::to("/login").into_response())
    }
}
