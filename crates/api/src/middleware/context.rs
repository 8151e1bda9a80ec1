//! Per-request view context: who is signed in and which flashes to show.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use wanderlust_db::models::user::SessionUser;
use wanderlust_db::repositories::UserRepo;

use crate::error::AppError;
use crate::session::{Flash, Session};
use crate::state::AppState;

/// Everything the page layout needs besides the page body.
///
/// Building one consumes the pending flashes, so take it only in handlers
/// that render a page. Handlers that may still redirect call
/// [`ViewContext::load`] once they know they will render.
#[derive(Debug, Clone, Default)]
pub struct ViewContext {
    pub current_user: Option<SessionUser>,
    pub flashes: Vec<Flash>,
}

impl ViewContext {
    /// Resolve the signed-in user and take the session's pending flashes.
    pub async fn load(state: &AppState, session: &Session) -> Result<Self, AppError> {
        let current_user = match session.user_id() {
            Some(id) => UserRepo::find_session_user(&state.pool, id).await?,
            None => None,
        };

        Ok(ViewContext {
            current_user,
            flashes: session.take_flashes(),
        })
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user.is_some()
    }
}

impl FromRequestParts<AppState> for ViewContext {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        ViewContext::load(state, &session)
            .await
            .map_err(IntoResponse::into_response)
    }
}
