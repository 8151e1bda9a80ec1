use axum::routing::post;
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// ```text
/// POST   /bookings    -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/bookings", post(booking::create))
}
