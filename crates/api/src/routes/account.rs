use axum::routing::get;
use axum::Router;

use crate::handlers::account;
use crate::state::AppState;

/// Pages scoped to the signed-in user.
///
/// ```text
/// GET    /mybookings  -> my_bookings
/// GET    /mylistings  -> my_listings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mybookings", get(account::my_bookings))
        .route("/mylistings", get(account::my_listings))
}
