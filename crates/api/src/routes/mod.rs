pub mod account;
pub mod auth;
pub mod booking;
pub mod health;
pub mod listing;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the page route tree.
///
/// Route hierarchy:
///
/// ```text
/// /                                        redirect to /listings
///
/// /register                                form, register (public)
/// /login                                   form, login (public)
/// /logout                                  logout
///
/// /listings                                index with filters, create
/// /listings/new                            create form
/// /listings/{id}                           show, update, delete
/// /listings/{id}/edit                      edit form
/// /listings/{id}/map                       map view
/// /listings/{id}/reviews                   create review
/// /listings/{id}/reviews/{review_id}       delete review
///
/// /bookings                                create booking
/// /mybookings                              the user's bookings
/// /mylistings                              the user's listings
/// ```
///
/// PUT and DELETE arrive as POST with `?_method=`; see
/// [`method_override`](crate::middleware::method_override).
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::listing::root))
        .merge(auth::router())
        .nest("/listings", listing::router())
        .merge(booking::router())
        .merge(account::router())
}
