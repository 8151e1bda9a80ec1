//! Route definitions for the `/listings` resource.
//!
//! Also nests review routes under `/listings/{id}/reviews`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{listing, review};
use crate::state::AppState;

/// Routes mounted at `/listings`.
///
/// ```text
/// GET    /                              -> index
/// POST   /                              -> create
/// GET    /new                           -> new_form
/// GET    /{id}                          -> show
/// PUT    /{id}                          -> update
/// DELETE /{id}                          -> delete
/// GET    /{id}/edit                     -> edit_form
/// GET    /{id}/map                      -> map
///
/// POST   /{id}/reviews                  -> review::create
/// DELETE /{id}/reviews/{review_id}      -> review::delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(listing::index).post(listing::create))
        .route("/new", get(listing::new_form))
        .route(
            "/{id}",
            get(listing::show)
                .put(listing::update)
                .delete(listing::delete),
        )
        .route("/{id}/edit", get(listing::edit_form))
        .route("/{id}/map", get(listing::map))
        .route("/{id}/reviews", post(review::create))
        .route("/{id}/reviews/{review_id}", delete(review::delete))
}
