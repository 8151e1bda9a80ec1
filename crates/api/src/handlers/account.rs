//! Handlers for the signed-in user's own bookings and listings.

use axum::extract::State;
use maud::Markup;
use wanderlust_db::repositories::{BookingRepo, ListingRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::context::ViewContext;
use crate::state::AppState;
use crate::views;

/// GET /mybookings
pub async fn my_bookings(
    State(state): State<AppState>,
    user: AuthUser,
    ctx: ViewContext,
) -> AppResult<Markup> {
    let bookings = BookingRepo::list_for_user(&state.pool, user.id).await?;
    Ok(views::account::my_bookings(&ctx, &bookings))
}

/// GET /mylistings
pub async fn my_listings(
    State(state): State<AppState>,
    user: AuthUser,
    ctx: ViewContext,
) -> AppResult<Markup> {
    let listings = ListingRepo::list_by_host(&state.pool, user.id).await?;
    Ok(views::account::my_listings(&ctx, &listings))
}
