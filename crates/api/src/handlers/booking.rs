//! Handlers for creating bookings.

use axum::extract::State;
use axum::response::Response;
use axum::Form;
use serde::Deserialize;
use wanderlust_core::booking::{Stay, INVALID_DATES_MESSAGE};
use wanderlust_core::types::DbId;
use wanderlust_db::models::booking::CreateBooking;
use wanderlust_db::repositories::{BookingRepo, ListingRepo};

use super::listing::LISTING_NOT_FOUND;
use super::{redirect_with_error, redirect_with_success};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::session::Session;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    #[serde(default)]
    pub listing_id: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

/// POST /bookings
///
/// Prices the stay at the listing's nightly rate times the number of started
/// days and records it as `pending`. Overlapping bookings are not checked.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    session: Session,
    Form(input): Form<BookingForm>,
) -> AppResult<Response> {
    let listing = match input.listing_id.trim().parse::<DbId>() {
        Ok(id) => ListingRepo::find_by_id(&state.pool, id).await?,
        Err(_) => None,
    };
    let Some(listing) = listing else {
        return Ok(redirect_with_error(&session, "/listings", LISTING_NOT_FOUND));
    };

    let Ok(stay) = Stay::parse(&input.start_date, &input.end_date) else {
        return Ok(redirect_with_error(
            &session,
            &format!("/listings/{}", listing.id),
            INVALID_DATES_MESSAGE,
        ));
    };

    let booking = BookingRepo::create(
        &state.pool,
        &CreateBooking {
            listing_id: listing.id,
            user_id: user.id,
            start_date: stay.start,
            end_date: stay.end,
            total_price: stay.total_price(listing.price),
        },
    )
    .await?;

    tracing::info!(
        booking_id = booking.id,
        listing_id = listing.id,
        user_id = user.id,
        total_price = booking.total_price,
        "Booking created"
    );
    Ok(redirect_with_success(&session, "/mybookings", "Booking created (pending)"))
}
