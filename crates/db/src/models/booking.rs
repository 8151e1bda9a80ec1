//! Booking entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use wanderlust_core::types::{DbId, Timestamp};

/// Full booking row from the `bookings` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Booking {
    pub id: DbId,
    pub listing_id: DbId,
    pub user_id: DbId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub total_price: f64,
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for creating a booking. Status is always `pending` on insert.
#[derive(Debug)]
pub struct CreateBooking {
    pub listing_id: DbId,
    pub user_id: DbId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub total_price: f64,
}

/// A booking joined with the listing it reserves, for the "my bookings" page.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookingWithListing {
    pub id: DbId,
    pub listing_id: DbId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub total_price: f64,
    pub status: String,
    pub created_at: Timestamp,
    pub listing_title: String,
    pub listing_location: Option<String>,
    pub listing_image_url: Option<String>,
}
