//! Repository for the `bookings` table.

use sqlx::PgPool;
use wanderlust_core::booking::BOOKING_STATUS_PENDING;
use wanderlust_core::types::DbId;

use crate::models::booking::{Booking, BookingWithListing, CreateBooking};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, listing_id, user_id, start_date, end_date, total_price, status, created_at";

/// Provides CRUD operations for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Insert a new booking in the `pending` state.
    ///
    /// A missing listing violates the `listing_id` foreign key.
    pub async fn create(pool: &PgPool, input: &CreateBooking) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings (listing_id, user_id, start_date, end_date, total_price, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(input.listing_id)
            .bind(input.user_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.total_price)
            .bind(BOOKING_STATUS_PENDING)
            .fetch_one(pool)
            .await
    }


    /// A user's bookings with the booked listing's summary, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<BookingWithListing>, sqlx::Error> {
        sqlx::query_as::<_, BookingWithListing>(
            "SELECT b.id, b.listing_id, b.start_date, b.end_date, b.total_price, b.status,
                    b.created_at,
                    l.title AS listing_title,
                    l.location AS listing_location,
                    l.image_url AS listing_image_url
             FROM bookings b
             JOIN listings l ON l.id = b.listing_id
             WHERE b.user_id = $1
             ORDER BY b.created_at DESC, b.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Count bookings against a listing.
    pub async fn count_for_listing(pool: &PgPool, listing_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE listing_id = $1")
            .bind(listing_id)
            .fetch_one(pool)
            .await
    }
}
