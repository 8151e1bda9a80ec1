//! Repository for the `reviews` table.
//!
//! Every write goes through a transaction that locks the parent listing and
//! rewrites its rating summary from the full set of ratings, so the stored
//! average always matches the reviews that exist.

use sqlx::{PgConnection, PgPool};
use wanderlust_core::rating::RatingSummary;
use wanderlust_core::types::DbId;

use crate::models::review::{CreateReview, Review, ReviewWithAuthor};
use crate::repositories::ListingRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, listing_id, user_id, rating, comment, created_at";

/// Provides CRUD operations for reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review and refresh the listing's rating summary.
    ///
    /// Returns `None` if the listing does not exist. A second review by the
    /// same user violates `uq_reviews_listing_user`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateReview,
    ) -> Result<Option<Review>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !ListingRepo::lock(&mut tx, input.listing_id).await? {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO reviews (listing_id, user_id, rating, comment)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let review = sqlx::query_as::<_, Review>(&query)
            .bind(input.listing_id)
            .bind(input.user_id)
            .bind(input.rating)
            .bind(&input.comment)
            .fetch_one(&mut *tx)
            .await?;

        refresh_summary(&mut tx, input.listing_id).await?;
        tx.commit().await?;

        Ok(Some(review))
    }

    /// Delete a review belonging to `listing_id` and refresh the summary.
    ///
    /// Returns `false` if no such review exists on that listing.
    pub async fn delete(
        pool: &PgPool,
        listing_id: DbId,
        review_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !ListingRepo::lock(&mut tx, listing_id).await? {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM reviews WHERE id = $1 AND listing_id = $2")
            .bind(review_id)
            .bind(listing_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        refresh_summary(&mut tx, listing_id).await?;
        tx.commit().await?;

        Ok(true)
    }

    /// Find a review by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The review a user left on a listing, if any.
    pub async fn find_by_listing_and_user(
        pool: &PgPool,
        listing_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM reviews WHERE listing_id = $1 AND user_id = $2");
        sqlx::query_as::<_, Review>(&query)
            .bind(listing_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Reviews on a listing with author names, newest first.
    pub async fn list_for_listing(
        pool: &PgPool,
        listing_id: DbId,
    ) -> Result<Vec<ReviewWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, ReviewWithAuthor>(
            "SELECT r.id, r.listing_id, r.user_id, r.rating, r.comment, r.created_at,
                    u.name AS author_name
             FROM reviews r
             JOIN users u ON u.id = r.user_id
             WHERE r.listing_id = $1
             ORDER BY r.created_at DESC, r.id DESC",
        )
        .bind(listing_id)
        .fetch_all(pool)
        .await
    }
}

/// Recompute and store a listing's summary from its current reviews.
async fn refresh_summary(conn: &mut PgConnection, listing_id: DbId) -> Result<(), sqlx::Error> {
    let ratings: Vec<i32> = sqlx::query_scalar("SELECT rating FROM reviews WHERE listing_id = $1")
        .bind(listing_id)
        .fetch_all(&mut *conn)
        .await?;

    let summary = RatingSummary::from_ratings(&ratings);
    tracing::debug!(
        listing_id,
        average = summary.average,
        count = summary.count,
        "Refreshed rating summary"
    );
    ListingRepo::set_rating_summary(conn, listing_id, &summary).await
}
