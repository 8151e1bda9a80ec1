//! Review entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use wanderlust_core::types::{DbId, Timestamp};

/// Full review row from the `reviews` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
    pub id: DbId,
    pub listing_id: DbId,
    pub user_id: DbId,
    pub rating: i32,
    pub comment: String,
    pub created_at: Timestamp,
}

/// DTO for creating a review.
#[derive(Debug)]
pub struct CreateReview {
    pub listing_id: DbId,
    pub user_id: DbId,
    pub rating: i32,
    pub comment: String,
}

/// A review joined with its author's display name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReviewWithAuthor {
    pub id: DbId,
    pub listing_id: DbId,
    pub user_id: DbId,
    pub rating: i32,
    pub comment: String,
    pub created_at: Timestamp,
    pub author_name: String,
}
