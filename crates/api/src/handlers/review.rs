//! Handlers for adding and removing reviews on a listing.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Form;
use serde::Deserialize;
use wanderlust_core::rating::{parse_rating, validate_comment};
use wanderlust_core::types::DbId;
use wanderlust_db::models::review::CreateReview;
use wanderlust_db::repositories::{ListingRepo, ReviewRepo};

use super::listing::LISTING_NOT_FOUND;
use super::{redirect_with_error, redirect_with_success};
use crate::error::{is_unique_violation, AppResult};
use crate::middleware::auth::AuthUser;
use crate::session::Session;
use crate::state::AppState;

pub const ALREADY_REVIEWED: &str = "You have already reviewed this listing";
pub const NOT_REVIEW_AUTHOR: &str = "You can only delete your own reviews";

#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    pub rating: String,
    /// Review text.
    #[serde(default, alias = "comment")]
    pub review: String,
}

/// POST /listings/{id}/reviews
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    session: Session,
    Path(id): Path<DbId>,
    Form(input): Form<ReviewForm>,
) -> AppResult<Response> {
    let listing_path = format!("/listings/{id}");

    if ListingRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Ok(redirect_with_error(&session, "/listings", LISTING_NOT_FOUND));
    }

    let rating = match parse_rating(&input.rating) {
        Ok(rating) => rating,
        Err(e) => return Ok(redirect_with_error(&session, &listing_path, e.to_string())),
    };
    let comment = input.review.trim().to_string();
    if let Err(e) = validate_comment(&comment) {
        return Ok(redirect_with_error(&session, &listing_path, e.to_string()));
    }

    if ReviewRepo::find_by_listing_and_user(&state.pool, id, user.id)
        .await?
        .is_some()
    {
        return Ok(redirect_with_error(&session, &listing_path, ALREADY_REVIEWED));
    }

    let input = CreateReview {
        listing_id: id,
        user_id: user.id,
        rating,
        comment,
    };
    match ReviewRepo::create(&state.pool, &input).await {
        Ok(Some(review)) => {
            tracing::info!(review_id = review.id, listing_id = id, user_id = user.id, "Review added");
            Ok(redirect_with_success(&session, &listing_path, "Review added successfully"))
        }
        Ok(None) => Ok(redirect_with_error(&session, "/listings", LISTING_NOT_FOUND)),
        Err(ref e) if is_unique_violation(e, "uq_reviews_listing_user") => {
            Ok(redirect_with_error(&session, &listing_path, ALREADY_REVIEWED))
        }
        Err(e) => {
            tracing::error!(error = %e, listing_id = id, "Failed to add review");
            Ok(redirect_with_error(&session, &listing_path, "Error adding review"))
        }
    }
}

/// DELETE /listings/{id}/reviews/{review_id}
///
/// Only the author may delete, and only through the listing the review
/// belongs to.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    session: Session,
    Path((id, review_id)): Path<(DbId, DbId)>,
) -> AppResult<Response> {
    let listing_path = format!("/listings/{id}");

    let review = ReviewRepo::find_by_id(&state.pool, review_id).await?;
    let Some(review) = review.filter(|r| r.user_id == user.id && r.listing_id == id) else {
        return Ok(redirect_with_error(&session, &listing_path, NOT_REVIEW_AUTHOR));
    };

    match ReviewRepo::delete(&state.pool, id, review.id).await {
        Ok(true) => {
            tracing::info!(review_id, listing_id = id, user_id = user.id, "Review deleted");
            Ok(redirect_with_success(&session, &listing_path, "Review deleted successfully"))
        }
        Ok(false) => Ok(redirect_with_error(&session, &listing_path, NOT_REVIEW_AUTHOR)),
        Err(e) => {
            tracing::error!(error = %e, review_id, listing_id = id, "Failed to delete review");
            Ok(redirect_with_error(&session, &listing_path, "Error deleting review"))
        }
    }
}
