//! Review rating rules and the denormalized rating summary stored on listings.

use crate::error::CoreError;

/// Lowest accepted star rating.
pub const MIN_RATING: i32 = 1;

/// Highest accepted star rating.
pub const MAX_RATING: i32 = 5;

/// Maximum length of a review comment.
pub const MAX_COMMENT_LENGTH: usize = 5_000;

/// Aggregate written to `listings.average_rating` / `listings.total_reviews`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    /// Arithmetic mean rounded to one decimal place; `0.0` with no reviews.
    pub average: f64,
    /// Number of reviews the average was computed over.
    pub count: i32,
}

impl RatingSummary {
    /// Summarize a complete set of ratings for one listing.
    ///
    /// # Examples
    ///
    /// ```
    /// use wanderlust_core::rating::RatingSummary;
    /// let summary = RatingSummary::from_ratings(&[5, 3, 4]);
    /// assert_eq!(summary.average, 4.0);
    /// assert_eq!(summary.count, 3);
    /// ```
    pub fn from_ratings(ratings: &[i32]) -> Self {
        if ratings.is_empty() {
            return Self {
                average: 0.0,
                count: 0,
            };
        }

        let total: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
        let mean = total as f64 / ratings.len() as f64;

        Self {
            average: round_to_tenth(mean),
            count: ratings.len() as i32,
        }
    }
}

/// Round to one decimal place, halves away from zero.
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Parse and range-check a submitted rating.
pub fn parse_rating(raw: &str) -> Result<i32, CoreError> {
    let rating: i32 = raw.trim().parse().map_err(|_| {
        CoreError::Validation(format!("Rating must be a whole number, got '{raw}'"))
    })?;

    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(rating)
}

/// Validate a review comment: required, bounded length.
pub fn validate_comment(comment: &str) -> Result<(), CoreError> {
    if comment.trim().is_empty() {
        return Err(CoreError::Validation("Review text is required".to_string()));
    }
    if comment.len() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Review must be at most {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}
