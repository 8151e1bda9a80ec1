//! Listing entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use wanderlust_core::listing::ListingDraft;
use wanderlust_core::types::{DbId, Timestamp};

/// Full listing row from the `listings` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Listing {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub image_filename: Option<String>,
    pub price: f64,
    pub location: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub average_rating: f64,
    pub total_reviews: i32,
    pub listing_type: String,
    pub amenities: Vec<String>,
    pub purpose: String,
    pub availability_start: Option<Timestamp>,
    pub availability_end: Option<Timestamp>,
    pub available: bool,
    pub category: String,
    pub host_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Listing {
    /// Coordinates, when both halves are set.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// A stored image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub url: String,
    pub filename: String,
}

/// DTO for creating a listing.
#[derive(Debug)]
pub struct CreateListing {
    pub draft: ListingDraft,
    pub image: Option<ImageRef>,
    pub host_id: DbId,
}

/// DTO for updating a listing. `image: None` keeps the stored image.
#[derive(Debug)]
pub struct UpdateListing {
    pub draft: ListingDraft,
    pub image: Option<ImageRef>,
}
