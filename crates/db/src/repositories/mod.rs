//! Repository layer: one zero-sized struct per table.
//!
//! Methods take `&PgPool` (or a transaction connection where a caller must
//! compose several statements) and return `sqlx::Error` untouched; mapping
//! to HTTP status codes happens in the API crate.

pub mod booking_repo;
pub mod listing_repo;
pub mod review_repo;
pub mod user_repo;

pub use booking_repo::BookingRepo;
pub use listing_repo::ListingRepo;
pub use review_repo::ReviewRepo;
pub use user_repo::UserRepo;
