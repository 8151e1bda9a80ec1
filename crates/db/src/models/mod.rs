//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - Joined read models where a view needs columns from a related table

pub mod booking;
pub mod listing;
pub mod review;
pub mod user;
