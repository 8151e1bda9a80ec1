//! Domain logic for the Wanderlust marketplace.
//!
//! Everything here is pure: no database, no HTTP. The `db` and `api` crates
//! depend on these types and rules so the arithmetic behind bookings and
//! ratings, and the shape of listing filters, live in one place.

pub mod booking;
pub mod dates;
pub mod error;
pub mod filter;
pub mod listing;
pub mod rating;
pub mod types;
