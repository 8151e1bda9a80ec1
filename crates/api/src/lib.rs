//! Wanderlust web server library.
//!
//! Exposes the building blocks (config, state, error handling, sessions,
//! routes, views) so integration tests, the server binary and the seed
//! binary can all use them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod session;
pub mod state;
pub mod uploads;
pub mod views;
