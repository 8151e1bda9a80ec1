//! Request extractors and request rewriting shared by all handlers.

pub mod auth;
pub mod context;
pub mod method_override;
