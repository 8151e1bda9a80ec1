use std::sync::Arc;

use tower_cookies::Key;

use crate::config::ServerConfig;
use crate::session::session_key;
use crate::uploads::{self, ImageStore};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: wanderlust_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Signing key for the session cookie.
    pub session_key: Key,
    /// Where uploaded listing images go.
    pub images: Arc<dyn ImageStore>,
}

impl AppState {
    /// Assemble state from a pool and configuration, choosing the image store
    /// the configuration asks for.
    pub fn new(pool: wanderlust_db::DbPool, config: ServerConfig) -> Self {
        let session_key = session_key(&config.session_secret);
        let images = uploads::store_from_config(&config);
        Self {
            pool,
            config: Arc::new(config),
            session_key,
            images,
        }
    }
}
