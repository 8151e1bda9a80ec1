//! Shared application router builder.
//!
//! Provides [`build_app_router`] so both the production binary (`main.rs`)
//! and integration tests (`tests/common/mod.rs`) use the exact same middleware
//! stack.

use std::time::Duration;

use axum::extract::Request;
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::Router;
use tower::util::{MapRequest, MapRequestLayer};
use tower::Layer;
use tower_cookies::CookieManagerLayer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::middleware::method_override::apply_method_override;
use crate::routes;
use crate::state::AppState;
use crate::uploads::LOCAL_URL_PREFIX;

/// The complete application service.
///
/// Method override has to run before routing, so it wraps the [`Router`]
/// instead of being one of its layers.
pub type App = MapRequest<Router, fn(Request) -> Request>;

/// Build the full application with all middleware layers.
///
/// The middleware stack is applied bottom-up:
///
/// 1. Set request ID on incoming requests
/// 2. Structured request/response tracing
/// 3. Propagate request ID to response
/// 4. Request timeout
/// 5. Panic recovery (catch panics, return 500)
/// 6. Cookie jar for the session
///
/// Everything is wrapped in the `_method` override.
pub fn build_app_router(state: AppState) -> App {
    let request_id_header = HeaderName::from_static("x-request-id");
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    // Served files keep the type their extension implies; browsers must not
    // sniff them into something executable.
    let uploads = SetResponseHeaderLayer::overriding(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    )
    .layer(ServeDir::new(&state.config.upload_dir));

    let router = Router::new()
        .merge(routes::health::router())
        .merge(routes::app_routes())
        // Locally stored listing images.
        .nest_service(LOCAL_URL_PREFIX, uploads)
        // -- Middleware stack (applied bottom-up) --
        .layer(CookieManagerLayer::new())
        // Panic recovery: catch panics and return 500.
        .layer(CatchPanicLayer::new())
        // Request timeout.
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        // Propagate request ID to response.
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        // Structured request/response tracing.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Set request ID on incoming requests.
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        // Shared state.
        .with_state(state);

    MapRequestLayer::new(apply_method_override as fn(Request) -> Request).layer(router)
}
