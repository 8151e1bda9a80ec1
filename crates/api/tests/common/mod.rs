#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request, Response, StatusCode};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use wanderlust_api::auth::password::hash_password;
use wanderlust_api::config::ServerConfig;
use wanderlust_api::router::{build_app_router, App};
use wanderlust_api::session::SESSION_COOKIE;
use wanderlust_api::state::AppState;
use wanderlust_core::listing::ListingDraft;
use wanderlust_db::models::listing::{CreateListing, Listing};
use wanderlust_db::models::user::{CreateUser, User};
use wanderlust_db::repositories::{ListingRepo, UserRepo};

pub const TEST_PASSWORD: &str = "correct horse battery staple";

const BOUNDARY: &str = "wanderlust-test-boundary";

/// Build a test `ServerConfig` with safe defaults, storing uploads in `upload_dir`.
pub fn test_config(upload_dir: &std::path::Path) -> ServerConfig {
    let upload_dir = upload_dir.display().to_string();
    ServerConfig::from_lookup(|name| match name {
        "HOST" => Some("127.0.0.1".to_string()),
        "PORT" => Some("0".to_string()),
        "SESSION_SECRET" => Some("integration-test-secret".to_string()),
        "UPLOAD_DIR" => Some(upload_dir.clone()),
        _ => None,
    })
    .expect("test config should parse")
}

/// A browser stand-in: sends requests through the full application and
/// carries the session cookie from one response to the next request.
pub struct TestClient {
    app: App,
    session: Option<String>,
    _uploads: TempDir,
}

impl TestClient {
    pub fn new(pool: PgPool) -> Self {
        Self::with_config(pool, |_| {})
    }

    /// Build a client after adjusting the default test configuration.
    pub fn with_config(pool: PgPool, adjust: impl FnOnce(&mut ServerConfig)) -> Self {
        let uploads = TempDir::new().expect("tempdir should be created");
        let mut config = test_config(uploads.path());
        adjust(&mut config);
        let app = build_app_router(AppState::new(pool, config));
        Self {
            app,
            session: None,
            _uploads: uploads,
        }
    }

    /// Forget the session, as if the browser was closed.
    pub fn clear_session(&mut self) {
        self.session = None;
    }

    pub async fn send(&mut self, mut request: Request<Body>) -> Response<Body> {
        if let Some(cookie) = &self.session {
            request
                .headers_mut()
                .insert(COOKIE, cookie.parse().expect("cookie should be a header value"));
        }

        let response = self.app.clone().oneshot(request).await.unwrap();

        for header in response.headers().get_all(SET_COOKIE) {
            let raw = header.to_str().unwrap();
            let pair = raw.split(';').next().unwrap_or_default();
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            if name != SESSION_COOKIE {
                continue;
            }
            self.session = if value.is_empty() {
                None
            } else {
                Some(pair.to_string())
            };
        }

        response
    }

    pub async fn get(&mut self, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// POST a urlencoded form.
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> Response<Body> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(encode_form(fields)))
            .unwrap();
        self.send(request).await
    }

    /// POST a multipart form with optional file part `(field, filename, content_type, bytes)`.
    pub async fn post_multipart(
        &mut self,
        uri: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &str, &[u8])>,
    ) -> Response<Body> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(multipart_body(fields, file)))
            .unwrap();
        self.send(request).await
    }

    /// Assert `response` is a redirect, follow it, and return the rendered page.
    pub async fn follow(&mut self, response: Response<Body>) -> String {
        let location = redirect_location(&response);
        let page = self.get(&location).await;
        assert_eq!(page.status(), StatusCode::OK, "GET {location} should render");
        body_text(page).await
    }

    /// Register through the form and keep the signed-in session.
    pub async fn register(&mut self, email: &str, name: &str) {
        let response = self
            .post_form(
                "/register",
                &[("email", email), ("name", name), ("password", TEST_PASSWORD)],
            )
            .await;
        assert_eq!(redirect_location(&response), "/listings");
    }

    /// Log in through the form as an existing user.
    pub async fn login(&mut self, email: &str) {
        let response = self
            .post_form("/login", &[("email", email), ("password", TEST_PASSWORD)])
            .await;
        assert_eq!(redirect_location(&response), "/listings");
    }
}

/// The `Location` of a 303 response.
pub fn redirect_location(response: &Response<Body>) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "expected a redirect");
    response
        .headers()
        .get(LOCATION)
        .expect("redirect should carry a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Collect a response body into raw bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

/// Collect a response body into a string.
pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// `application/x-www-form-urlencoded` serialization of `fields`.
fn encode_form(fields: &[(&str, &str)]) -> String {
    reqwest::Url::parse_with_params("http://form.invalid/", fields)
        .unwrap()
        .query()
        .unwrap_or_default()
        .to_string()
}

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, filename, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Create a user directly in the database with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, email: &str, name: &str) -> User {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: name.to_string(),
            password_hash,
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Create a listing directly in the database.
pub async fn create_listing(pool: &PgPool, host: &User, title: &str, price: f64) -> Listing {
    ListingRepo::create(
        pool,
        &CreateListing {
            draft: ListingDraft {
                title: title.to_string(),
                price,
                ..Default::default()
            },
            image: None,
            host_id: host.id,
        },
    )
    .await
    .expect("listing creation should succeed")
}
