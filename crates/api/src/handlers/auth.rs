//! Handlers for registration, login and logout.

use axum::extract::State;
use axum::response::Response;
use axum::Form;
use maud::Markup;
use serde::Deserialize;
use validator::Validate;
use wanderlust_db::models::user::CreateUser;
use wanderlust_db::repositories::UserRepo;

use super::{first_validation_message, redirect_with_error, redirect_with_success};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::middleware::context::ViewContext;
use crate::session::Session;
use crate::state::AppState;
use crate::views;

/// Missing fields deserialize as empty so validation, not the extractor,
/// reports them.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// GET /register
pub async fn register_form(ctx: ViewContext) -> Markup {
    views::auth::register(&ctx)
}

/// POST /register
///
/// Creates the account and signs it in. A taken email redirects back to the
/// form without creating anything.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(mut input): Form<RegisterForm>,
) -> AppResult<Response> {
    input.email = input.email.trim().to_string();
    input.name = input.name.trim().to_string();

    if let Err(errors) = input.validate() {
        return Ok(redirect_with_error(
            &session,
            "/register",
            first_validation_message(&errors),
        ));
    }

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Ok(redirect_with_error(&session, "/register", "Email already registered"));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let created = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            name: input.name,
            password_hash,
        },
    )
    .await;

    let user = match created {
        Ok(user) => user,
        // Lost a race with a concurrent registration for the same address.
        Err(ref e) if is_unique_violation(e, "uq_users_email") => {
            return Ok(redirect_with_error(&session, "/register", "Email already registered"));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, "User registered");
    session.login(user.id);
    Ok(redirect_with_success(&session, "/listings", "Welcome!"))
}

/// GET /login
pub async fn login_form(ctx: ViewContext) -> Markup {
    views::auth::login(&ctx)
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<LoginForm>,
) -> AppResult<Response> {
    let Some(user) = UserRepo::find_by_email(&state.pool, input.email.trim()).await? else {
        return Ok(redirect_with_error(&session, "/login", "Incorrect email"));
    };

    let valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Stored password hash unreadable: {e}")))?;
    if !valid {
        tracing::debug!(user_id = user.id, "Login rejected: wrong password");
        return Ok(redirect_with_error(&session, "/login", "Incorrect password"));
    }

    tracing::info!(user_id = user.id, "User logged in");
    session.login(user.id);
    Ok(redirect_with_success(&session, "/listings", "Welcome back!"))
}

/// GET /logout
pub async fn logout(session: Session) -> Response {
    session.logout();
    redirect_with_success(&session, "/listings", "Logged out")
}
