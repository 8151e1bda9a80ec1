//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use wanderlust_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- never render this into a view.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new user. The password is already hashed.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

/// The identity a session resolves to, safe to hand to views.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SessionUser {
    pub id: DbId,
    pub email: String,
    pub name: String,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}
