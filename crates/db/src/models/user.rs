//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use syllabee_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    /// Canonical (normalized) email. The raw address typed at signup is not
    /// retained.
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    /// The per-user progress document. Decode into
    /// [`syllabee_core::progress::ProgressMap`] via `serde_json::from_value`.
    pub progress: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user.
pub struct CreateUser {
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    /// Initial progress document (every catalog module locked).
    pub progress: serde_json::Value,
}
