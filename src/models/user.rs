use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a user in the system.
#[derive(Clone, Debug)]
pub struct User {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's username, unique across the system.
    pub username: String,
    /// The argon2id PHC string derived from the user's password.
    pub password_hash: String,
    /// The user's full name.
    pub full_name: Option<String>,
    /// The user's email address.
    pub email: Option<String>,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}

/// A user row about to be inserted.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// The registration payload.
///
/// Username and password rules live in `validation::auth`; garde covers the
/// optional profile fields.
#[derive(Deserialize, Validate)]
pub struct UserCandidate {
    #[garde(skip)]
    pub username: String,
    #[garde(skip)]
    pub password: String,
    #[garde(length(chars, min = 1, max = 255))]
    #[serde(default)]
    pub full_name: Option<String>,
    #[garde(email)]
    #[serde(default)]
    pub email: Option<String>,
}

impl std::fmt::Debug for UserCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCandidate")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .finish()
    }
}

/// The public view of a user. Never carries the credential hash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}
