use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The record a bearer token resolves to.
///
/// Stores key it by the token's fingerprint; the raw token is never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The ID of the user this session belongs to.
    pub user_id: Uuid,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the session expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Starts a session for `user_id` that lasts `ttl`.
    pub fn start(user_id: Uuid, ttl: chrono::Duration) -> Self {
        let created_at = Utc::now();
        Self {
            user_id,
            created_at,
            expires_at: created_at + ttl,
        }
    }

    /// Whether the session is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// A freshly issued bearer token and the session it resolves to.
#[derive(Clone)]
pub struct IssuedToken {
    pub token: String,
    pub session: Session,
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &"<redacted>")
            .field("session", &self.session)
            .finish()
    }
}
