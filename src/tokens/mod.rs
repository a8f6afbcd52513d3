//! Bearer token issuance, resolution and revocation.

pub mod memory;
pub mod redis_store;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::Result,
    models::session::{IssuedToken, Session},
};

/// Where issued tokens live.
///
/// Implementations key sessions by [`crate::crypto::token::fingerprint`] and
/// check `expires_at` on every resolution.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Issues a new token bound to `user_id`.
    async fn issue(&self, user_id: Uuid) -> Result<IssuedToken>;

    /// Resolves a token to its session. `None` for unknown, revoked or expired tokens.
    async fn resolve(&self, token: &str) -> Result<Option<Session>>;

    /// Revokes a token. Returns whether a live session was removed.
    async fn revoke(&self, token: &str) -> Result<bool>;
}
