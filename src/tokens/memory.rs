use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::TokenStore;
use crate::{
    crypto::token::{fingerprint, generate_token},
    error::Result,
    models::session::{IssuedToken, Session},
};

/// Process-local token store. Tokens do not survive a restart.
#[derive(Clone)]
pub struct MemoryTokenStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: chrono::Duration,
}

impl MemoryTokenStore {
    pub fn new(ttl: chrono::Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn issue(&self, user_id: Uuid) -> Result<IssuedToken> {
        let token = generate_token()?;
        let session = Session::start(user_id, self.ttl);

        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        sessions.retain(|_, live| !live.is_expired_at(now));
        sessions.insert(fingerprint(&token), session.clone());

        Ok(IssuedToken { token, session })
    }

    async fn resolve(&self, token: &str) -> Result<Option<Session>> {
        let key = fingerprint(token);
        let session = match self.sessions.read().await.get(&key) {
            Some(session) => session.clone(),
            None => return Ok(None),
        };

        if session.is_expired_at(Utc::now()) {
            tracing::warn!("❌ Session expired for user: {}", session.user_id);
            self.sessions.write().await.remove(&key);
            return Ok(None);
        }

        Ok(Some(session))
    }

    async fn revoke(&self, token: &str) -> Result<bool> {
        let removed = self.sessions.write().await.remove(&fingerprint(token));
        Ok(removed.is_some_and(|session| !session.is_expired_at(Utc::now())))
    }
}
