use async_trait::async_trait;
use chrono::Utc;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use uuid::Uuid;

use super::TokenStore;
use crate::{
    crypto::token::{fingerprint, generate_token},
    error::{AppError, Result},
    models::session::{IssuedToken, Session},
};

/// Token store persisted in Redis as `session:<fingerprint>` keys with a TTL.
#[derive(Clone)]
pub struct RedisTokenStore {
    redis: ConnectionManager,
    ttl: chrono::Duration,
}

impl RedisTokenStore {
    /// Connects to Redis.
    ///
    /// # Arguments
    ///
    /// * `redis_url` - The URL of the Redis server.
    /// * `ttl` - How long issued tokens stay valid.
    pub async fn connect(redis_url: &str, ttl: chrono::Duration) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;
        Ok(Self { redis, ttl })
    }

    fn key(token: &str) -> String {
        format!("session:{}", fingerprint(token))
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn issue(&self, user_id: Uuid) -> Result<IssuedToken> {
        let token = generate_token()?;
        let session = Session::start(user_id, self.ttl);

        let session_json = sonic_rs::to_string(&session)
            .map_err(|e| AppError::Internal(format!("Session serialization failed: {}", e)))?;

        let expiration_seconds = self.ttl.num_seconds().max(1) as u64;
        let mut redis = self.redis.clone();
        let _: () = redis
            .set_ex(Self::key(&token), &session_json, expiration_seconds)
            .await
            .map_err(|e| {
                tracing::error!("❌ Redis set_ex failed: {}", e);
                AppError::Redis(e)
            })?;

        tracing::debug!("✅ Session saved to Redis for user: {}", user_id);
        Ok(IssuedToken { token, session })
    }

    async fn resolve(&self, token: &str) -> Result<Option<Session>> {
        let key = Self::key(token);
        let mut redis = self.redis.clone();

        let session_json: Option<String> = redis.get(&key).await?;
        let Some(session_json) = session_json else {
            return Ok(None);
        };

        let session: Session = match sonic_rs::from_str(&session_json) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("❌ Invalid session JSON under {}: {}", key, e);
                return Ok(None);
            }
        };

        if session.is_expired_at(Utc::now()) {
            tracing::warn!("❌ Session expired for user: {}", session.user_id);
            if let Err(e) = redis.del::<_, ()>(&key).await {
                tracing::warn!("❌ Redis del of expired session failed: {}", e);
            }
            return Ok(None);
        }

        Ok(Some(session))
    }

    async fn revoke(&self, token: &str) -> Result<bool> {
        let mut redis = self.redis.clone();
        let removed: i64 = redis.del(Self::key(token)).await?;
        Ok(removed > 0)
    }
}
