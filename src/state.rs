use std::sync::Arc;

use crate::config::Config;
use crate::db;
use crate::error::Result;
use crate::storage::{Database, memory::MemoryDatabase, postgres::PgDatabase};
use crate::tokens::{TokenStore, memory::MemoryTokenStore, redis_store::RedisTokenStore};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// Source of per-request storage sessions.
    pub db: Arc<dyn Database>,
    /// Issued bearer tokens.
    pub tokens: Arc<dyn TokenStore>,
    /// The application's configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new `AppState`, connecting the backends the configuration names.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        let db: Arc<dyn Database> = match &config.database_url {
            Some(url) => {
                let pool = db::create_pool(url, config.database_pool_size)?;
                db::bootstrap_schema(&pool).await?;
                tracing::info!("✅ PostgreSQL Pool initialized with deadpool-postgres");
                Arc::new(PgDatabase::new(pool))
            }
            None => {
                tracing::warn!("⚠️ DATABASE_URL not set, users and events are kept in memory");
                Arc::new(MemoryDatabase::new())
            }
        };

        let tokens: Arc<dyn TokenStore> = match &config.redis_url {
            Some(url) => {
                let store = RedisTokenStore::connect(url, config.session_ttl()).await?;
                tracing::info!("✅ Redis token store initialized");
                Arc::new(store)
            }
            None => {
                tracing::warn!("⚠️ REDIS_URL not set, tokens are kept in memory");
                Arc::new(MemoryTokenStore::new(config.session_ttl()))
            }
        };

        Ok(Self::with_backends(config.clone(), db, tokens))
    }

    /// Creates an `AppState` around already-built backends.
    pub fn with_backends(
        config: Config,
        db: Arc<dyn Database>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        AppState {
            db,
            tokens,
            config: Arc::new(config),
        }
    }
}
