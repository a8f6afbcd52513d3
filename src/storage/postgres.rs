use async_trait::async_trait;
use deadpool_postgres::{Client, Pool};
use uuid::Uuid;

use super::{Database, StorageSession};
use crate::{
    error::Result,
    models::{
        event::{Event, NewEvent},
        user::{NewUser, User},
    },
    repositories::{event as event_repo, user as user_repo},
};

/// PostgreSQL-backed [`Database`].
#[derive(Clone)]
pub struct PgDatabase {
    pool: Pool,
}

impl PgDatabase {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Database for PgDatabase {
    async fn session(&self) -> Result<Box<dyn StorageSession>> {
        let client = self.pool.get().await?;
        Ok(Box::new(PgStorageSession { client }))
    }
}

/// A pooled connection checked out for one request.
pub struct PgStorageSession {
    client: Client,
}

#[async_trait]
impl StorageSession for PgStorageSession {
    async fn insert_user(&mut self, user: NewUser) -> Result<User> {
        user_repo::create_user(&self.client, &user).await
    }

    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>> {
        user_repo::find_by_username(&self.client, username).await
    }

    async fn find_user_by_id(&mut self, id: Uuid) -> Result<Option<User>> {
        user_repo::find_by_id(&self.client, &id).await
    }

    async fn insert_event(&mut self, event: NewEvent) -> Result<Event> {
        event_repo::create_event(&self.client, &event).await
    }

    async fn list_events(&mut self) -> Result<Vec<Event>> {
        event_repo::list_events(&self.client).await
    }
}
