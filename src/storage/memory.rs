use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{Database, StorageSession, username_taken};
use crate::{
    error::{AppError, Result},
    models::{
        event::{Event, NewEvent},
        user::{NewUser, User},
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    events: Vec<StoredEvent>,
}

struct StoredEvent {
    id: Uuid,
    owner_id: Uuid,
    text: String,
    occurred_at: chrono::DateTime<Utc>,
    created_at: chrono::DateTime<Utc>,
}

impl Tables {
    fn username_of(&self, user_id: Uuid) -> Option<&str> {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.username.as_str())
    }

    fn joined(&self, event: &StoredEvent) -> Result<Event> {
        let owner = self.username_of(event.owner_id).ok_or_else(|| {
            AppError::MissingData(format!("owner {} of event {}", event.owner_id, event.id))
        })?;
        Ok(Event {
            id: event.id,
            owner_id: event.owner_id,
            owner: owner.to_string(),
            text: event.text.clone(),
            occurred_at: event.occurred_at,
            created_at: event.created_at,
        })
    }
}

/// In-process [`Database`] used when no `DATABASE_URL` is configured, and by tests.
///
/// All tables sit behind one lock, so the username check and the insert in
/// [`StorageSession::insert_user`] happen atomically.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn session(&self) -> Result<Box<dyn StorageSession>> {
        Ok(Box::new(MemoryStorageSession {
            tables: self.tables.clone(),
        }))
    }
}

pub struct MemoryStorageSession {
    tables: Arc<Mutex<Tables>>,
}

#[async_trait]
impl StorageSession for MemoryStorageSession {
    async fn insert_user(&mut self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(username_taken());
        }

        let user = User {
            id: user.id,
            username: user.username,
            password_hash: user.password_hash,
            full_name: user.full_name,
            email: user.email,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&mut self, id: Uuid) -> Result<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert_event(&mut self, event: NewEvent) -> Result<Event> {
        let mut tables = self.tables.lock().await;
        if tables.username_of(event.owner_id).is_none() {
            return Err(AppError::Internal(format!(
                "event owner {} does not exist",
                event.owner_id
            )));
        }

        let stored = StoredEvent {
            id: event.id,
            owner_id: event.owner_id,
            text: event.text,
            occurred_at: event.occurred_at,
            created_at: Utc::now(),
        };
        let joined = tables.joined(&stored)?;
        tables.events.push(stored);
        Ok(joined)
    }

    async fn list_events(&mut self) -> Result<Vec<Event>> {
        let tables = self.tables.lock().await;
        tables.events.iter().map(|e| tables.joined(e)).collect()
    }
}
