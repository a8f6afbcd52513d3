//! Persistence seam for users and events.
//!
//! A [`Database`] hands out one [`StorageSession`] per request. The session
//! owns whatever the backend needs for the duration of the request (a pooled
//! PostgreSQL connection, or a handle to the in-memory tables) and gives it
//! back when dropped.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{
        event::{Event, NewEvent},
        user::{NewUser, User},
    },
    state::AppState,
};

/// A source of per-request storage sessions.
#[async_trait]
pub trait Database: Send + Sync {
    /// Acquires a storage session.
    async fn session(&self) -> Result<Box<dyn StorageSession>>;
}

/// The operations a request may perform against the User and Event stores.
///
/// Each call is one atomic unit of work.
#[async_trait]
pub trait StorageSession: Send {
    /// Inserts a user. Fails with [`AppError::Conflict`] when the username is taken.
    async fn insert_user(&mut self, user: NewUser) -> Result<User>;

    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>>;

    async fn find_user_by_id(&mut self, id: Uuid) -> Result<Option<User>>;

    /// Inserts an event and returns it with its owner's username.
    async fn insert_event(&mut self, event: NewEvent) -> Result<Event>;

    /// All events, oldest first.
    async fn list_events(&mut self) -> Result<Vec<Event>>;
}

/// Extractor that acquires a storage session for the current request.
///
/// The session is released when the handler returns and the extractor drops.
pub struct DbSession(pub Box<dyn StorageSession>);

impl FromRequestParts<AppState> for DbSession {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let session = state.db.session().await?;
        Ok(DbSession(session))
    }
}

pub(crate) fn username_taken() -> AppError {
    AppError::Conflict("Username already registered".to_string())
}
