use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a stored event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// The unique identifier for the event.
    pub id: Uuid,
    /// The ID of the user who created the event.
    pub owner_id: Uuid,
    /// The username of the user who created the event.
    pub owner: String,
    /// The event's content.
    pub text: String,
    /// When the event happened, as reported by the client.
    pub occurred_at: DateTime<Utc>,
    /// The timestamp when the event was stored.
    pub created_at: DateTime<Utc>,
}

/// The payload accepted by the create-event endpoint.
///
/// The owner is never part of the payload; it comes from the bearer token.
#[derive(Debug, Deserialize, Validate)]
pub struct EventPayload {
    #[garde(length(chars, min = 1, max = 4096), custom(not_blank))]
    pub text: String,
    #[garde(skip)]
    #[serde(default)]
    pub occurred_at: Option<DateTime<Utc>>,
}

fn not_blank(value: &str, _context: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("must not be blank"));
    }
    Ok(())
}

/// An event row about to be inserted.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub text: String,
    pub occurred_at: DateTime<Utc>,
}
