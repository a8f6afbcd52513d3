use chrono::Utc;
use garde::Validate;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::event::{Event, EventPayload, NewEvent},
    services::auth::resolve_user,
    state::AppState,
    storage::StorageSession,
};

/// Creates an event owned by the user the token resolves to.
///
/// The token is checked before the payload is even parsed, so an invalid
/// token always yields `AppError::Authentication`.
///
/// # Arguments
///
/// * `db` - The request's storage session.
/// * `state` - The application state.
/// * `token` - The bearer token of the caller.
/// * `payload` - The raw JSON request body.
///
/// # Returns
///
/// A `Result` containing the stored `Event`.
pub async fn create_event(
    db: &mut dyn StorageSession,
    state: &AppState,
    token: &str,
    payload: &[u8],
) -> Result<Event> {
    let owner = resolve_user(db, state.tokens.as_ref(), token).await?;

    let payload: EventPayload = sonic_rs::from_slice(payload)
        .map_err(|e| AppError::Validation(format!("Invalid event payload: {}", e)))?;
    payload.validate()?;

    let event = db
        .insert_event(NewEvent {
            id: Uuid::new_v4(),
            owner_id: owner.id,
            text: payload.text,
            occurred_at: payload.occurred_at.unwrap_or_else(Utc::now),
        })
        .await?;

    tracing::info!("✅ Event {} created by user: {}", event.id, owner.id);
    Ok(event)
}

/// Lists every stored event, oldest first. Not filtered by owner.
pub async fn list_events(db: &mut dyn StorageSession) -> Result<Vec<Event>> {
    db.list_events().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserCandidate;
    use crate::services::auth;
    use crate::test_support::memory_state;

    async fn registered_token(
        db: &mut dyn StorageSession,
        state: &AppState,
        username: &str,
    ) -> String {
        let candidate = UserCandidate {
            username: username.to_string(),
            password: "pw1".to_string(),
            full_name: None,
            email: None,
        };
        auth::register(db, state, candidate).await.unwrap().token.token
    }

    #[tokio::test]
    async fn event_is_owned_by_the_token_user_and_listed() {
        let state = memory_state();
        let mut db = state.db.session().await.unwrap();
        let token = registered_token(db.as_mut(), &state, "alice").await;

        let event = create_event(db.as_mut(), &state, &token, br#"{"text":"hello"}"#)
            .await
            .unwrap();

        assert_eq!(event.owner, "alice");
        assert_eq!(event.text, "hello");
        assert_eq!(list_events(db.as_mut()).await.unwrap(), vec![event]);
    }

    #[tokio::test]
    async fn client_supplied_occurred_at_is_kept() {
        let state = memory_state();
        let mut db = state.db.session().await.unwrap();
        let token = registered_token(db.as_mut(), &state, "alice").await;

        let event = create_event(
            db.as_mut(),
            &state,
            &token,
            br#"{"text":"launch","occurred_at":"2024-05-01T12:00:00Z"}"#,
        )
        .await
        .unwrap();

        assert_eq!(event.occurred_at.to_rfc3339(), "2024-05-01T12:00:00+00:00");
    }

    #[tokio::test]
    async fn invalid_token_fails_before_payload_and_stores_nothing() {
        let state = memory_state();
        let mut db = state.db.session().await.unwrap();

        let valid_body = create_event(db.as_mut(), &state, "bogus", br#"{"text":"hello"}"#).await;
        let broken_body = create_event(db.as_mut(), &state, "bogus", b"{not json").await;

        assert!(matches!(valid_body, Err(AppError::Authentication(_))));
        assert!(matches!(broken_body, Err(AppError::Authentication(_))));
        assert!(list_events(db.as_mut()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_payload_is_a_validation_error() {
        let state = memory_state();
        let mut db = state.db.session().await.unwrap();
        let token = registered_token(db.as_mut(), &state, "alice").await;
        let too_long = format!(r#"{{"text":"{}"}}"#, "x".repeat(4097));

        let bodies: [&[u8]; 5] = [
            b"{not json",
            br#"{"content":"hello"}"#,
            br#"{"text":""}"#,
            br#"{"text":"   "}"#,
            too_long.as_bytes(),
        ];

        for body in bodies {
            let result = create_event(db.as_mut(), &state, &token, body).await;
            assert!(matches!(result, Err(AppError::Validation(_))), "accepted {body:?}");
        }
        assert!(list_events(db.as_mut()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_is_global_across_owners() {
        let state = memory_state();
        let mut db = state.db.session().await.unwrap();
        let alice = registered_token(db.as_mut(), &state, "alice").await;
        let bob = registered_token(db.as_mut(), &state, "bob").await;

        create_event(db.as_mut(), &state, &alice, br#"{"text":"one"}"#).await.unwrap();
        create_event(db.as_mut(), &state, &bob, br#"{"text":"two"}"#).await.unwrap();

        let owners: Vec<_> = list_events(db.as_mut())
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.owner)
            .collect();
        assert_eq!(owners, ["alice", "bob"]);
    }
}
