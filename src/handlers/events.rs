use axum::{
    Extension, Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    error::Result,
    middleware_layer::auth::BearerToken,
    models::event::Event,
    services::events as event_service,
    state::AppState,
    storage::DbSession,
};

/// Creates an event for the token's owner.
///
/// The body is handed to the service unparsed so the token is checked first.
#[axum::debug_handler(state = AppState)]
pub async fn create_event(
    State(state): State<AppState>,
    DbSession(mut db): DbSession,
    Extension(token): Extension<BearerToken>,
    body: Bytes,
) -> Result<Response> {
    let event = event_service::create_event(&mut *db, &state, token.as_str(), &body).await?;
    Ok((StatusCode::CREATED, Json(event)).into_response())
}

/// Lists all events.
#[axum::debug_handler(state = AppState)]
pub async fn list_events(DbSession(mut db): DbSession) -> Result<Json<Vec<Event>>> {
    let events = event_service::list_events(&mut *db).await?;
    tracing::debug!("Listing {} events", events.len());
    Ok(Json(events))
}
