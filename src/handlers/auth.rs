use axum::{
    Extension, Form, Json,
    extract::{
        State,
        rejection::{FormRejection, JsonRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::Result,
    middleware_layer::auth::BearerToken,
    models::user::{UserCandidate, UserProfile},
    services::auth as auth_service,
    state::AppState,
    storage::DbSession,
};

/// The OAuth2 password-grant form accepted by `/login`.
///
/// Other form fields (`grant_type`, `scope`, `client_id`, ...) are ignored.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// The response payload for a successful login.
#[derive(Serialize, Debug)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub message: String,
}

/// The response payload for a successful registration.
#[derive(Serialize, Debug)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub username: String,
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub message: String,
}

/// The response payload for a logout.
#[derive(Serialize, Debug)]
pub struct LogoutResponse {
    pub message: String,
    /// Whether a live token was revoked by this call.
    pub revoked: bool,
}

const TOKEN_TYPE: &str = "bearer";

/// Handles user login.
#[axum::debug_handler(state = AppState)]
pub async fn login(
    State(state): State<AppState>,
    DbSession(mut db): DbSession,
    form: std::result::Result<Form<LoginForm>, FormRejection>,
) -> Result<Response> {
    let Form(form) = form?;
    tracing::info!("🔐 Login attempt for: {}", form.username);

    let issued = auth_service::login(&mut *db, &state, &form.username, &form.password).await?;

    let response = LoginResponse {
        access_token: issued.token,
        token_type: TOKEN_TYPE.to_string(),
        expires_at: issued.session.expires_at,
        message: "Successful login".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles user registration.
#[axum::debug_handler(state = AppState)]
pub async fn register(
    State(state): State<AppState>,
    DbSession(mut db): DbSession,
    payload: std::result::Result<Json<UserCandidate>, JsonRejection>,
) -> Result<Response> {
    let Json(candidate) = payload?;
    tracing::info!("📝 Register attempt - Payload: {:?}", candidate);

    let registration = auth_service::register(&mut *db, &state, candidate).await?;
    tracing::info!("✅ User registered: {}", registration.user.id);

    let response = RegisterResponse {
        id: registration.user.id,
        username: registration.user.username,
        access_token: registration.token.token,
        token_type: TOKEN_TYPE.to_string(),
        expires_at: registration.token.session.expires_at,
        message: "User is created".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Handles user logout.
#[axum::debug_handler(state = AppState)]
pub async fn logout(
    State(state): State<AppState>,
    Extension(token): Extension<BearerToken>,
) -> Result<Response> {
    let revoked = auth_service::logout(&state, token.as_str()).await?;

    let response = LogoutResponse {
        message: "Successful logout".to_string(),
        revoked,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Returns the profile of the token's owner.
#[axum::debug_handler(state = AppState)]
pub async fn profile(
    State(state): State<AppState>,
    DbSession(mut db): DbSession,
    Extension(token): Extension<BearerToken>,
) -> Result<Json<UserProfile>> {
    let profile = auth_service::get_profile(&mut *db, &state, token.as_str()).await?;
    Ok(Json(profile))
}
