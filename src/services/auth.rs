use garde::Validate;
use uuid::Uuid;

use crate::crypto::password::{hash_password, verify_password};
use crate::error::{AppError, Result};
use crate::models::session::IssuedToken;
use crate::models::user::{NewUser, User, UserCandidate, UserProfile};
use crate::state::AppState;
use crate::storage::StorageSession;
use crate::tokens::TokenStore;
use crate::validation::auth::{validate_password, validate_username};

const INVALID_CREDENTIALS: &str = "Incorrect username or password";
const INVALID_TOKEN: &str = "Invalid or expired token";

/// A successful registration: the new user and the token issued for it.
#[derive(Debug)]
pub struct Registration {
    pub user: UserProfile,
    pub token: IssuedToken,
}

/// Registers a new user and logs them in.
///
/// # Arguments
///
/// * `db` - The request's storage session.
/// * `state` - The application state.
/// * `candidate` - The registration payload.
///
/// # Returns
///
/// A `Result` containing the `Registration`. Fails with `AppError::Validation`
/// on malformed input and `AppError::Conflict` when the username is taken.
pub async fn register(
    db: &mut dyn StorageSession,
    state: &AppState,
    candidate: UserCandidate,
) -> Result<Registration> {
    validate_username(&candidate.username)?;
    validate_password(&candidate.password)?;
    candidate.validate()?;

    tracing::debug!("🔐 Creating user: {}", candidate.username);
    let password_hash = hash_password(&candidate.password, &state.config.password_hashing)?;

    let user = db
        .insert_user(NewUser {
            id: Uuid::new_v4(),
            username: candidate.username,
            password_hash,
            full_name: candidate.full_name,
            email: candidate.email,
        })
        .await?;
    tracing::info!("✅ User created with ID: {}", user.id);

    let token = state.tokens.issue(user.id).await?;

    Ok(Registration {
        user: UserProfile::from(&user),
        token,
    })
}

/// Authenticates a user and issues a new token.
///
/// Unknown usernames and wrong passwords fail the same way.
pub async fn login(
    db: &mut dyn StorageSession,
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<IssuedToken> {
    tracing::debug!("🔐 Authenticating user: {}", username);

    let user = db
        .find_user_by_username(username)
        .await?
        .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
    }

    let token = state.tokens.issue(user.id).await?;
    tracing::info!("✅ User logged in: {}", user.id);
    Ok(token)
}

/// Revokes a token.
///
/// Revoking an unknown, expired or already revoked token is not an error;
/// the returned flag says whether a live session was removed.
pub async fn logout(state: &AppState, token: &str) -> Result<bool> {
    let revoked = state.tokens.revoke(token).await?;
    if revoked {
        tracing::info!("👋 Token revoked");
    } else {
        tracing::debug!("Logout for a token that was not live");
    }
    Ok(revoked)
}

/// Resolves a token to the profile of the user that owns it.
pub async fn get_profile(
    db: &mut dyn StorageSession,
    state: &AppState,
    token: &str,
) -> Result<UserProfile> {
    let user = resolve_user(db, state.tokens.as_ref(), token).await?;
    Ok(UserProfile::from(&user))
}

/// Resolves a token to its user.
///
/// A token whose user no longer exists is treated as invalid.
pub async fn resolve_user(
    db: &mut dyn StorageSession,
    tokens: &dyn TokenStore,
    token: &str,
) -> Result<User> {
    let session = tokens
        .resolve(token)
        .await?
        .ok_or_else(|| AppError::Authentication(INVALID_TOKEN.to_string()))?;

    db.find_user_by_id(session.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("❌ Token resolved to missing user: {}", session.user_id);
            AppError::Authentication(INVALID_TOKEN.to_string())
        })
}
