//! HTTP routes.
//!
//! - `POST /login` - OAuth2 password form, returns a bearer token
//! - `POST /register` - creates a user and returns a bearer token
//! - `GET /logout` - revokes the presented token (bearer)
//! - `GET /profile` - the token owner's profile (bearer)
//! - `POST /events/create` - creates an event owned by the token's user (bearer)
//! - `GET /events` - every stored event

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
};
use http::{Method, header};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{handlers, middleware_layer, state::AppState};

/// Maximum request body size (1 MiB).
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Creates the application router with all routes and layers configured.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(state.config.cors_allowed_origins.clone())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(86400));

    let public_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/register", post(handlers::auth::register))
        .route("/events", get(handlers::events::list_events));

    let bearer_routes = Router::new()
        .route("/logout", get(handlers::auth::logout))
        .route("/profile", get(handlers::auth::profile))
        .route("/events/create", post(handlers::events::create_event))
        .route_layer(from_fn(middleware_layer::auth::require_bearer));

    Router::new()
        .merge(public_routes)
        .merge(bearer_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(cors)
        .with_state(state)
}
