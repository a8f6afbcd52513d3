use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod error;
mod routes;
mod state;
mod storage;
mod tokens;

mod crypto {
    pub mod password;
    pub mod token;
}

mod models {
    pub mod event;
    pub mod session;
    pub mod user;
}

mod repositories {
    pub mod event;
    pub mod user;
}

mod services {
    pub mod auth;
    pub mod events;
}

mod handlers {
    pub mod auth;
    pub mod events;
}

mod middleware_layer {
    pub mod auth;
}

mod validation {
    pub mod auth;
}

#[cfg(test)]
mod test_support;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded successfully");
    tracing::debug!("{:?}", config);

    let state = AppState::new(&config).await?;
    tracing::info!("✅ AppState initialized");

    let app = routes::create_router(state);

    tracing::info!("🚀 Server listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
