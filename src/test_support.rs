//! Shared fixtures for unit and router tests.

use std::sync::Arc;

use crate::{
    config::{Config, PasswordHashing},
    state::AppState,
    storage::memory::MemoryDatabase,
    tokens::memory::MemoryTokenStore,
};

/// Argon2 parameters cheap enough to hash in every test.
pub fn cheap_hashing() -> PasswordHashing {
    PasswordHashing {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    }
}

pub fn test_config() -> Config {
    let mut config = Config::from_lookup(|_| None).expect("default config");
    config.password_hashing = cheap_hashing();
    config
}

/// State backed by fresh in-memory stores.
pub fn memory_state() -> AppState {
    let config = test_config();
    let tokens = MemoryTokenStore::new(config.session_ttl());
    AppState::with_backends(config, Arc::new(MemoryDatabase::new()), Arc::new(tokens))
}

/// State whose tokens expire as soon as they are issued.
pub fn expiring_token_state() -> AppState {
    let config = test_config();
    let tokens = MemoryTokenStore::new(chrono::Duration::zero());
    AppState::with_backends(config, Arc::new(MemoryDatabase::new()), Arc::new(tokens))
}
