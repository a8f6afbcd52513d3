use std::env;
use std::fmt;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use http::HeaderValue;

/// Argon2id cost parameters used when hashing new passwords.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PasswordHashing {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl PasswordHashing {
    /// Builds the Argon2 parameters, rejecting combinations Argon2 refuses.
    pub fn params(&self) -> std::result::Result<argon2::Params, argon2::Error> {
        argon2::ParamsBuilder::new()
            .m_cost(self.memory_kib)
            .t_cost(self.iterations)
            .p_cost(self.parallelism)
            .build()
    }
}

impl Default for PasswordHashing {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 3,
            parallelism: 6,
        }
    }
}

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// The URL of the PostgreSQL database. Without it users and events live in memory.
    pub database_url: Option<String>,
    /// Maximum number of pooled PostgreSQL connections.
    pub database_pool_size: usize,
    /// The URL of the Redis server. Without it tokens live in memory.
    pub redis_url: Option<String>,
    /// How long an issued token stays valid, in days.
    pub session_duration_days: i64,
    /// Argon2 parameters for new password hashes.
    pub password_hashing: PasswordHashing,
    /// Origins allowed by the CORS layer.
    pub cors_allowed_origins: Vec<HeaderValue>,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Creates a new `Config` from an arbitrary variable source.
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the value of a variable, or `None` when unset.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let session_duration_days: i64 = var("SESSION_DURATION_DAYS", "7")
            .parse()
            .context("Invalid SESSION_DURATION_DAYS")?;
        if session_duration_days <= 0 {
            anyhow::bail!("SESSION_DURATION_DAYS must be greater than zero");
        }

        let defaults = PasswordHashing::default();
        let password_hashing = PasswordHashing {
            memory_kib: var("ARGON2_MEMORY_KIB", &defaults.memory_kib.to_string())
                .parse()
                .context("Invalid ARGON2_MEMORY_KIB")?,
            iterations: var("ARGON2_ITERATIONS", &defaults.iterations.to_string())
                .parse()
                .context("Invalid ARGON2_ITERATIONS")?,
            parallelism: var("ARGON2_PARALLELISM", &defaults.parallelism.to_string())
                .parse()
                .context("Invalid ARGON2_PARALLELISM")?,
        };
        password_hashing
            .params()
            .map_err(|e| anyhow::anyhow!("Invalid Argon2 parameters {password_hashing:?}: {e}"))?;

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid origin in CORS_ALLOWED_ORIGINS: {origin}"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            bind_addr: var("BIND_ADDR", "127.0.0.1:3000")
                .parse()
                .context("Invalid BIND_ADDR")?,
            database_url: non_empty("DATABASE_URL"),
            database_pool_size: var("DATABASE_POOL_SIZE", "16")
                .parse()
                .context("Invalid DATABASE_POOL_SIZE")?,
            redis_url: non_empty("REDIS_URL"),
            session_duration_days,
            password_hashing,
            cors_allowed_origins,
        })
    }

    /// Token validity as a `chrono::Duration`.
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.session_duration_days)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |url: &Option<String>| url.as_ref().map(|_| "<redacted>");
        f.debug_struct("Config")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &redact(&self.database_url))
            .field("database_pool_size", &self.database_pool_size)
            .field("redis_url", &redact(&self.redis_url))
            .field("session_duration_days", &self.session_duration_days)
            .field("password_hashing", &self.password_hashing)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_select_in_memory_backends() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert!(config.database_url.is_none());
        assert!(config.redis_url.is_none());
        assert_eq!(config.session_duration_days, 7);
        assert_eq!(config.password_hashing, PasswordHashing::default());
        assert_eq!(config.cors_allowed_origins.len(), 1);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://app:secret@db/eventlog"),
            ("REDIS_URL", "redis://cache:6379"),
            ("SESSION_DURATION_DAYS", "1"),
            ("ARGON2_ITERATIONS", "2"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example"),
        ])
        .unwrap();

        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://app:secret@db/eventlog")
        );
        assert_eq!(config.session_ttl(), chrono::Duration::days(1));
        assert_eq!(config.password_hashing.iterations, 2);
        assert_eq!(config.cors_allowed_origins.len(), 2);
    }

    #[test]
    fn blank_urls_count_as_unset() {
        let config = config_from(&[("DATABASE_URL", "  "), ("REDIS_URL", "")]).unwrap();

        assert!(config.database_url.is_none());
        assert!(config.redis_url.is_none());
    }

    #[test]
    fn rejects_non_positive_session_duration() {
        assert!(config_from(&[("SESSION_DURATION_DAYS", "0")]).is_err());
        assert!(config_from(&[("SESSION_DURATION_DAYS", "soon")]).is_err());
    }

    #[test]
    fn rejects_argon2_parameters_argon2_cannot_use() {
        assert!(config_from(&[("ARGON2_PARALLELISM", "0")]).is_err());
        assert!(config_from(&[("ARGON2_ITERATIONS", "0")]).is_err());
        assert!(config_from(&[("ARGON2_MEMORY_KIB", "1")]).is_err());
        assert!(config_from(&[("ARGON2_PARALLELISM", "2"), ("ARGON2_MEMORY_KIB", "64")]).is_ok());
    }

    #[test]
    fn debug_output_redacts_urls() {
        let config = config_from(&[("DATABASE_URL", "postgres://app:secret@db/eventlog")]).unwrap();
        let rendered = format!("{config:?}");

        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
