//! Process configuration, read from environment variables.

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

use prospector_auth::HashCost;

pub const MIN_SESSION_SECRET_LEN: usize = 32;
pub const DEFAULT_SESSION_TTL_SECS: i64 = 30 * 24 * 60 * 60;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAIL_PROVIDER_BASE_URL: &str = "https://api.resend.com";
pub const DEFAULT_AI_PROVIDER_BASE_URL: &str = "https://api.openai.com";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Which store adapter backs the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// Postgres via `DATABASE_URL`. Without a URL every store call reports
    /// unavailability and reads are served synthetically.
    #[default]
    Postgres,
    /// Process-local maps; for development and tests.
    Memory,
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub session_secret: String,
    pub session_ttl: Duration,
    pub database_url: Option<String>,
    pub store_backend: StoreBackend,
    pub hash_cost: HashCost,
    pub webhook_secret: Option<String>,
    pub mail_provider_base_url: String,
    pub ai_provider_base_url: String,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("session_secret", &"<redacted>")
            .field("session_ttl", &self.session_ttl)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("store_backend", &self.store_backend)
            .field("hash_cost", &self.hash_cost)
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "<redacted>"))
            .field("mail_provider_base_url", &self.mail_provider_base_url)
            .field("ai_provider_base_url", &self.ai_provider_base_url)
            .finish()
    }
}

impl AppConfig {
    /// Defaults for everything except the session secret.
    ///
    /// Does not enforce production floors; `from_env` does.
    pub fn new(session_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            session_secret: session_secret.into(),
            session_ttl: Duration::seconds(DEFAULT_SESSION_TTL_SECS),
            database_url: None,
            store_backend: StoreBackend::Postgres,
            hash_cost: HashCost::default(),
            webhook_secret: None,
            mail_provider_base_url: DEFAULT_MAIL_PROVIDER_BASE_URL.to_string(),
            ai_provider_base_url: DEFAULT_AI_PROVIDER_BASE_URL.to_string(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let session_secret = get("SESSION_SECRET").ok_or(ConfigError::Missing("SESSION_SECRET"))?;
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(ConfigError::invalid(
                "SESSION_SECRET",
                format!("must be at least {MIN_SESSION_SECRET_LEN} bytes"),
            ));
        }

        let mut config = Self::new(session_secret);

        if let Some(addr) = get("BIND_ADDR") {
            config.bind_addr = addr
                .parse()
                .map_err(|e| ConfigError::invalid("BIND_ADDR", format!("{e}")))?;
        }

        if let Some(ttl) = get("SESSION_TTL_SECS") {
            let secs: i64 = ttl
                .parse()
                .map_err(|e| ConfigError::invalid("SESSION_TTL_SECS", format!("{e}")))?;
            if secs <= 0 {
                return Err(ConfigError::invalid("SESSION_TTL_SECS", "must be positive"));
            }
            config.session_ttl = Duration::seconds(secs);
        }

        config.database_url = get("DATABASE_URL");

        if let Some(backend) = get("STORE_BACKEND") {
            config.store_backend = match backend.to_lowercase().as_str() {
                "postgres" => StoreBackend::Postgres,
                "memory" => StoreBackend::Memory,
                other => {
                    return Err(ConfigError::invalid(
                        "STORE_BACKEND",
                        format!("expected 'postgres' or 'memory', got '{other}'"),
                    ));
                }
            };
        }

        let mut cost = HashCost::default();
        if let Some(v) = get("PASSWORD_HASH_MEMORY_KIB") {
            cost.memory_kib = v
                .parse()
                .map_err(|e| ConfigError::invalid("PASSWORD_HASH_MEMORY_KIB", format!("{e}")))?;
        }
        if let Some(v) = get("PASSWORD_HASH_ITERATIONS") {
            cost.iterations = v
                .parse()
                .map_err(|e| ConfigError::invalid("PASSWORD_HASH_ITERATIONS", format!("{e}")))?;
        }
        if !cost.meets_production_floor() {
            let floor = HashCost::PRODUCTION_FLOOR;
            return Err(ConfigError::invalid(
                "PASSWORD_HASH_MEMORY_KIB/PASSWORD_HASH_ITERATIONS",
                format!("below the minimum of {} KiB / {} iterations", floor.memory_kib, floor.iterations),
            ));
        }
        config.hash_cost = cost;

        config.webhook_secret = get("WEBHOOK_SECRET");

        if let Some(url) = get("MAIL_PROVIDER_BASE_URL") {
            config.mail_provider_base_url = url;
        }
        if let Some(url) = get("AI_PROVIDER_BASE_URL") {
            config.ai_provider_base_url = url;
        }

        Ok(config)
    }
}
