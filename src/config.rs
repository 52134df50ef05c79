//! Process configuration, assembled once at startup and passed by injection.
//!
//! Secrets come from the environment (or a `.env` file loaded in `main`);
//! operational knobs come from the CLI. Nothing else in the codebase reads
//! the environment directly.

use std::env;

use anyhow::{Context, Result};

/// Everything the server needs to run, resolved before any component starts.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection string.
    pub database_url: String,

    /// Listen address, e.g. `0.0.0.0:5000`.
    pub bind_addr: String,

    /// HMAC secret for bearer tokens.
    pub jwt_secret: String,

    /// Bearer token lifetime in days.
    pub token_ttl_days: i64,

    /// Webhook that receives contact-form notifications. Optional;
    /// delivery failures never fail the primary request.
    pub contact_webhook_url: Option<String>,

    /// Public URL to self-ping so free-tier hosting does not idle the
    /// process out. Optional.
    pub keepalive_url: Option<String>,

    /// Self-ping interval in seconds.
    pub keepalive_interval_secs: u64,
}

impl AppConfig {
    /// Resolve configuration from the environment plus CLI-provided values.
    pub fn from_env(database_url: String, bind_addr: String) -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let token_ttl_days = match env::var("TOKEN_TTL_DAYS") {
            Ok(raw) => raw.parse().context("TOKEN_TTL_DAYS must be an integer")?,
            Err(_) => 30,
        };

        let keepalive_interval_secs = match env::var("KEEPALIVE_INTERVAL_SECS") {
            Ok(raw) => raw
                .parse()
                .context("KEEPALIVE_INTERVAL_SECS must be an integer")?,
            Err(_) => 14 * 60,
        };

        Ok(Self {
            database_url,
            bind_addr,
            jwt_secret,
            token_ttl_days,
            contact_webhook_url: env::var("CONTACT_WEBHOOK_URL").ok(),
            keepalive_url: env::var("KEEPALIVE_URL").ok(),
            keepalive_interval_secs,
        })
    }
}
