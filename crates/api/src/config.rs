use rankqueue_core::config::ConsensusConfig;
use rankqueue_core::types::DbId;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// User id the auto-deny job acts as. Must reference a privileged,
    /// non-trial reviewer row.
    pub system_actor_id: DbId,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `SYSTEM_ACTOR_ID`      | `1`                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let system_actor_id: DbId = std::env::var("SYSTEM_ACTOR_ID")
            .unwrap_or_else(|_| "1".into())
            .parse()
            .expect("SYSTEM_ACTOR_ID must be a valid i64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            system_actor_id,
        }
    }
}

/// Load the consensus thresholds from environment variables.
///
/// | Env Var               | Default |
/// |-----------------------|---------|
/// | `VOTES_REQUIRED`      | `3`     |
/// | `DENIALS_REQUIRED`    | `2`     |
/// | `HOLD_AUTO_DENY_DAYS` | `7`     |
///
/// # Panics
///
/// Panics when any value fails to parse or is below 1, so misconfiguration
/// stops the server at startup.
pub fn consensus_config_from_env() -> ConsensusConfig {
    let votes_required: i64 = std::env::var("VOTES_REQUIRED")
        .unwrap_or_else(|_| "3".into())
        .parse()
        .expect("VOTES_REQUIRED must be a valid i64");

    let denials_required: i64 = std::env::var("DENIALS_REQUIRED")
        .unwrap_or_else(|_| "2".into())
        .parse()
        .expect("DENIALS_REQUIRED must be a valid i64");

    let hold_auto_deny_days: i64 = std::env::var("HOLD_AUTO_DENY_DAYS")
        .unwrap_or_else(|_| "7".into())
        .parse()
        .expect("HOLD_AUTO_DENY_DAYS must be a valid i64");

    ConsensusConfig::new(votes_required, denials_required, hold_auto_deny_days)
        .expect("consensus thresholds must all be >= 1")
}
