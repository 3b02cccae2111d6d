use std::str::FromStr;

use grua_core::expiry::DEFAULT_LOOKAHEAD_DAYS;

use crate::auth::jwt::JwtConfig;

/// Default pause between expiry scans: 6 hours.
const DEFAULT_SCAN_INTERVAL_SECS: u64 = 6 * 3600;

/// Longest accepted expiry lookahead: ten years.
const MAX_LOOKAHEAD_DAYS: i64 = 3650;

/// Server configuration loaded from environment variables.
///
/// | Env Var                     | Default                 |
/// |-----------------------------|-------------------------|
/// | `HOST`                      | `0.0.0.0`               |
/// | `PORT`                      | `3000`                  |
/// | `CORS_ORIGINS`              | `http://localhost:5173` |
/// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
/// | `SHUTDOWN_TIMEOUT_SECS`     | `30`                    |
/// | `EXPIRY_LOOKAHEAD_DAYS`     | `30`                    |
/// | `EXPIRY_SCAN_INTERVAL_SECS` | `21600`                 |
///
/// JWT settings are documented on [`JwtConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins (comma-separated in `CORS_ORIGINS`).
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background jobs to stop.
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub expiry: ExpiryScanConfig,
}

/// Settings for the document-expiry / overdue-remediation scan.
#[derive(Debug, Clone, Copy)]
pub struct ExpiryScanConfig {
    /// Documents expiring within this many days are flagged.
    pub lookahead_days: i64,
    pub interval_secs: u64,
}

impl Default for ExpiryScanConfig {
    fn default() -> Self {
        Self {
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            interval_secs: DEFAULT_SCAN_INTERVAL_SECS,
        }
    }
}

impl ExpiryScanConfig {
    /// # Panics
    ///
    /// Panics if the interval is zero or the lookahead is outside
    /// `0..=MAX_LOOKAHEAD_DAYS`.
    fn checked(self) -> Self {
        assert!(self.interval_secs > 0, "EXPIRY_SCAN_INTERVAL_SECS must be positive");
        assert!(
            (0..=MAX_LOOKAHEAD_DAYS).contains(&self.lookahead_days),
            "EXPIRY_LOOKAHEAD_DAYS must be between 0 and {MAX_LOOKAHEAD_DAYS}, got {}",
            self.lookahead_days
        );
        self
    }
}

impl ServerConfig {
    /// Load configuration from the environment.
    ///
    /// # Panics
    ///
    /// Panics on malformed numeric values so a bad deployment fails at
    /// startup rather than on first use.
    pub fn from_env() -> Self {
        let cors_origins = env_or("CORS_ORIGINS", "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let expiry = ExpiryScanConfig {
            lookahead_days: env_or("EXPIRY_LOOKAHEAD_DAYS", DEFAULT_LOOKAHEAD_DAYS),
            interval_secs: env_or("EXPIRY_SCAN_INTERVAL_SECS", DEFAULT_SCAN_INTERVAL_SECS),
        }
        .checked();

        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
            expiry,
        }
    }
}

/// Read `key` and parse it, falling back to `default` when unset.
///
/// # Panics
///
/// Panics if the variable is set but does not parse as `T`.
pub(crate) fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}
