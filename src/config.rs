//! Environment-driven configuration.
//!
//! Values come from the process environment (after `.env` is loaded by
//! `main`); every key has a default so a bare checkout starts up.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_JWT_SECRET: &str = "default_secret";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
    pub server_host: String,
    pub server_port: u16,
    /// Directory for the daily JSON log files.
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let jwt_expiration = get("JWT_EXPIRATION", "720h");
        let jwt_ttl = parse_duration(&jwt_expiration).map_err(|reason| ConfigError::Invalid {
            key: "JWT_EXPIRATION",
            reason,
        })?;
        if jwt_ttl.as_secs() == 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRATION",
                reason: "must be at least one second".to_string(),
            });
        }

        let server_port = get("SERVER_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid {
                key: "SERVER_PORT",
                reason: e.to_string(),
            })?;

        let db_max_connections = get("DB_MAX_CONNECTIONS", "5")
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                reason: "expected a positive integer".to_string(),
            })?;

        Ok(Self {
            database_url: get("DATABASE_URL", "sqlite://blog.db?mode=rwc"),
            db_max_connections,
            jwt_secret: get("JWT_SECRET", DEFAULT_JWT_SECRET),
            jwt_ttl,
            server_host: get("SERVER_HOST", "0.0.0.0"),
            server_port,
            log_dir: get("LOG_DIR", "logs"),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

/// Parses durations such as `720h`, `1h30m`, `90s` or `1.5h`.
///
/// Accepted units: `h`, `m`, `s`, `ms`, `us`/`µs`, `ns`. A bare `0` is
/// allowed; any other number must carry a unit.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty duration".to_string());
    }
    if trimmed == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total_secs = 0f64;
    let mut rest = trimmed;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(format!("expected a number in {input:?}"));
        }
        let value: f64 = rest[..number_len]
            .parse()
            .map_err(|_| format!("invalid number in {input:?}"))?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit_secs = match &rest[..unit_len] {
            "h" => 3600.0,
            "m" => 60.0,
            "s" => 1.0,
            "ms" => 1e-3,
            "us" | "µs" => 1e-6,
            "ns" => 1e-9,
            "" => return Err(format!("missing unit in {input:?}")),
            other => return Err(format!("unknown unit {other:?} in {input:?}")),
        };
        total_secs += value * unit_secs;
        rest = &rest[unit_len..];
    }

    Duration::try_from_secs_f64(total_secs).map_err(|e| e.to_string())
}
