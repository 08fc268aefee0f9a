// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! All configuration comes from the environment and is loaded once at
//! startup. The gateway refuses to start without its signing secret; there
//! is no baked-in fallback key.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Gateway bind address | `0.0.0.0` |
//! | `PORT` | Gateway bind port | `5000` |
//! | `GATEWAY_SECRET` | HS256 signing secret for tokens | Required |
//! | `TOKEN_TTL_SECS` | Token validity in seconds, at most ten years | `3600` |
//! | `COOKIE_PATH` | `Path` attribute of the token cookie | `/` |
//! | `GATEWAY_USERS` | Comma-separated `user:password` pairs | `admin:admin` |
//! | `VERIFIER_TIMEOUT_SECS` | Upper bound on one credential check | `5` |
//! | `LOG_FORMAT` | `json` for NDJSON logs, anything else for human-readable | unset |
//! | `RUST_LOG` | Log level filter | `info` |
//!
//! The `db-loader` binary reads its own set:
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATABASE_URL` | Postgres connection URL | `postgres://appuser:apppass@db:5432/appdb` |
//! | `METRICS_PORT` | Port for the `/metrics` endpoint | `8000` |
//! | `LOAD_INTERVAL_SECS` | Pause between load cycles | `2` |
//! | `RETRY_BACKOFF_SECS` | Delay between reconnect attempts | `3` |

use std::fmt;
use std::time::Duration as StdDuration;

use chrono::Duration;

/// Environment variable name for the gateway bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the gateway bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the token signing secret.
pub const SECRET_ENV: &str = "GATEWAY_SECRET";

/// Environment variable name for token validity in seconds.
pub const TOKEN_TTL_ENV: &str = "TOKEN_TTL_SECS";

/// Longest accepted token validity, ten years in seconds.
pub const MAX_TOKEN_TTL_SECS: i64 = 315_360_000;

/// Environment variable name for the cookie `Path` attribute.
pub const COOKIE_PATH_ENV: &str = "COOKIE_PATH";

/// Environment variable name for the static credential table.
pub const USERS_ENV: &str = "GATEWAY_USERS";

/// Environment variable name for the credential check time bound.
pub const VERIFIER_TIMEOUT_ENV: &str = "VERIFIER_TIMEOUT_SECS";

/// Environment variable name selecting `json` log output.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Environment variable name for the loader's Postgres URL.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Environment variable name for the loader's metrics port.
pub const METRICS_PORT_ENV: &str = "METRICS_PORT";

/// Environment variable name for the loader cycle pause.
pub const LOAD_INTERVAL_ENV: &str = "LOAD_INTERVAL_SECS";

/// Environment variable name for the loader reconnect backoff.
pub const RETRY_BACKOFF_ENV: &str = "RETRY_BACKOFF_SECS";

/// Configuration faults that abort startup before the listener binds.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("gateway secret is not configured: set {SECRET_ENV}")]
    MissingSecret,

    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("malformed entry in {USERS_ENV}: {0:?} (expected user:password)")]
    MalformedUserEntry(String),
}

/// Gateway configuration, resolved once in `main`.
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub secret: String,
    pub token_ttl: Duration,
    pub cookie_path: String,
    pub users: Vec<(String, String)>,
    pub verifier_timeout: StdDuration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default(HOST_ENV, "0.0.0.0");
        let port = parse_env(PORT_ENV, 5000u16)?;
        let secret = env_optional(SECRET_ENV).ok_or(ConfigError::MissingSecret)?;
        let ttl_secs = parse_env(TOKEN_TTL_ENV, 3600i64)?;
        // Bounded above so duration and expiry arithmetic stay inside
        // chrono's representable range.
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&ttl_secs) {
            return Err(ConfigError::InvalidValue {
                name: TOKEN_TTL_ENV,
                value: ttl_secs.to_string(),
            });
        }
        let cookie_path = env_or_default(COOKIE_PATH_ENV, "/");
        let users = parse_user_table(&env_or_default(USERS_ENV, "admin:admin"))?;
        let verifier_timeout = StdDuration::from_secs(parse_env(VERIFIER_TIMEOUT_ENV, 5u64)?);

        Ok(Self {
            host,
            port,
            secret,
            token_ttl: Duration::seconds(ttl_secs),
            cookie_path,
            users,
            verifier_timeout,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secret and passwords stay out of logs.
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("cookie_path", &self.cookie_path)
            .field("users", &self.users.len())
            .field("verifier_timeout", &self.verifier_timeout)
            .finish()
    }
}

/// Load generator configuration, resolved once in the `db-loader` binary.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub database_url: String,
    pub metrics_port: u16,
    pub cycle_interval: StdDuration,
    pub retry_backoff: StdDuration,
}

impl LoaderConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env_or_default(DATABASE_URL_ENV, "postgres://appuser:apppass@db:5432/appdb");
        let metrics_port = parse_env(METRICS_PORT_ENV, 8000u16)?;
        let cycle_interval = StdDuration::from_secs(parse_env(LOAD_INTERVAL_ENV, 2u64)?);
        let retry_backoff = StdDuration::from_secs(parse_env(RETRY_BACKOFF_ENV, 3u64)?);

        Ok(Self {
            database_url,
            metrics_port,
            cycle_interval,
            retry_backoff,
        })
    }
}

/// Parse `raw` as comma-separated `user:password` pairs.
fn parse_user_table(raw: &str) -> Result<Vec<(String, String)>, ConfigError> {
    let mut users = Vec::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (user, password) = entry
            .split_once(':')
            .ok_or_else(|| ConfigError::MalformedUserEntry(entry.to_string()))?;
        if user.is_empty() || password.is_empty() {
            return Err(ConfigError::MalformedUserEntry(entry.to_string()));
        }
        users.push((user.to_string(), password.to_string()));
    }
    if users.is_empty() {
        return Err(ConfigError::MalformedUserEntry(raw.to_string()));
    }
    Ok(users)
}

fn env_optional(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) => {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}

fn parse_env<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env_optional(name) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            name,
            value: raw.clone(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_table_parses_single_and_multiple_pairs() {
        assert_eq!(
            parse_user_table("admin:admin").unwrap(),
            vec![("admin".to_string(), "admin".to_string())]
        );
        assert_eq!(
            parse_user_table("admin:admin, ops:hunter2").unwrap(),
            vec![
                ("admin".to_string(), "admin".to_string()),
                ("ops".to_string(), "hunter2".to_string())
            ]
        );
    }

    #[test]
    fn user_table_keeps_colons_inside_passwords() {
        assert_eq!(
            parse_user_table("admin:a:b:c").unwrap(),
            vec![("admin".to_string(), "a:b:c".to_string())]
        );
    }

    #[test]
    fn user_table_rejects_entries_without_a_colon() {
        assert!(matches!(
            parse_user_table("admin"),
            Err(ConfigError::MalformedUserEntry(_))
        ));
        assert!(matches!(
            parse_user_table(":nopass"),
            Err(ConfigError::MalformedUserEntry(_))
        ));
        assert!(matches!(
            parse_user_table(""),
            Err(ConfigError::MalformedUserEntry(_))
        ));
    }

    #[test]
    fn from_env_requires_a_secret_and_bounds_the_ttl() {
        // One test walks every from_env scenario so the process environment
        // is never mutated by two tests at once.
        for name in [
            HOST_ENV,
            PORT_ENV,
            TOKEN_TTL_ENV,
            COOKIE_PATH_ENV,
            USERS_ENV,
            VERIFIER_TIMEOUT_ENV,
        ] {
            std::env::remove_var(name);
        }

        std::env::remove_var(SECRET_ENV);
        assert!(matches!(Config::from_env(), Err(ConfigError::MissingSecret)));

        std::env::set_var(SECRET_ENV, "from-env-secret");
        let config = Config::from_env().unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.secret, "from-env-secret");
        assert_eq!(config.token_ttl, Duration::seconds(3600));
        assert_eq!(config.cookie_path, "/");
        assert_eq!(
            config.users,
            vec![("admin".to_string(), "admin".to_string())]
        );
        assert_eq!(config.verifier_timeout, StdDuration::from_secs(5));

        // Zero, negative, unparsable, and beyond-the-cap values all refuse
        // startup instead of panicking later in duration arithmetic.
        for bad in ["0", "-60", "ninety", "9999999999999999"] {
            std::env::set_var(TOKEN_TTL_ENV, bad);
            assert!(
                matches!(
                    Config::from_env(),
                    Err(ConfigError::InvalidValue { name, .. }) if name == TOKEN_TTL_ENV
                ),
                "TTL {bad:?} must be rejected"
            );
        }

        std::env::remove_var(TOKEN_TTL_ENV);
        std::env::remove_var(SECRET_ENV);
    }

    #[test]
    fn config_debug_redacts_the_secret() {
        let config = Config {
            host: "0.0.0.0".to_string(),
            port: 5000,
            secret: "supersecretkey".to_string(),
            token_ttl: Duration::hours(1),
            cookie_path: "/".to_string(),
            users: vec![("admin".to_string(), "admin".to_string())],
            verifier_timeout: StdDuration::from_secs(5),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("supersecretkey"));
        assert!(!rendered.contains("admin"));
        assert!(rendered.contains("<redacted>"));
    }
}
