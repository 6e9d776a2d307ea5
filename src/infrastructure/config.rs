//! Startup configuration read from the environment.

use crate::data::bootstrap::SeedPolicy;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("Invalid DATABASE_URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SslMode {
    #[default]
    Disable,
    Prefer,
    Require,
}

impl SslMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
        }
    }
}

impl From<SslMode> for PgSslMode {
    fn from(mode: SslMode) -> Self {
        match mode {
            SslMode::Disable => PgSslMode::Disable,
            SslMode::Prefer => PgSslMode::Prefer,
            SslMode::Require => PgSslMode::Require,
        }
    }
}

impl fmt::Display for SslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SslMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disable" => Ok(SslMode::Disable),
            "prefer" => Ok(SslMode::Prefer),
            "require" => Ok(SslMode::Require),
            _ => Err(()),
        }
    }
}

/// Connection settings for the account database.
///
/// The defaults point at a local development Postgres with the stock
/// `postgres`/`postgres` credentials and TLS off. Not for production use.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Takes precedence over the individual fields when set.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub ssl_mode: SslMode,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            username: "postgres".to_string(),
            password: "postgres".to_string(),
            database: "postgres".to_string(),
            ssl_mode: SslMode::Disable,
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

// Credentials stay out of logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("ssl_mode", &self.ssl_mode)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

impl DatabaseConfig {
    /// Reads `DATABASE_URL`, or `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`,
    /// `DB_NAME`, `DB_SSLMODE`; plus `DB_MAX_CONNECTIONS`. Unset keys keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("DATABASE_URL") {
            PgConnectOptions::from_str(&url).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;
            config.url = Some(url);
        }
        if let Some(host) = lookup("DB_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("DB_PORT") {
            config.port = parse("DB_PORT", port)?;
        }
        if let Some(username) = lookup("DB_USER") {
            config.username = username;
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            config.password = password;
        }
        if let Some(database) = lookup("DB_NAME") {
            config.database = database;
        }
        if let Some(mode) = lookup("DB_SSLMODE") {
            config.ssl_mode = mode.parse().map_err(|_| ConfigError::InvalidValue {
                key: "DB_SSLMODE",
                value: mode,
            })?;
        }
        if let Some(max) = lookup("DB_MAX_CONNECTIONS") {
            config.max_connections = parse("DB_MAX_CONNECTIONS", max)?;
        }

        Ok(config)
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match &self.url {
            Some(url) => PgConnectOptions::from_str(url),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.username)
                .password(&self.password)
                .database(&self.database)
                .ssl_mode(self.ssl_mode.into())),
        }
    }
}

/// Everything the bootstrap binary needs at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub seed_policy: SeedPolicy,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            seed_policy: SeedPolicy::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            database: DatabaseConfig::from_lookup(&lookup)?,
            ..Self::default()
        };

        if let Some(policy) = lookup("SEED_POLICY") {
            config.seed_policy = policy.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SEED_POLICY",
                value: policy,
            })?;
        }
        if let Some(filter) = lookup("LOG_LEVEL") {
            config.log_filter = filter;
        }

        Ok(config)
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    let parsed = value.trim().parse();
    parsed.map_err(|_| ConfigError::InvalidValue { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = DatabaseConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.username, "postgres");
        assert_eq!(config.password, "postgres");
        assert_eq!(config.database, "postgres");
        assert_eq!(config.ssl_mode, SslMode::Disable);
        assert!(config.url.is_none());
    }

    #[test]
    fn test_empty_environment_keeps_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.seed_policy, SeedPolicy::Strict);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_components_from_environment() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("DB_USER", "bank"),
            ("DB_PASSWORD", "hunter2"),
            ("DB_NAME", "accounts"),
            ("DB_SSLMODE", "Require"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("SEED_POLICY", "skip-existing"),
            ("LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.username, "bank");
        assert_eq!(config.database.password, "hunter2");
        assert_eq!(config.database.database, "accounts");
        assert_eq!(config.database.ssl_mode, SslMode::Require);
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.seed_policy, SeedPolicy::SkipExisting);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = DatabaseConfig::from_lookup(lookup_from(&[("DB_PORT", "five")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "DB_PORT",
                value: "five".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_ssl_mode_is_rejected() {
        let err = DatabaseConfig::from_lookup(lookup_from(&[("DB_SSLMODE", "sometimes")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "DB_SSLMODE", .. }));
    }

    #[test]
    fn test_invalid_seed_policy_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("SEED_POLICY", "upsert")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "SEED_POLICY", .. }));
    }

    #[test]
    fn test_database_url_is_validated() {
        let err = DatabaseConfig::from_lookup(lookup_from(&[("DATABASE_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(_)));
    }

    #[test]
    fn test_database_url_takes_precedence() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://app:pw@db.example.com:5433/ledger"),
            ("DB_HOST", "ignored"),
        ]))
        .unwrap();

        let options = config.connect_options().unwrap();
        assert_eq!(options.get_host(), "db.example.com");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_database(), Some("ledger"));
    }

    #[test]
    fn test_connect_options_from_components() {
        let options = DatabaseConfig::default().connect_options().unwrap();
        assert_eq!(options.get_host(), "localhost");
        assert_eq!(options.get_port(), 5432);
        assert_eq!(options.get_username(), "postgres");
        assert_eq!(options.get_database(), Some("postgres"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", DatabaseConfig::default());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("password: \"postgres\""));
    }
}
