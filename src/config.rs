// src/config.rs

//! Application configuration loaded from environment variables.
//!
//! Every value is read once at startup and handed to the components that
//! need it. Missing required values fail startup instead of surfacing later
//! as request errors.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================
// Local macros (config-only, intentionally explicit)
// ============================================================

/// Reads a required environment variable.
///
/// Fails fast with `Missing required configuration: <KEY>` when the
/// variable is absent.
macro_rules! required_env {
    // ---
    ($key:literal) => {
        std::env::var($key)
            .map_err(|_| anyhow::anyhow!(concat!("Missing required configuration: ", $key)))?
    };
}

/// Reads an optional environment variable and attempts to parse it,
/// falling back to the default when missing or unparsable.
macro_rules! optional_env_parse {
    // ---
    ($key:literal, $ty:ty, $default:expr) => {
        std::env::var($key)
            .ok()
            .and_then(|v| v.parse::<$ty>().ok())
            .unwrap_or($default)
    };
}

#[cfg(test)]
/// Asserts that a configuration constructor fails due to a missing
/// required environment variable.
macro_rules! assert_missing_config {
    // ---
    ($expr:expr, $key:literal) => {{
        let err = $expr.expect_err("expected configuration error");
        assert!(
            err.to_string()
                .contains(concat!("Missing required configuration: ", $key)),
            "unexpected error: {err}"
        );
    }};
}

/// Seeds the process environment from an env file.
///
/// With no path, `.env` in the working directory (or a parent) is used.
/// Returns the file that was read, or `None` when there is no such file;
/// real deployments set variables directly. Variables already present in
/// the environment win over the file.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, dotenvy::Error> {
    // ---
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|_| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };

    match loaded {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

// ============================================================
// Public configuration facade
// ============================================================

/// Aggregated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Loads and validates all application configuration from the environment.
    ///
    /// # Errors
    /// Returns an error if any required configuration is missing or invalid.
    pub fn from_env() -> Result<Self> {
        // ---
        Ok(Self {
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            server: ServerConfig::from_env(),
        })
    }
}

// ============================================================
// Database configuration
// ============================================================

mod database {
    // ---
    use super::*;

    /// The only driver the data-access layer speaks.
    pub const SUPPORTED_DRIVER: &str = "postgres";

    /// Relational store settings.
    #[derive(Debug, Clone)]
    pub struct DatabaseConfig {
        /// Database driver name. Only `postgres` is accepted.
        pub driver: String,

        /// PostgreSQL connection string.
        pub database_url: String,

        /// Connection attempts made at startup before giving up. Defaults to 50.
        pub retry_count: u32,

        /// Maximum time to wait when acquiring a connection from the pool. Defaults to 30 seconds.
        pub acquire_timeout: Duration,

        /// Minimum number of connections kept open, even when idle. Defaults to 2.
        pub min_connections: u32,

        /// Maximum number of connections open concurrently. Defaults to 15.
        pub max_connections: u32,
    }

    impl DatabaseConfig {
        /// Builds a [`DatabaseConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if `DATABASE_URL` is missing or the driver is not supported.
        pub fn from_env() -> Result<Self> {
            // ---
            let driver =
                std::env::var("KASHO_DB_DRIVER").unwrap_or_else(|_| SUPPORTED_DRIVER.to_string());
            if driver != SUPPORTED_DRIVER {
                anyhow::bail!("Unsupported database driver: {driver}");
            }

            let database_url = required_env!("DATABASE_URL");
            let retry_count = optional_env_parse!("KASHO_DB_RETRY_COUNT", u32, 50);
            let acquire_timeout_secs = optional_env_parse!("KASHO_DB_ACQUIRE_TIMEOUT_SEC", u64, 30);
            let min_connections = optional_env_parse!("KASHO_DB_MIN_CONNECTIONS", u32, 2);
            let max_connections = optional_env_parse!("KASHO_DB_MAX_CONNECTIONS", u32, 15);

            Ok(Self {
                driver,
                database_url,
                retry_count,
                acquire_timeout: Duration::from_secs(acquire_timeout_secs),
                min_connections,
                max_connections,
            })
        }
    }
}
pub use database::DatabaseConfig;

// ============================================================
// Auth configuration
// ============================================================

mod auth {
    // ---
    use super::*;

    /// Default token lifetime: 30 minutes.
    pub const DEFAULT_TOKEN_TTL_SECS: u64 = 1800;

    /// Credential hashing and token signing settings.
    #[derive(Clone)]
    pub struct AuthConfig {
        /// Shared HMAC secret used to sign and verify tokens.
        pub signing_key: String,

        /// Lifetime of an issued token.
        pub token_ttl: Duration,

        /// bcrypt cost factor, clamped to bcrypt's supported range.
        pub bcrypt_cost: u32,
    }

    // The signing key must never end up in logs.
    impl std::fmt::Debug for AuthConfig {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            // ---
            f.debug_struct("AuthConfig")
                .field("signing_key", &"<redacted>")
                .field("token_ttl", &self.token_ttl)
                .field("bcrypt_cost", &self.bcrypt_cost)
                .finish()
        }
    }

    impl AuthConfig {
        /// Builds an [`AuthConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if `KASHO_SIGNING_KEY` is missing or empty.
        pub fn from_env() -> Result<Self> {
            // ---
            let signing_key = required_env!("KASHO_SIGNING_KEY");
            if signing_key.is_empty() {
                anyhow::bail!("KASHO_SIGNING_KEY must not be empty");
            }

            let ttl_secs = optional_env_parse!("KASHO_TOKEN_TTL_SEC", u64, DEFAULT_TOKEN_TTL_SECS);
            let cost = optional_env_parse!("KASHO_BCRYPT_COST", u32, bcrypt::DEFAULT_COST);

            Ok(Self {
                signing_key,
                token_ttl: Duration::from_secs(ttl_secs),
                bcrypt_cost: cost.clamp(4, 31),
            })
        }
    }
}
pub use auth::AuthConfig;

// ============================================================
// Server configuration
// ============================================================

mod server {
    // ---

    /// Listener and observability settings.
    #[derive(Debug, Clone)]
    pub struct ServerConfig {
        /// Socket address the HTTP server binds to.
        pub bind_addr: String,

        /// `true` selects Prometheus metrics, otherwise metrics are discarded.
        pub prometheus_metrics: bool,
    }

    impl ServerConfig {
        pub fn from_env() -> Self {
            // ---
            let bind_addr =
                std::env::var("KASHO_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
            let prometheus_metrics = std::env::var("KASHO_METRICS_TYPE")
                .map(|v| v == "prom")
                .unwrap_or(false);

            Self {
                bind_addr,
                prometheus_metrics,
            }
        }
    }
}
pub use server::ServerConfig;

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use anyhow::Result;
    use serial_test::serial;

    #[test]
    #[serial]
    fn missing_database_url_fails() -> Result<()> {
        // ---
        std::env::remove_var("KASHO_DB_DRIVER");
        std::env::remove_var("DATABASE_URL");

        assert_missing_config!(DatabaseConfig::from_env(), "DATABASE_URL");

        Ok(())
    }

    #[test]
    #[serial]
    fn unsupported_driver_fails() -> Result<()> {
        // ---
        std::env::set_var("DATABASE_URL", "postgres://test");
        std::env::set_var("KASHO_DB_DRIVER", "mysql");

        let err = DatabaseConfig::from_env().expect_err("mysql is not supported");
        assert!(err.to_string().contains("mysql"));

        std::env::remove_var("KASHO_DB_DRIVER");
        Ok(())
    }

    #[test]
    #[serial]
    fn database_defaults_applied() -> Result<()> {
        // ---
        let db_url = "postgres://test";
        std::env::set_var("DATABASE_URL", db_url);

        std::env::remove_var("KASHO_DB_DRIVER");
        std::env::remove_var("KASHO_DB_RETRY_COUNT");
        std::env::remove_var("KASHO_DB_ACQUIRE_TIMEOUT_SEC");
        std::env::remove_var("KASHO_DB_MIN_CONNECTIONS");
        std::env::remove_var("KASHO_DB_MAX_CONNECTIONS");

        let cfg = DatabaseConfig::from_env()?;
        assert_eq!(cfg.driver, "postgres");
        assert_eq!(cfg.database_url, db_url);
        assert_eq!(cfg.retry_count, 50);
        assert_eq!(cfg.acquire_timeout.as_secs(), 30);
        assert_eq!(cfg.min_connections, 2);
        assert_eq!(cfg.max_connections, 15);

        Ok(())
    }

    #[test]
    #[serial]
    fn database_overrides_defaults() -> Result<()> {
        // ---
        std::env::set_var("DATABASE_URL", "postgres://test");
        std::env::set_var("KASHO_DB_RETRY_COUNT", "3");
        std::env::set_var("KASHO_DB_ACQUIRE_TIMEOUT_SEC", "5");
        std::env::set_var("KASHO_DB_MIN_CONNECTIONS", "10");
        std::env::set_var("KASHO_DB_MAX_CONNECTIONS", "not-a-number");

        let cfg = DatabaseConfig::from_env()?;
        assert_eq!(cfg.retry_count, 3);
        assert_eq!(cfg.acquire_timeout.as_secs(), 5);
        assert_eq!(cfg.min_connections, 10);
        assert_eq!(cfg.max_connections, 15);

        std::env::remove_var("KASHO_DB_RETRY_COUNT");
        std::env::remove_var("KASHO_DB_ACQUIRE_TIMEOUT_SEC");
        std::env::remove_var("KASHO_DB_MIN_CONNECTIONS");
        std::env::remove_var("KASHO_DB_MAX_CONNECTIONS");
        Ok(())
    }

    #[test]
    #[serial]
    fn missing_signing_key_fails() -> Result<()> {
        // ---
        std::env::remove_var("KASHO_SIGNING_KEY");

        assert_missing_config!(AuthConfig::from_env(), "KASHO_SIGNING_KEY");

        Ok(())
    }

    #[test]
    #[serial]
    fn empty_signing_key_fails() -> Result<()> {
        // ---
        std::env::set_var("KASHO_SIGNING_KEY", "");

        assert!(AuthConfig::from_env().is_err());

        std::env::remove_var("KASHO_SIGNING_KEY");
        Ok(())
    }

    #[test]
    #[serial]
    fn auth_defaults_and_cost_clamp() -> Result<()> {
        // ---
        std::env::set_var("KASHO_SIGNING_KEY", "s3cret");
        std::env::remove_var("KASHO_TOKEN_TTL_SEC");
        std::env::set_var("KASHO_BCRYPT_COST", "2");

        let cfg = AuthConfig::from_env()?;
        assert_eq!(cfg.token_ttl.as_secs(), 1800);
        assert_eq!(cfg.bcrypt_cost, 4);
        assert!(!format!("{cfg:?}").contains("s3cret"));

        std::env::remove_var("KASHO_BCRYPT_COST");
        Ok(())
    }

    #[test]
    #[serial]
    fn app_config_from_env_success() -> Result<()> {
        // ---
        std::env::remove_var("KASHO_DB_DRIVER");
        std::env::set_var("DATABASE_URL", "postgres://test");
        std::env::set_var("KASHO_SIGNING_KEY", "s3cret");
        std::env::set_var("KASHO_TOKEN_TTL_SEC", "10");
        std::env::remove_var("KASHO_BIND_ADDR");
        std::env::remove_var("KASHO_METRICS_TYPE");

        let cfg = AppConfig::from_env()?;
        assert_eq!(cfg.auth.token_ttl.as_secs(), 10);
        assert_eq!(cfg.server.bind_addr, "0.0.0.0:8000");
        assert!(!cfg.server.prometheus_metrics);

        std::env::remove_var("KASHO_TOKEN_TTL_SEC");
        Ok(())
    }

    #[test]
    fn missing_env_file_is_not_an_error() {
        // ---
        let loaded = load_env_file(Some(Path::new("/nonexistent/kasho.env")));
        assert!(matches!(loaded, Ok(None)));
    }
}
