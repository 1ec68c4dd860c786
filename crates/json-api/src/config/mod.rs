//! Server configuration module

use clap::Parser;

use crate::config::{
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod server;

/// Coupon JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "coupon-json", about = "Coupon JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Request observability settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Coupon storage settings.
    #[command(flatten)]
    pub database: DatabaseConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use std::time::Duration;

    use coupon_app::database::PoolSettings;

    use super::{ServerConfig, db::StoreKind, observability::LogFormat};

    use clap::Parser;

    #[test]
    fn memory_store_needs_no_database_url() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "coupon-json",
            "--store",
            "memory",
            "--port",
            "9000",
            "--log-format",
            "json",
        ])?;

        assert!(matches!(config.database.store, StoreKind::Memory));
        assert!(matches!(config.logging.log_format, LogFormat::Json));
        assert_eq!(config.socket_addr(), "0.0.0.0:9000");

        Ok(())
    }

    #[test]
    fn database_pool_defaults_to_twenty_five_connections() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "coupon-json",
            "--database-url",
            "postgres://localhost/coupons",
        ])?;

        assert_eq!(config.database.max_connections, 25);
        assert_eq!(
            config.database.database_url.as_deref(),
            Some("postgres://localhost/coupons")
        );

        Ok(())
    }

    #[test]
    fn pool_settings_follow_database_flags() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "coupon-json",
            "--max-connections",
            "40",
            "--min-connections",
            "8",
            "--max-lifetime-secs",
            "600",
        ])?;

        let settings = config.database.pool_settings();

        assert_eq!(settings.max_connections, 40);
        assert_eq!(settings.min_connections, 8);
        assert_eq!(settings.max_lifetime, Duration::from_secs(600));

        Ok(())
    }

    #[test]
    fn pool_settings_default_to_five_idle_connections_for_an_hour() -> TestResult {
        let settings = ServerConfig::try_parse_from(["coupon-json"])?
            .database
            .pool_settings();

        assert_eq!(settings.min_connections, 5);
        assert_eq!(settings.max_lifetime, PoolSettings::DEFAULT_MAX_LIFETIME);

        Ok(())
    }
}
