//! Database Config

use std::time::Duration;

use clap::{Args, ValueEnum};
use coupon_app::database::PoolSettings;

/// Backing store for campaigns and coupons.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StoreKind {
    /// `PostgreSQL`, selected by `DATABASE_URL`.
    Postgres,

    /// Process memory; contents are lost on restart.
    Memory,
}

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// Coupon store (postgres, memory)
    #[arg(long, env = "COUPON_STORE", value_enum, default_value_t = StoreKind::Postgres)]
    pub store: StoreKind,

    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 25)]
    pub max_connections: u32,

    /// Pooled connections kept open while idle
    #[arg(long, env = "DATABASE_MIN_CONNECTIONS", default_value_t = 5)]
    pub min_connections: u32,

    /// Seconds before a pooled connection is recycled
    #[arg(long, env = "DATABASE_MAX_LIFETIME_SECS", default_value_t = 3600)]
    pub max_lifetime_secs: u64,
}

impl DatabaseConfig {
    #[must_use]
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings::new(self.max_connections)
            .with_min_connections(self.min_connections)
            .with_max_lifetime(Duration::from_secs(self.max_lifetime_secs))
    }
}
