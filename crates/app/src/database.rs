//! Database connection management

use std::time::Duration;

use sqlx::{
    PgPool, Postgres, Transaction,
    migrate::MigrateError,
    postgres::PgPoolOptions,
};

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when no connection can be acquired or `BEGIN` fails.
    pub async fn begin_transaction(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }
}

/// Connection pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    /// Upper bound on open connections.
    pub max_connections: u32,

    /// Connections kept open while idle. Capped at `max_connections`.
    pub min_connections: u32,

    /// Connections older than this are closed and replaced.
    pub max_lifetime: Duration,
}

impl PoolSettings {
    /// One hour.
    pub const DEFAULT_MAX_LIFETIME: Duration = Duration::from_secs(60 * 60);

    #[must_use]
    pub fn new(max_connections: u32) -> Self {
        Self {
            max_connections,
            min_connections: 0,
            max_lifetime: Self::DEFAULT_MAX_LIFETIME,
        }
    }

    #[must_use]
    pub fn with_min_connections(self, min_connections: u32) -> Self {
        Self {
            min_connections,
            ..self
        }
    }

    #[must_use]
    pub fn with_max_lifetime(self, max_lifetime: Duration) -> Self {
        Self {
            max_lifetime,
            ..self
        }
    }

    fn pool_options(self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .max_lifetime(self.max_lifetime)
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str, settings: PoolSettings) -> Result<PgPool, sqlx::Error> {
    settings.pool_options().connect(database_url).await
}

/// Check that the database answers a trivial query.
///
/// # Errors
///
/// Returns an error when no connection can be acquired or the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}

/// Apply pending schema migrations.
///
/// # Errors
///
/// Returns an error if a migration fails or the recorded history diverges.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
