//! Pool construction and schema setup.
//!
//! The schema lives in `migrations/` at the workspace root and is embedded at
//! build time: `companies`, `jobs` (cascading from their company), `users`,
//! and the `applications` join table between users and jobs.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::DbError;

pub type DbPool = PgPool;

/// Connection limits for the shared pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long a request waits for a free connection before failing.
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 0,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

impl PoolSettings {
    fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .acquire_timeout(self.acquire_timeout)
    }
}

/// Connect to `database_url`, failing fast if Postgres is unreachable.
pub async fn create_pool(database_url: &str, settings: &PoolSettings) -> Result<DbPool, DbError> {
    info!(?settings, "connecting to job board database");
    Ok(settings.options().connect(database_url).await?)
}

/// Apply any pending job board migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), DbError> {
    let migrator = sqlx::migrate!("../../migrations");
    info!(available = migrator.iter().count(), "applying job board schema migrations");
    migrator.run(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_flow_into_pool_options() {
        let settings = PoolSettings {
            max_connections: 4,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(5),
        };

        let options = settings.options();

        assert_eq!(options.get_max_connections(), 4);
        assert_eq!(options.get_min_connections(), 2);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn min_connections_never_exceed_max() {
        let settings = PoolSettings {
            max_connections: 2,
            min_connections: 8,
            ..PoolSettings::default()
        };

        assert_eq!(settings.options().get_min_connections(), 2);
    }
}
