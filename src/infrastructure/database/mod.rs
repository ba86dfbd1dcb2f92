mod memory_repository;
mod postgres_repository;


use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::domain::RepositoryPtr;

pub use memory_repository::MemoryRepository;
pub use postgres_repository::PostgresRepository;

/// Delay between startup connection attempts.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Connects to PostgreSQL and applies the bundled migrations.
///
/// The initial connection is retried `retry_count` times so the service can
/// start before the database container is ready.
///
/// # Errors
/// Returns an error when every attempt fails or a migration cannot be applied.
pub async fn init_database(config: &DatabaseConfig) -> Result<PgPool> {
    // ---
    let attempts = config.retry_count.max(1);
    let mut attempt = 0;

    let pool = loop {
        attempt += 1;

        let connected = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await;

        match connected {
            Ok(pool) => break pool,
            Err(e) if attempt < attempts => {
                tracing::warn!("Database connection attempt {attempt}/{attempts} failed: {e}");
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(e) => {
                return Err(e).context(format!("database unreachable after {attempts} attempts"))
            }
        }
    };

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run database migrations")?;

    tracing::info!("Database ready after {attempt} attempt(s)");
    Ok(pool)
}

/// Creates the PostgreSQL-backed repository over an initialised pool.
pub fn create_postgres_repository(pool: PgPool) -> RepositoryPtr {
    // ---
    Arc::new(PostgresRepository::new(pool))
}

/// Creates an empty in-process repository.
pub fn create_memory_repository() -> RepositoryPtr {
    // ---
    Arc::new(MemoryRepository::new())
}
