//! Persistence for the initiatives service.
//!
//! Everything is stored in a flat key-value namespace behind the
//! [`kv::KvStore`] port. [`kv::PgKvStore`] backs it with a single PostgreSQL
//! table; [`kv::MemoryKvStore`] keeps it in process for development and tests.

use sqlx::postgres::PgPoolOptions;

pub mod keys;
pub mod kv;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations (creates the `kv_store` table).
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
