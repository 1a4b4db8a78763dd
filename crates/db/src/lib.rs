//! Quayside persistence layer: PostgreSQL via sqlx.
//!
//! Row models under [`models`], zero-sized repositories under
//! [`repositories`], the sqlx-backed disclosure store in
//! [`disclosure_store`], and the reservation admission controller in
//! [`admission`].

use sqlx::postgres::PgPoolOptions;

pub mod admission;
pub mod disclosure_store;
pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
