use crate::error::DbError;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::env;
use std::time::Duration;

/// Sizing of the PostgreSQL connection pool.
#[derive(Debug, Clone, Copy)]
pub struct PoolOptions {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Establishes a connection pool to the PostgreSQL database.
///
/// This function reads `DATABASE_URL` from the environment (a `.env` file is
/// loaded first if one exists) and returns a pool that can be shared across
/// the entire application.
pub async fn connect(options: PoolOptions) -> Result<PgPool, DbError> {
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL")
        .map_err(|_e| DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))?;

    connect_with(&database_url, options).await
}

/// Establishes a connection pool to an explicit database URL.
pub async fn connect_with(database_url: &str, options: PoolOptions) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(options.max_connections)
        .acquire_timeout(options.acquire_timeout)
        .connect(database_url)
        .await?;

    tracing::info!(max_connections = options.max_connections, "Connected to the database.");
    Ok(pool)
}

/// Applies the embedded migrations so the `properties` table is up-to-date.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied.");
    Ok(())
}
