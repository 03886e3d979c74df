//! Database pool setup and migration runner.
//!
//! Startup calls `init_pool` before the router is built: the canvas row and
//! the guest user must exist before the first paint or login arrives, and
//! both depend on the schema being current.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::state::env_parse;

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// Connect to `PostgreSQL` and bring the schema up to date.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS))
        .acquire_timeout(Duration::from_secs(env_parse(
            "DB_ACQUIRE_TIMEOUT_SECS",
            DEFAULT_DB_ACQUIRE_TIMEOUT_SECS,
        )))
        .connect(database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;

    Ok(pool)
}
