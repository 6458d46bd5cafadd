//! Database connection and schema setup

use crate::campaigns::CampaignManager;
use crate::connections::ConnectionManager;
use crate::contacts::ContactManager;
use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

/// Open a SQLite pool, creating the database file if needed
///
/// In-memory databases use a single connection that is never reaped, since
/// each SQLite connection would otherwise see its own empty database.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool_options = if database_url.contains(":memory:") {
        // The database lives only as long as its one connection
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options.connect_with(options).await?;

    info!("Connected to database {}", database_url);
    Ok(pool)
}

/// Create every table the service uses
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    ContactManager::new(pool.clone()).init_db().await?;
    ConnectionManager::new(pool.clone()).init_db().await?;
    CampaignManager::new(pool.clone()).init_db().await?;
    Ok(())
}
