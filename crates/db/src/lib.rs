//! Embedded local store for offline tours.
//!
//! A single SQLite database holds four collections: tours, audio assets,
//! image assets, and progress records pending sync. [`open`] creates the
//! database file on first use and runs the embedded migrations; both are
//! idempotent, so it is safe to call on every startup.

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::SqlitePool;

/// Embedded schema migrations, applied by [`open`].
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors raised while opening or migrating the local store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The host environment has no usable local persistence (the database
    /// file cannot be created or opened).
    #[error("Local storage unavailable: {0}")]
    Unavailable(String),

    /// Schema migration failed on an otherwise reachable database.
    #[error("Store migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Open (creating if missing) and migrate the store at `path`.
pub async fn open(path: impl AsRef<Path>) -> Result<DbPool, StoreError> {
    let options = SqliteConnectOptions::new()
        .filename(path.as_ref())
        .create_if_missing(true)
        .foreign_keys(true);
    connect(options).await
}

/// Open a fresh in-memory store. Used by tests and ephemeral sessions.
pub async fn open_in_memory() -> Result<DbPool, StoreError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
    // A pool of one keeps every connection on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

async fn connect(options: SqliteConnectOptions) -> Result<DbPool, StoreError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

/// Verify the store is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
