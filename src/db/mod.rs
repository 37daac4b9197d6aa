//! Database access layer
//!
//! SQLite via sqlx. The pool is opened once at startup and handed to the
//! repository; there is no process-wide database handle.

use std::path::Path;

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

mod users;
pub use users::{FieldValue, NewUser, UserRecord, UserRepository};

/// Open (creating if needed) the database and ensure the schema exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    // mode=rwc creates the database file on first run
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await
        .context("Failed to connect to database")?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_users_table(&pool).await?;

    Ok(pool)
}

/// Create the users table (idempotent)
///
/// Text fields are nullable; email carries the uniqueness constraint the
/// service maps to a duplicate-key error. The engagement metrics are NOT
/// NULL with zero defaults, matching the coercion policy.
async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            email TEXT UNIQUE,
            password TEXT,
            description TEXT,
            specialty TEXT,
            profile_photo TEXT,
            likes INTEGER NOT NULL DEFAULT 0,
            reviews INTEGER NOT NULL DEFAULT 0,
            stars REAL NOT NULL DEFAULT 0.0
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create users table")?;

    Ok(())
}
