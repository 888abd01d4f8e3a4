//! Database initialization
//!
//! Creates the database file and schema on first run so the service starts
//! with zero manual setup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc creates the database file when missing
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers (admin views) with one writer (submissions)
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_responses_table(&pool).await?;

    Ok(pool)
}

/// Durable append-only store of submitted survey responses.
///
/// `meta`, `performance`, and `importance` are JSON-encoded TEXT columns.
/// `id` is a plain INTEGER PRIMARY KEY (rowid alias) so clearing the table
/// also restarts the id sequence.
async fn create_responses_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS responses (
            id INTEGER PRIMARY KEY,
            created_at TEXT NOT NULL,
            respondent_code TEXT NOT NULL,
            meta TEXT NOT NULL,
            performance TEXT NOT NULL,
            importance TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_responses_created_at ON responses(created_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
