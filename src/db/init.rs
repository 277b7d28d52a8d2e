// Database initialization and migration handling
use std::path::Path;

use serde::Serialize;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Row, Sqlite};

use crate::db::migrations::MIGRATION_001;
use crate::error::Result;

/// SQLite-backed QSO store
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pub(crate) pool: Pool<Sqlite>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DbStats {
    pub qso_count: i64,
    pub logbook_count: i64,
}

impl SqliteStore {
    /// Open (creating if needed) the database file at `path` and migrate it
    pub async fn open(path: &Path) -> Result<Self> {
        let db_url = format!("sqlite:{}?mode=rwc", path.display());
        log::info!("Initializing database at: {}", path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        // Enable WAL mode for better performance
        sqlx::query("PRAGMA journal_mode=WAL;").execute(&pool).await?;

        let store = Self { pool };
        store.run_migrations().await?;
        log::info!("Database initialization complete");
        Ok(store)
    }

    /// Private in-memory database, used by tests and dry runs.
    ///
    /// A single connection is required: every SQLite memory connection is its
    /// own database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Run all pending migrations
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS _migrations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                applied_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        let applied: i64 =
            sqlx::query("SELECT COUNT(*) as count FROM _migrations WHERE name = 'migration_001'")
                .fetch_one(&self.pool)
                .await?
                .get("count");

        if applied > 0 {
            return Ok(());
        }

        log::info!("Applying migration_001...");

        // SQLite executes one statement per query
        for statement in MIGRATION_001.split(';') {
            let stmt = strip_leading_comments(statement);
            if stmt.is_empty() {
                continue;
            }
            sqlx::query(stmt).execute(&self.pool).await?;
        }

        sqlx::query("INSERT INTO _migrations (name, applied_at) VALUES ('migration_001', datetime('now'))")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Row counts for a quick health check
    pub async fn stats(&self) -> Result<DbStats> {
        let qso_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM qsos")
            .fetch_one(&self.pool)
            .await?;
        let logbook_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM logbooks")
            .fetch_one(&self.pool)
            .await?;
        Ok(DbStats { qso_count, logbook_count })
    }
}

fn strip_leading_comments(statement: &str) -> &str {
    let mut stmt = statement.trim();
    while stmt.starts_with("--") {
        match stmt.find('\n') {
            Some(idx) => stmt = stmt[idx + 1..].trim(),
            None => return "",
        }
    }
    stmt
}
