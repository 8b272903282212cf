//! Storage service: connection pool, migrations, and per-entity queries.

pub mod admins;
pub mod links;
pub mod portfolio_pdfs;
pub mod standalone_pdfs;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::{AppError, AppResult};

/// Which rows a public/admin listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    ActiveOnly,
    All,
}

pub async fn create_pool(database_url: &str) -> AppResult<SqlitePool> {
    info!("🔌 Connecting to database...");

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| {
            tracing::error!("Invalid database URL: {:?}", e);
            AppError::Persistence(e)
        })?
        .create_if_missing(true);

    // The parent directory of a file-backed database must exist before
    // SQLite can create the file.
    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {:?}", e);
            AppError::Persistence(e)
        })?;

    info!("✅ Database connection pool created");
    Ok(pool)
}

/// Apply embedded migrations from `./migrations`.
pub async fn migrate(pool: &SqlitePool) -> AppResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::Persistence(e.into()))
}

pub async fn health_check(pool: &SqlitePool) -> AppResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(AppError::Persistence)?;

    Ok(())
}
