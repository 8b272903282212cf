//! Startup wiring shared by the server and the admin tools.

use std::sync::Arc;

use chrono::Duration;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::{
    auth::hash_password,
    config::Config,
    db,
    error::{AppError, AppResult},
    files::{FileStore, Naming},
    metadata::HttpMetadataExtractor,
    routes::{PDF_URL_PREFIX, PORTFOLIO_PDF_URL_PREFIX},
    state::AppState,
};

/// Build the shared state: file stores under `upload_dir` and the HTTP
/// metadata extractor.
pub async fn build_state(config: &Config, pool: SqlitePool) -> AppResult<AppState> {
    let pdf_store = FileStore::new(
        config.upload_dir.join("pdfs"),
        PDF_URL_PREFIX,
        Naming::Timestamped,
    );
    let portfolio_pdf_store = FileStore::new(
        config.upload_dir.join("portfolio-pdfs"),
        PORTFOLIO_PDF_URL_PREFIX,
        Naming::RandomToken,
    );
    pdf_store.ensure_dir().await?;
    portfolio_pdf_store.ensure_dir().await?;

    let extractor = HttpMetadataExtractor::new().map_err(|e| {
        tracing::error!(error = ?e, "Failed to build HTTP client for metadata extraction");
        AppError::Internal
    })?;

    Ok(AppState {
        pool,
        extractor: Arc::new(extractor),
        pdf_store,
        portfolio_pdf_store,
        session_ttl: Duration::hours(config.session_ttl_hours),
    })
}

/// Create the configured admin when no administrator exists yet.
pub async fn seed_admin(pool: &SqlitePool, config: &Config) -> AppResult<()> {
    if db::admins::any_exists(pool).await? {
        return Ok(());
    }

    match (&config.admin_username, &config.admin_password) {
        (Some(username), Some(password)) => {
            let password_hash = hash_password(password)?;
            let admin = db::admins::insert(pool, username, &password_hash).await?;
            info!("👤 Admin created: {}", admin.username);
        }
        _ => warn!(
            "No administrator exists. Set ADMIN_USERNAME and ADMIN_PASSWORD, \
             or call POST /api/auth/create-admin once."
        ),
    }
    Ok(())
}
