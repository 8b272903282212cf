use std::sync::Arc;

use chrono::Duration;
use sqlx::SqlitePool;

use crate::files::FileStore;
use crate::metadata::MetadataExtractor;

/// Shared application state passed to all handlers and extractors.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub extractor: Arc<dyn MetadataExtractor>,
    /// Standalone PDFs and files attached to portfolio links.
    pub pdf_store: FileStore,
    /// PDFs shown in the portfolio listing.
    pub portfolio_pdf_store: FileStore,
    pub session_ttl: Duration,
}
