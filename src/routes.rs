use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::{files::MAX_UPLOAD_BODY, handlers, state::AppState};

/// Public URL prefix of link-attached and standalone PDFs.
pub const PDF_URL_PREFIX: &str = "/api/uploads/pdfs";
/// Public URL prefix of portfolio PDFs.
pub const PORTFOLIO_PDF_URL_PREFIX: &str = "/static/uploads/portfolio-pdfs";

/// Build the application router. Metrics and CORS layers are added by the
/// binary so tests can drive this router directly.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        // Auth routes
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/check", get(handlers::auth::check))
        .route("/auth/create-admin", post(handlers::auth::create_admin))
        // Portfolio link routes
        .route(
            "/portfolio/links",
            get(handlers::links::list_public_links),
        )
        .route("/portfolio/links", post(handlers::links::create_link))
        .route(
            "/portfolio/admin/links",
            get(handlers::links::list_all_links),
        )
        .route("/portfolio/links/:id", put(handlers::links::update_link))
        .route("/portfolio/links/:id", patch(handlers::links::update_link))
        .route("/portfolio/links/:id", delete(handlers::links::delete_link))
        // Link PDF files (no database rows)
        .route(
            "/upload/pdf",
            post(handlers::uploads::upload_pdf).layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY)),
        )
        .route("/uploads/pdfs", get(handlers::uploads::list_pdfs))
        .route("/uploads/pdfs/:filename", get(handlers::uploads::serve_pdf))
        .route(
            "/uploads/pdfs/:filename",
            delete(handlers::uploads::delete_pdf),
        )
        // Standalone PDF routes
        .route(
            "/pdfs/standalone",
            get(handlers::standalone_pdfs::list_standalone_pdfs),
        )
        .route(
            "/pdfs/standalone",
            post(handlers::standalone_pdfs::upload_standalone_pdf)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY)),
        )
        .route(
            "/pdfs/standalone/:id",
            put(handlers::standalone_pdfs::update_standalone_pdf),
        )
        .route(
            "/pdfs/standalone/:id",
            delete(handlers::standalone_pdfs::delete_standalone_pdf),
        )
        .route(
            "/pdfs/standalone/:id/download",
            get(handlers::standalone_pdfs::download_standalone_pdf),
        )
        // Portfolio PDF routes
        .route(
            "/portfolio/pdfs",
            get(handlers::portfolio_pdfs::list_public_pdfs),
        )
        .route(
            "/portfolio/pdfs",
            post(handlers::portfolio_pdfs::add_portfolio_pdf)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY)),
        )
        .route(
            "/portfolio/pdfs/admin",
            get(handlers::portfolio_pdfs::list_all_pdfs),
        )
        .route(
            "/portfolio/pdfs/:id",
            put(handlers::portfolio_pdfs::update_portfolio_pdf),
        )
        .route(
            "/portfolio/pdfs/:id",
            patch(handlers::portfolio_pdfs::update_portfolio_pdf),
        )
        .route(
            "/portfolio/pdfs/:id",
            delete(handlers::portfolio_pdfs::delete_portfolio_pdf),
        )
        .route(
            "/portfolio/pdfs/:id/toggle",
            post(handlers::portfolio_pdfs::toggle_portfolio_pdf),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api)
        .route(
            "/static/uploads/portfolio-pdfs/:filename",
            get(handlers::portfolio_pdfs::serve_portfolio_pdf),
        )
        .with_state(state)
}
