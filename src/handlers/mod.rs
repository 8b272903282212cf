pub mod auth;
pub mod links;
pub mod portfolio_pdfs;
pub mod shared;
pub mod standalone_pdfs;
pub mod uploads;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{db, state::AppState};

/// GET /health: liveness plus a database round-trip.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            })),
        ),
        Err(e) => {
            tracing::warn!(error = ?e, "Health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "service": env!("CARGO_PKG_NAME"),
                    "database": "unavailable",
                })),
            )
        }
    }
}
