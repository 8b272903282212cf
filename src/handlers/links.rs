use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    auth::AuthAdmin,
    error::AppResult,
    models::{CreateLinkDto, LinkPatch, PortfolioLink},
    portfolio::LinkManager,
    state::AppState,
};

/// GET /api/portfolio/links — active links only, newest first.
pub async fn list_public_links(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PortfolioLink>>> {
    let links = LinkManager::from_state(&state).list_public().await?;
    Ok(Json(links))
}

/// GET /api/portfolio/admin/links — every link, including inactive ones.
pub async fn list_all_links(
    State(state): State<AppState>,
    auth: AuthAdmin,
) -> AppResult<Json<Vec<PortfolioLink>>> {
    let links = LinkManager::from_state(&state).list_all(&auth).await?;
    Ok(Json(links))
}

/// POST /api/portfolio/links
pub async fn create_link(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Json(req): Json<CreateLinkDto>,
) -> AppResult<(StatusCode, Json<PortfolioLink>)> {
    let link = LinkManager::from_state(&state).create(&auth, req).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// PUT|PATCH /api/portfolio/links/:id — only the keys present change.
pub async fn update_link(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(link_id): Path<i64>,
    Json(patch): Json<LinkPatch>,
) -> AppResult<Json<PortfolioLink>> {
    let link = LinkManager::from_state(&state)
        .update(&auth, link_id, patch)
        .await?;
    Ok(Json(link))
}

/// DELETE /api/portfolio/links/:id
pub async fn delete_link(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(link_id): Path<i64>,
) -> AppResult<Json<Value>> {
    LinkManager::from_state(&state)
        .delete(&auth, link_id)
        .await?;
    Ok(Json(json!({ "message": "Link removido com sucesso" })))
}
