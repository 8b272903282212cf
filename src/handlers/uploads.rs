//! Loose PDF files attached to portfolio links by URL. No database rows:
//! the directory listing is the source of truth.

use axum::{
    extract::{Multipart, Path, State},
    response::Response,
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use super::shared::{pdf_response, read_upload_form, Disposition};
use crate::{
    auth::AuthAdmin,
    error::{AppError, AppResult},
    files::FileInfo,
    state::AppState,
};

const FILE_FIELD: &str = "pdf_file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub pdf_url: String,
    pub filename: String,
    pub original_name: String,
}

/// POST /api/upload/pdf — returns the `pdf_url` to store on a link.
pub async fn upload_pdf(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let form = read_upload_form(multipart, FILE_FIELD).await?;
    let file = form
        .file
        .ok_or_else(|| AppError::Validation("Nenhum arquivo enviado".into()))?;

    let stored = state.pdf_store.save(&file.data, &file.filename).await?;
    info!(filename = %stored.stored_name, "Link PDF uploaded");

    Ok(Json(UploadResponse {
        message: "PDF enviado com sucesso".into(),
        pdf_url: state.pdf_store.url_for(&stored.stored_name),
        filename: stored.stored_name,
        original_name: stored.original_name,
    }))
}

/// GET /api/uploads/pdfs — newest first.
pub async fn list_pdfs(
    State(state): State<AppState>,
    _auth: AuthAdmin,
) -> AppResult<Json<Vec<FileInfo>>> {
    Ok(Json(state.pdf_store.list().await?))
}

/// GET /api/uploads/pdfs/:filename — public, so portfolio visitors can open
/// the PDF attached to a link.
pub async fn serve_pdf(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let data = state.pdf_store.read(&filename).await?;
    pdf_response(data, Disposition::Inline)
}

/// DELETE /api/uploads/pdfs/:filename
pub async fn delete_pdf(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Path(filename): Path<String>,
) -> AppResult<Json<Value>> {
    if !state.pdf_store.exists(&filename).await {
        return Err(AppError::NotFound("Arquivo não encontrado".into()));
    }
    state.pdf_store.delete(&filename).await?;
    info!(filename = %filename, "Link PDF deleted");
    Ok(Json(json!({ "message": "PDF removido com sucesso" })))
}
