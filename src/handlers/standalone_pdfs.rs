use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use super::shared::{pdf_response, read_upload_form, Disposition};
use crate::{
    auth::AuthAdmin,
    db,
    error::{AppError, AppResult},
    files::FileStore,
    models::{normalize_description, NewPdf, StandalonePdf, UpdateStandalonePdfDto},
    state::AppState,
};

/// Multipart field carrying the PDF.
const FILE_FIELD: &str = "pdf";

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/pdfs/standalone — newest first.
pub async fn list_standalone_pdfs(
    State(state): State<AppState>,
    _auth: AuthAdmin,
) -> AppResult<Json<Vec<StandalonePdf>>> {
    let pdfs = db::standalone_pdfs::list(&state.pool).await?;
    Ok(Json(pdfs))
}

/// POST /api/pdfs/standalone — multipart with `pdf`, `title` and an optional
/// `description`.
///
/// All validation happens before the file is written. If the row insert
/// fails, the file already on disk is removed again.
pub async fn upload_standalone_pdf(
    State(state): State<AppState>,
    auth: AuthAdmin,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<StandalonePdf>)> {
    let form = read_upload_form(multipart, FILE_FIELD).await?;

    let file = form
        .file
        .as_ref()
        .ok_or_else(|| AppError::Validation("Nenhum arquivo enviado".into()))?;

    let title = form.text("title");
    if title.is_empty() {
        return Err(AppError::Validation("Título é obrigatório".into()));
    }

    let stored = state.pdf_store.save(&file.data, &file.filename).await?;

    let new_pdf = NewPdf {
        title,
        description: normalize_description(Some(form.text("description"))),
        filename: stored.stored_name.clone(),
        original_name: stored.original_name,
        size: stored.size,
    };

    let pdf = match db::standalone_pdfs::create(&state.pool, &new_pdf).await {
        Ok(pdf) => pdf,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to insert standalone PDF row; removing file");
            cleanup_file(&state.pdf_store, &stored.stored_name).await;
            return Err(e);
        }
    };

    info!(
        pdf_id = pdf.id,
        filename = %pdf.filename,
        admin_id = auth.admin_id(),
        "Standalone PDF uploaded"
    );
    Ok((StatusCode::CREATED, Json(pdf)))
}

/// PUT /api/pdfs/standalone/:id — replace title and description.
pub async fn update_standalone_pdf(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Path(pdf_id): Path<i64>,
    Json(req): Json<UpdateStandalonePdfDto>,
) -> AppResult<Json<StandalonePdf>> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Título é obrigatório".into()));
    }
    let description = normalize_description(req.description);

    let pdf =
        db::standalone_pdfs::update_details(&state.pool, pdf_id, title, description.as_deref())
            .await?;
    Ok(Json(pdf))
}

/// DELETE /api/pdfs/standalone/:id — removes the file, then the row.
pub async fn delete_standalone_pdf(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Path(pdf_id): Path<i64>,
) -> AppResult<Json<Value>> {
    let pdf = db::standalone_pdfs::fetch(&state.pool, pdf_id).await?;

    state.pdf_store.delete(&pdf.filename).await?;
    db::standalone_pdfs::delete(&state.pool, pdf.id).await?;

    info!(pdf_id = pdf.id, "Standalone PDF deleted");
    Ok(Json(json!({ "message": "PDF removido com sucesso" })))
}

/// GET /api/pdfs/standalone/:id/download — served under its original name.
pub async fn download_standalone_pdf(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Path(pdf_id): Path<i64>,
) -> AppResult<Response> {
    let pdf = db::standalone_pdfs::fetch(&state.pool, pdf_id).await?;
    let data = state.pdf_store.read(&pdf.filename).await?;
    pdf_response(data, Disposition::Attachment(&pdf.original_name))
}

// ============================================================================
// Private helpers
// ============================================================================

/// Remove a just-written file, logging any error but not propagating it.
pub(super) async fn cleanup_file(store: &FileStore, stored_name: &str) {
    if let Err(e) = store.delete(stored_name).await {
        tracing::warn!(error = ?e, stored_name, "Failed to clean up orphaned upload file");
    }
}
