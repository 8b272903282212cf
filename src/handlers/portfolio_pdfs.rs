use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use super::shared::{pdf_response, read_upload_form, Disposition};
use super::standalone_pdfs::cleanup_file;
use crate::{
    auth::AuthAdmin,
    db::{self, Visibility},
    error::{AppError, AppResult},
    models::{normalize_description, NewPdf, PortfolioPdf, PortfolioPdfDto, PortfolioPdfPatch},
    state::AppState,
};

const FILE_FIELD: &str = "pdf";

fn to_dto(state: &AppState, pdf: PortfolioPdf) -> PortfolioPdfDto {
    let url = state.portfolio_pdf_store.url_for(&pdf.filename);
    PortfolioPdfDto::new(pdf, url)
}

fn to_dtos(state: &AppState, pdfs: Vec<PortfolioPdf>) -> Vec<PortfolioPdfDto> {
    pdfs.into_iter().map(|pdf| to_dto(state, pdf)).collect()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/portfolio/pdfs — active PDFs in display order.
pub async fn list_public_pdfs(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PortfolioPdfDto>>> {
    let pdfs = db::portfolio_pdfs::list(&state.pool, Visibility::ActiveOnly).await?;
    Ok(Json(to_dtos(&state, pdfs)))
}

/// GET /api/portfolio/pdfs/admin — every PDF in display order.
pub async fn list_all_pdfs(
    State(state): State<AppState>,
    _auth: AuthAdmin,
) -> AppResult<Json<Vec<PortfolioPdfDto>>> {
    let pdfs = db::portfolio_pdfs::list(&state.pool, Visibility::All).await?;
    Ok(Json(to_dtos(&state, pdfs)))
}

/// POST /api/portfolio/pdfs — multipart with `pdf`, `title` and an optional
/// `description`; appended after the last PDF in display order.
pub async fn add_portfolio_pdf(
    State(state): State<AppState>,
    auth: AuthAdmin,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<PortfolioPdfDto>)> {
    let form = read_upload_form(multipart, FILE_FIELD).await?;

    let title = form.text("title");
    if title.is_empty() {
        return Err(AppError::Validation("Título é obrigatório".into()));
    }

    let file = form
        .file
        .as_ref()
        .ok_or_else(|| AppError::Validation("Arquivo PDF é obrigatório".into()))?;

    let stored = state
        .portfolio_pdf_store
        .save(&file.data, &file.filename)
        .await?;

    let new_pdf = NewPdf {
        title,
        description: normalize_description(Some(form.text("description"))),
        filename: stored.stored_name.clone(),
        original_name: stored.original_name,
        size: stored.size,
    };

    let pdf = match db::portfolio_pdfs::create(&state.pool, &new_pdf).await {
        Ok(pdf) => pdf,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to insert portfolio PDF row; removing file");
            cleanup_file(&state.portfolio_pdf_store, &stored.stored_name).await;
            return Err(e);
        }
    };

    info!(
        pdf_id = pdf.id,
        order_index = pdf.order_index,
        admin_id = auth.admin_id(),
        "Portfolio PDF added"
    );
    Ok((StatusCode::CREATED, Json(to_dto(&state, pdf))))
}

/// PUT|PATCH /api/portfolio/pdfs/:id — partial update.
pub async fn update_portfolio_pdf(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Path(pdf_id): Path<i64>,
    Json(patch): Json<PortfolioPdfPatch>,
) -> AppResult<Json<PortfolioPdfDto>> {
    if patch.title.as_value().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::Validation("Título é obrigatório".into()));
    }

    let mut pdf = db::portfolio_pdfs::fetch(&state.pool, pdf_id).await?;
    pdf.apply(patch);
    let pdf = db::portfolio_pdfs::update(&state.pool, &pdf).await?;

    Ok(Json(to_dto(&state, pdf)))
}

/// POST /api/portfolio/pdfs/:id/toggle — flip visibility.
pub async fn toggle_portfolio_pdf(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Path(pdf_id): Path<i64>,
) -> AppResult<Json<PortfolioPdfDto>> {
    let pdf = db::portfolio_pdfs::toggle(&state.pool, pdf_id).await?;
    info!(pdf_id, is_active = pdf.is_active, "Portfolio PDF toggled");
    Ok(Json(to_dto(&state, pdf)))
}

/// DELETE /api/portfolio/pdfs/:id — removes the file, then the row.
pub async fn delete_portfolio_pdf(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Path(pdf_id): Path<i64>,
) -> AppResult<Json<Value>> {
    let pdf = db::portfolio_pdfs::fetch(&state.pool, pdf_id).await?;

    state.portfolio_pdf_store.delete(&pdf.filename).await?;
    db::portfolio_pdfs::delete(&state.pool, pdf.id).await?;

    info!(pdf_id = pdf.id, "Portfolio PDF deleted");
    Ok(Json(json!({ "message": "PDF removido com sucesso" })))
}

/// GET /static/uploads/portfolio-pdfs/:filename — public file access.
pub async fn serve_portfolio_pdf(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let data = state.portfolio_pdf_store.read(&filename).await?;
    pdf_response(data, Disposition::Inline)
}
