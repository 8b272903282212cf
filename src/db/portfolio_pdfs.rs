use chrono::Utc;
use sqlx::SqlitePool;

use super::Visibility;
use crate::error::{AppError, AppResult};
use crate::models::{NewPdf, PortfolioPdf};

const PDF_COLUMNS: &str =
    "id, title, description, filename, original_name, size, created_at, is_active, order_index";

pub async fn fetch(pool: &SqlitePool, id: i64) -> AppResult<PortfolioPdf> {
    sqlx::query_as::<_, PortfolioPdf>(&format!(
        "SELECT {PDF_COLUMNS} FROM portfolio_pdfs WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("PDF não encontrado".into()))
}

/// Manual order first, then newest first.
pub async fn list(pool: &SqlitePool, visibility: Visibility) -> AppResult<Vec<PortfolioPdf>> {
    let filter = match visibility {
        Visibility::ActiveOnly => "WHERE is_active = 1",
        Visibility::All => "",
    };
    let pdfs = sqlx::query_as::<_, PortfolioPdf>(&format!(
        "SELECT {PDF_COLUMNS} FROM portfolio_pdfs {filter}
         ORDER BY order_index ASC, created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(pdfs)
}

/// Insert at the end of the manual ordering. The next `order_index` is read
/// inside the same transaction as the insert.
pub async fn create(pool: &SqlitePool, pdf: &NewPdf) -> AppResult<PortfolioPdf> {
    let mut tx = pool.begin().await?;

    let max_order: Option<i64> = sqlx::query_scalar("SELECT MAX(order_index) FROM portfolio_pdfs")
        .fetch_one(&mut *tx)
        .await?;

    let created = sqlx::query_as::<_, PortfolioPdf>(&format!(
        "INSERT INTO portfolio_pdfs
             (title, description, filename, original_name, size, created_at, is_active, order_index)
         VALUES (?, ?, ?, ?, ?, ?, 1, ?)
         RETURNING {PDF_COLUMNS}"
    ))
    .bind(&pdf.title)
    .bind(&pdf.description)
    .bind(&pdf.filename)
    .bind(&pdf.original_name)
    .bind(pdf.size)
    .bind(Utc::now())
    .bind(max_order.unwrap_or(0) + 1)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(created)
}

pub async fn update(pool: &SqlitePool, pdf: &PortfolioPdf) -> AppResult<PortfolioPdf> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query_as::<_, PortfolioPdf>(&format!(
        "UPDATE portfolio_pdfs
         SET title = ?, description = ?, is_active = ?, order_index = ?
         WHERE id = ?
         RETURNING {PDF_COLUMNS}"
    ))
    .bind(&pdf.title)
    .bind(&pdf.description)
    .bind(pdf.is_active)
    .bind(pdf.order_index)
    .bind(pdf.id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("PDF não encontrado".into()))?;

    tx.commit().await?;
    Ok(updated)
}

/// Flip `is_active` in place.
pub async fn toggle(pool: &SqlitePool, id: i64) -> AppResult<PortfolioPdf> {
    sqlx::query_as::<_, PortfolioPdf>(&format!(
        "UPDATE portfolio_pdfs SET is_active = NOT is_active
         WHERE id = ?
         RETURNING {PDF_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("PDF não encontrado".into()))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM portfolio_pdfs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("PDF não encontrado".into()));
    }
    Ok(())
}
