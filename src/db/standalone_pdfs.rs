use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::{NewPdf, StandalonePdf};

const PDF_COLUMNS: &str = "id, title, description, filename, original_name, size, created_at";

pub async fn fetch(pool: &SqlitePool, id: i64) -> AppResult<StandalonePdf> {
    sqlx::query_as::<_, StandalonePdf>(&format!(
        "SELECT {PDF_COLUMNS} FROM standalone_pdfs WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("PDF não encontrado".into()))
}

pub async fn list(pool: &SqlitePool) -> AppResult<Vec<StandalonePdf>> {
    let pdfs = sqlx::query_as::<_, StandalonePdf>(&format!(
        "SELECT {PDF_COLUMNS} FROM standalone_pdfs ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(pdfs)
}

pub async fn create(pool: &SqlitePool, pdf: &NewPdf) -> AppResult<StandalonePdf> {
    let mut tx = pool.begin().await?;

    let created = sqlx::query_as::<_, StandalonePdf>(&format!(
        "INSERT INTO standalone_pdfs (title, description, filename, original_name, size, created_at)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING {PDF_COLUMNS}"
    ))
    .bind(&pdf.title)
    .bind(&pdf.description)
    .bind(&pdf.filename)
    .bind(&pdf.original_name)
    .bind(pdf.size)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(created)
}

pub async fn update_details(
    pool: &SqlitePool,
    id: i64,
    title: &str,
    description: Option<&str>,
) -> AppResult<StandalonePdf> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query_as::<_, StandalonePdf>(&format!(
        "UPDATE standalone_pdfs SET title = ?, description = ?
         WHERE id = ?
         RETURNING {PDF_COLUMNS}"
    ))
    .bind(title)
    .bind(description)
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("PDF não encontrado".into()))?;

    tx.commit().await?;
    Ok(updated)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM standalone_pdfs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("PDF não encontrado".into()));
    }
    Ok(())
}
