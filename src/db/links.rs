use chrono::Utc;
use sqlx::SqlitePool;

use super::Visibility;
use crate::error::{AppError, AppResult};
use crate::models::{NewLink, PortfolioLink};

const LINK_COLUMNS: &str =
    "id, title, url, description, image_url, pdf_url, is_active, created_at";

pub async fn get(pool: &SqlitePool, id: i64) -> AppResult<Option<PortfolioLink>> {
    let link = sqlx::query_as::<_, PortfolioLink>(&format!(
        "SELECT {LINK_COLUMNS} FROM portfolio_links WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(link)
}

/// Fetch a link, returning 404 if it does not exist.
pub async fn fetch(pool: &SqlitePool, id: i64) -> AppResult<PortfolioLink> {
    get(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Link não encontrado".into()))
}

/// Newest first; ties broken by id so equal timestamps stay stable.
pub async fn list(pool: &SqlitePool, visibility: Visibility) -> AppResult<Vec<PortfolioLink>> {
    let filter = match visibility {
        Visibility::ActiveOnly => "WHERE is_active = 1",
        Visibility::All => "",
    };
    let links = sqlx::query_as::<_, PortfolioLink>(&format!(
        "SELECT {LINK_COLUMNS} FROM portfolio_links {filter}
         ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(links)
}

pub async fn create(pool: &SqlitePool, link: &NewLink) -> AppResult<PortfolioLink> {
    let mut tx = pool.begin().await?;

    let created = sqlx::query_as::<_, PortfolioLink>(&format!(
        "INSERT INTO portfolio_links (title, url, description, image_url, pdf_url, is_active, created_at)
         VALUES (?, ?, ?, ?, ?, 1, ?)
         RETURNING {LINK_COLUMNS}"
    ))
    .bind(&link.title)
    .bind(&link.url)
    .bind(&link.description)
    .bind(&link.image_url)
    .bind(&link.pdf_url)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(created)
}

/// Write every mutable column of `link` back to its row.
pub async fn update(pool: &SqlitePool, link: &PortfolioLink) -> AppResult<PortfolioLink> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query_as::<_, PortfolioLink>(&format!(
        "UPDATE portfolio_links
         SET title = ?, url = ?, description = ?, image_url = ?, pdf_url = ?, is_active = ?
         WHERE id = ?
         RETURNING {LINK_COLUMNS}"
    ))
    .bind(&link.title)
    .bind(&link.url)
    .bind(&link.description)
    .bind(&link.image_url)
    .bind(&link.pdf_url)
    .bind(link.is_active)
    .bind(link.id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Link não encontrado".into()))?;

    tx.commit().await?;
    Ok(updated)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM portfolio_links WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Link não encontrado".into()));
    }

    tx.commit().await?;
    Ok(())
}
