use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::AppResult;
use crate::models::Admin;

const ADMIN_COLUMNS: &str = "id, username, password_hash, created_at, last_login";

pub async fn any_exists(pool: &SqlitePool) -> AppResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> AppResult<Option<Admin>> {
    let admin = sqlx::query_as::<_, Admin>(&format!(
        "SELECT {ADMIN_COLUMNS} FROM admins WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(admin)
}

pub async fn insert(pool: &SqlitePool, username: &str, password_hash: &str) -> AppResult<Admin> {
    let admin = sqlx::query_as::<_, Admin>(&format!(
        "INSERT INTO admins (username, password_hash, created_at)
         VALUES (?, ?, ?)
         RETURNING {ADMIN_COLUMNS}"
    ))
    .bind(username)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;
    Ok(admin)
}

pub async fn touch_last_login(pool: &SqlitePool, admin_id: i64) -> AppResult<Admin> {
    let admin = sqlx::query_as::<_, Admin>(&format!(
        "UPDATE admins SET last_login = ? WHERE id = ? RETURNING {ADMIN_COLUMNS}"
    ))
    .bind(Utc::now())
    .bind(admin_id)
    .fetch_one(pool)
    .await?;
    Ok(admin)
}

/// Remove every admin and session, then create a single admin. Runs in one
/// transaction so a failure leaves the previous accounts in place.
pub async fn replace_all(pool: &SqlitePool, username: &str, password_hash: &str) -> AppResult<Admin> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM admin_sessions")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM admins").execute(&mut *tx).await?;

    let admin = sqlx::query_as::<_, Admin>(&format!(
        "INSERT INTO admins (username, password_hash, created_at)
         VALUES (?, ?, ?)
         RETURNING {ADMIN_COLUMNS}"
    ))
    .bind(username)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(admin)
}

// ============================================================================
// Sessions
// ============================================================================

pub async fn insert_session(
    pool: &SqlitePool,
    admin_id: i64,
    token_hash: &str,
    expires_at: DateTime<Utc>,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO admin_sessions (admin_id, token_hash, created_at, expires_at)
         VALUES (?, ?, ?, ?)",
    )
    .bind(admin_id)
    .bind(token_hash)
    .bind(Utc::now())
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_session(pool: &SqlitePool, token_hash: &str) -> AppResult<()> {
    sqlx::query("DELETE FROM admin_sessions WHERE token_hash = ?")
        .bind(token_hash)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn purge_expired_sessions(pool: &SqlitePool, now: DateTime<Utc>) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM admin_sessions WHERE expires_at <= ?")
        .bind(now)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Admin owning a live (unexpired) session with this token hash.
pub async fn find_by_session(
    pool: &SqlitePool,
    token_hash: &str,
    now: DateTime<Utc>,
) -> AppResult<Option<Admin>> {
    let admin = sqlx::query_as::<_, Admin>(
        "SELECT a.id, a.username, a.password_hash, a.created_at, a.last_login
         FROM admin_sessions s
         JOIN admins a ON a.id = s.admin_id
         WHERE s.token_hash = ? AND s.expires_at > ?",
    )
    .bind(token_hash)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(admin)
}
