use axum::{async_trait, extract::FromRequestParts, http::request::Parts, RequestPartsExt};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

use crate::{
    db,
    error::{AppError, AppResult},
    models::Admin,
    state::AppState,
};

// ============================================================================
// Session tokens
// ============================================================================

/// Number of random bytes in a session token (before base64url encoding).
const TOKEN_BYTES: usize = 32;

/// Generate an opaque session token.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 of a session token, hex-encoded. Only the hash is stored, and
/// being deterministic it can be looked up directly.
pub fn hash_session_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Open a session for `admin` and return the raw token handed to the client.
pub async fn open_session(pool: &SqlitePool, admin: &Admin, ttl: Duration) -> AppResult<String> {
    let token = generate_session_token();
    let expires_at = Utc::now() + ttl;
    db::admins::insert_session(pool, admin.id, &hash_session_token(&token), expires_at).await?;
    Ok(token)
}

pub async fn close_session(pool: &SqlitePool, token: &str) -> AppResult<()> {
    db::admins::delete_session(pool, &hash_session_token(token)).await
}

// ============================================================================
// Password Hashing
// ============================================================================

pub fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, 12).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        AppError::Internal
    })
}

pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    bcrypt::verify(password, hash).map_err(|e| {
        tracing::error!("Failed to verify password: {:?}", e);
        AppError::Internal
    })
}

// ============================================================================
// Auth Gate
// ============================================================================

/// Proof that the caller holds a valid admin session.
///
/// Only [`authenticate`] constructs one, so any operation taking
/// `&AuthAdmin` cannot run without the gate having passed.
#[derive(Debug, Clone)]
pub struct AuthAdmin {
    admin: Admin,
}

impl AuthAdmin {
    pub fn admin_id(&self) -> i64 {
        self.admin.id
    }

    pub fn username(&self) -> &str {
        &self.admin.username
    }

    pub fn admin(&self) -> &Admin {
        &self.admin
    }
}

fn login_required() -> AppError {
    AppError::Auth("Login necessário".into())
}

/// Resolve a session token to its admin. Unknown and expired tokens are
/// rejected alike.
pub async fn authenticate(pool: &SqlitePool, token: &str) -> AppResult<AuthAdmin> {
    let admin = db::admins::find_by_session(pool, &hash_session_token(token), Utc::now())
        .await?
        .ok_or_else(login_required)?;
    Ok(AuthAdmin { admin })
}

pub async fn is_authenticated(pool: &SqlitePool, token: &str) -> bool {
    authenticate(pool, token).await.is_ok()
}

#[async_trait]
impl FromRequestParts<AppState> for AuthAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| login_required())?;

        authenticate(&state.pool, bearer.token()).await.map_err(|e| {
            tracing::debug!(error = %e, "Session validation failed");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_and_url_safe() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_ne!(a, b);
        // 32 bytes → 43 base64 characters without padding
        assert_eq!(a.len(), 43);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn token_hash_is_deterministic_hex() {
        let hash = hash_session_token("abc");
        assert_eq!(hash, hash_session_token("abc"));
        assert_ne!(hash, hash_session_token("abd"));
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn password_round_trip() {
        let hash = bcrypt::hash("s3cret", 4).unwrap();
        assert!(verify_password("s3cret", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }
}
