use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use validator::Validate;

use crate::{
    auth::{authenticate, close_session, hash_password, open_session, verify_password},
    db,
    error::{AppError, AppResult},
    models::AdminDto,
    state::AppState,
};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CredentialsRequest {
    #[validate(length(min = 1, max = 80))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl CredentialsRequest {
    fn validated(self) -> AppResult<Self> {
        let username = self.username.trim().to_string();
        let req = CredentialsRequest {
            username,
            password: self.password,
        };
        req.validate()
            .map_err(|_| AppError::Validation("Usuário e senha são obrigatórios".into()))?;
        Ok(req)
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub admin: AdminDto,
}

type BearerHeader = TypedHeader<Authorization<Bearer>>;

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> AppResult<Json<LoginResponse>> {
    let req = req.validated()?;

    info!("Login attempt for admin: {}", req.username);

    let admin = db::admins::find_by_username(&state.pool, &req.username)
        .await?
        .ok_or_else(|| AppError::Auth("Usuário ou senha incorretos".into()))?;

    if !verify_password(&req.password, &admin.password_hash)? {
        return Err(AppError::Auth("Usuário ou senha incorretos".into()));
    }

    let purged = db::admins::purge_expired_sessions(&state.pool, Utc::now()).await?;
    if purged > 0 {
        tracing::debug!(purged, "Removed expired admin sessions");
    }

    let token = open_session(&state.pool, &admin, state.session_ttl).await?;
    let admin = db::admins::touch_last_login(&state.pool, admin.id).await?;

    info!("Login successful: {} ({})", admin.username, admin.id);

    Ok(Json(LoginResponse {
        message: "Login realizado com sucesso".into(),
        token,
        admin: admin.into(),
    }))
}

/// POST /api/auth/logout — ends the presented session, if any.
pub async fn logout(
    State(state): State<AppState>,
    bearer: Option<BearerHeader>,
) -> AppResult<Json<Value>> {
    if let Some(TypedHeader(Authorization(bearer))) = bearer {
        close_session(&state.pool, bearer.token()).await?;
    }
    Ok(Json(json!({ "message": "Logout realizado com sucesso" })))
}

/// GET /api/auth/check
pub async fn check(
    State(state): State<AppState>,
    bearer: Option<BearerHeader>,
) -> AppResult<impl IntoResponse> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "authenticated": false })),
        ));
    };

    match authenticate(&state.pool, bearer.token()).await {
        Ok(auth) => Ok((
            StatusCode::OK,
            Json(json!({
                "authenticated": true,
                "admin": AdminDto::from(auth.admin().clone()),
            })),
        )),
        Err(AppError::Auth(_)) => Ok((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "authenticated": false })),
        )),
        Err(e) => Err(e),
    }
}

/// POST /api/auth/create-admin — initial setup only; refused once any
/// administrator exists.
pub async fn create_admin(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let req = req.validated()?;

    if db::admins::any_exists(&state.pool).await? {
        return Err(AppError::Validation("Administrador já existe".into()));
    }

    let password_hash = hash_password(&req.password)?;
    let admin = db::admins::insert(&state.pool, &req.username, &password_hash).await?;

    info!("Admin created: {} ({})", admin.username, admin.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Administrador criado com sucesso",
            "admin": AdminDto::from(admin),
        })),
    ))
}
