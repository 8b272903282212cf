use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Persistence error: {0}")]
    Persistence(sqlx::Error),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error")]
    Internal,
}

/// Map sqlx errors to AppError. Unique-constraint violations surface as
/// 409 Conflict; everything else is a persistence failure whose message is
/// passed through to the caller.
impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                let message = match db_err.message() {
                    m if m.contains("admins.username") => "Usuário já existe",
                    m if m.contains("filename") => "Arquivo já registrado",
                    _ => "Registro já existe",
                };
                return AppError::Conflict(message.into());
            }
        }
        AppError::Persistence(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message): (StatusCode, String) = match self {
            AppError::Persistence(e) => {
                tracing::error!("Persistence error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Io(e) => {
                tracing::error!("I/O error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Erro ao salvar arquivo: {e}"),
                )
            }
            AppError::Internal => {
                tracing::error!("Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
