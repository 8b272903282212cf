// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tempfile::TempDir;
use tower::ServiceExt;

use portfolio_admin::{
    auth::{self, AuthAdmin},
    db,
    files::{FileStore, Naming},
    metadata::MetadataExtractor,
    models::ExtractionResult,
    routes::{self, PDF_URL_PREFIX, PORTFOLIO_PDF_URL_PREFIX},
    state::AppState,
};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "password123";

/// Minimal document that `infer` recognises as `application/pdf`.
pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\ntrailer\n<<>>\n%%EOF\n";

/// Fresh in-memory database with migrations applied.
///
/// A single connection that never expires keeps the in-memory database
/// alive for the whole test.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    db::migrate(&pool).await.expect("Failed to run migrations");
    pool
}

// ── Metadata stub ─────────────────────────────────────────────────────────────

/// Extractor returning a fixed result and recording every URL it was asked for.
pub struct StubExtractor {
    pub result: ExtractionResult,
    pub calls: Mutex<Vec<String>>,
}

impl StubExtractor {
    pub fn new(result: ExtractionResult) -> Self {
        StubExtractor {
            result,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataExtractor for StubExtractor {
    async fn extract(&self, url: &str) -> ExtractionResult {
        self.calls.lock().unwrap().push(url.to_string());
        self.result.clone()
    }
}

pub fn default_extraction() -> ExtractionResult {
    ExtractionResult {
        title: "A".into(),
        description: "B".into(),
        image_url: Some("http://x/img.png".into()),
    }
}

// ── Test context ──────────────────────────────────────────────────────────────

/// Database, upload directory and stub extractor for one test.
pub struct TestContext {
    pub pool: SqlitePool,
    pub upload_dir: TempDir,
    pub extractor: Arc<StubExtractor>,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_extraction(default_extraction()).await
    }

    pub async fn with_extraction(result: ExtractionResult) -> Self {
        TestContext {
            pool: test_pool().await,
            upload_dir: tempfile::tempdir().expect("Failed to create upload dir"),
            extractor: Arc::new(StubExtractor::new(result)),
        }
    }

    pub fn state(&self) -> AppState {
        AppState {
            pool: self.pool.clone(),
            extractor: self.extractor.clone(),
            pdf_store: FileStore::new(
                self.upload_dir.path().join("pdfs"),
                PDF_URL_PREFIX,
                Naming::Timestamped,
            ),
            portfolio_pdf_store: FileStore::new(
                self.upload_dir.path().join("portfolio-pdfs"),
                PORTFOLIO_PDF_URL_PREFIX,
                Naming::RandomToken,
            ),
            session_ttl: Duration::hours(1),
        }
    }

    /// Build the full application router.
    pub fn app(&self) -> Router {
        routes::app(self.state())
    }

    /// Seed the default admin and log in through the API.
    pub async fn admin_token(&self) -> String {
        seed_admin(&self.pool, ADMIN_USERNAME, ADMIN_PASSWORD).await;
        login_and_get_token(self.app(), ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    /// Seed the default admin and pass the auth gate directly.
    pub async fn admin_gate(&self) -> AuthAdmin {
        let token = self.admin_token().await;
        auth::authenticate(&self.pool, &token)
            .await
            .expect("fresh session should authenticate")
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

/// Insert an admin directly. A low bcrypt cost keeps the suite fast.
pub async fn seed_admin(pool: &SqlitePool, username: &str, password: &str) {
    let hash = bcrypt::hash(password, 4).unwrap();
    db::admins::insert(pool, username, &hash)
        .await
        .expect("setup seed_admin failed");
}

pub async fn login_and_get_token(app: Router, username: &str, password: &str) -> String {
    let (status, body) = post_json(
        app,
        "/api/auth/login",
        serde_json::json!({ "username": username, "password": password }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "setup login failed: {body}");
    body["token"].as_str().unwrap().to_owned()
}

// ── Request helpers ──────────────────────────────────────────────────────────

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn post_json_authed(
    app: Router,
    uri: &str,
    token: &str,
    body: Value,
) -> (StatusCode, Value) {
    json_authed(app, Method::POST, uri, token, body).await
}

pub async fn put_json_authed(
    app: Router,
    uri: &str,
    token: &str,
    body: Value,
) -> (StatusCode, Value) {
    json_authed(app, Method::PUT, uri, token, body).await
}

pub async fn patch_json_authed(
    app: Router,
    uri: &str,
    token: &str,
    body: Value,
) -> (StatusCode, Value) {
    json_authed(app, Method::PATCH, uri, token, body).await
}

async fn json_authed(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    body: Value,
) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn get_authed(app: Router, uri: &str, token: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

pub async fn get_no_auth(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

pub async fn delete_authed(app: Router, uri: &str, token: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

pub async fn delete_no_auth(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

/// GET returning raw bytes and headers, for file downloads.
pub async fn get_raw(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, bytes.to_vec())
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

// ── Multipart helpers ─────────────────────────────────────────────────────────

/// A single part of a multipart upload.
pub enum Part<'a> {
    File {
        field_name: &'a str,
        filename: &'a str,
        data: &'a [u8],
    },
    Text {
        field_name: &'a str,
        value: &'a str,
    },
}

pub fn pdf_part<'a>(field_name: &'a str, filename: &'a str) -> Part<'a> {
    Part::File {
        field_name,
        filename,
        data: PDF_BYTES,
    }
}

pub fn text_part<'a>(field_name: &'a str, value: &'a str) -> Part<'a> {
    Part::Text { field_name, value }
}

/// Build a `multipart/form-data` body from the provided parts.
///
/// Returns `(body_bytes, content_type_header_value)` where the content-type
/// includes the boundary parameter.
pub fn build_multipart(parts: &[Part<'_>]) -> (Vec<u8>, String) {
    let boundary = "----PortfolioTestBoundary1234567890";
    let mut body: Vec<u8> = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match part {
            Part::File {
                field_name,
                filename,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{filename}\"\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
                body.extend_from_slice(data);
            }
            Part::Text { field_name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{field_name}\"\r\n\r\n")
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    let content_type = format!("multipart/form-data; boundary={boundary}");
    (body, content_type)
}

pub async fn post_multipart_authed(
    app: Router,
    uri: &str,
    token: &str,
    parts: &[Part<'_>],
) -> (StatusCode, Value) {
    let (body_bytes, content_type) = build_multipart(parts);
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body_bytes))
        .unwrap();
    send(app, req).await
}

pub async fn post_multipart_no_auth(
    app: Router,
    uri: &str,
    parts: &[Part<'_>],
) -> (StatusCode, Value) {
    let (body_bytes, content_type) = build_multipart(parts);
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body_bytes))
        .unwrap();
    send(app, req).await
}
