mod common;

use axum::http::{header, StatusCode};
use common::*;
use serde_json::{json, Value};

async fn add(ctx: &TestContext, token: &str, title: &str) -> Value {
    let (status, body) = post_multipart_authed(
        ctx.app(),
        "/api/portfolio/pdfs",
        token,
        &[pdf_part("pdf", "deck.pdf"), text_part("title", title)],
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "add failed: {body}");
    body
}

fn titles(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// POST /api/portfolio/pdfs
// ============================================================================

#[tokio::test]
async fn add_appends_in_display_order() {
    let ctx = TestContext::new().await;
    let token = ctx.admin_token().await;

    let first = add(&ctx, &token, "One").await;
    let second = add(&ctx, &token, "Two").await;

    assert_eq!(first["order_index"], 1);
    assert_eq!(second["order_index"], 2);
    assert_eq!(first["is_active"], true);
    assert!(first["description"].is_null());

    let filename = first["filename"].as_str().unwrap();
    assert_eq!(
        first["url"],
        format!("/static/uploads/portfolio-pdfs/{filename}")
    );
    assert_eq!(first["original_name"], "deck.pdf");
}

#[tokio::test]
async fn add_requires_title_before_file() {
    let ctx = TestContext::new().await;
    let token = ctx.admin_token().await;

    let (status, body) = post_multipart_authed(
        ctx.app(),
        "/api/portfolio/pdfs",
        &token,
        &[text_part("description", "no title, no file")],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Título é obrigatório");

    let (status, body) = post_multipart_authed(
        ctx.app(),
        "/api/portfolio/pdfs",
        &token,
        &[text_part("title", "Deck")],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Arquivo PDF é obrigatório");
    assert_eq!(ctx.count("portfolio_pdfs").await, 0);
}

#[tokio::test]
async fn add_requires_auth() {
    let ctx = TestContext::new().await;

    let (status, _) = post_multipart_no_auth(
        ctx.app(),
        "/api/portfolio/pdfs",
        &[pdf_part("pdf", "deck.pdf"), text_part("title", "Deck")],
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.count("portfolio_pdfs").await, 0);
}

// ============================================================================
// Listings and visibility
// ============================================================================

#[tokio::test]
async fn toggle_hides_from_public_listing() {
    let ctx = TestContext::new().await;
    let token = ctx.admin_token().await;

    let first = add(&ctx, &token, "One").await;
    add(&ctx, &token, "Two").await;
    let id = first["id"].as_i64().unwrap();

    let (status, body) = post_json_authed(
        ctx.app(),
        &format!("/api/portfolio/pdfs/{id}/toggle"),
        &token,
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], false);

    let (_, public) = get_no_auth(ctx.app(), "/api/portfolio/pdfs").await;
    assert_eq!(titles(&public), vec!["Two"]);

    let (status, all) = get_authed(ctx.app(), "/api/portfolio/pdfs/admin", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&all), vec!["One", "Two"]);

    let (_, body) = post_json_authed(
        ctx.app(),
        &format!("/api/portfolio/pdfs/{id}/toggle"),
        &token,
        json!({}),
    )
    .await;
    assert_eq!(body["is_active"], true);
}

#[tokio::test]
async fn order_index_controls_listing_order() {
    let ctx = TestContext::new().await;
    let token = ctx.admin_token().await;

    let first = add(&ctx, &token, "One").await;
    add(&ctx, &token, "Two").await;
    let id = first["id"].as_i64().unwrap();

    let (status, body) = patch_json_authed(
        ctx.app(),
        &format!("/api/portfolio/pdfs/{id}"),
        &token,
        json!({ "order_index": 10 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order_index"], 10);
    assert_eq!(body["title"], "One");

    let (_, public) = get_no_auth(ctx.app(), "/api/portfolio/pdfs").await;
    assert_eq!(titles(&public), vec!["Two", "One"]);

    let third = add(&ctx, &token, "Three").await;
    assert_eq!(third["order_index"], 11);
}

#[tokio::test]
async fn admin_listing_requires_auth() {
    let ctx = TestContext::new().await;
    let (status, _) = get_no_auth(ctx.app(), "/api/portfolio/pdfs/admin").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Update / delete / serve
// ============================================================================

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let ctx = TestContext::new().await;
    let token = ctx.admin_token().await;
    let pdf = add(&ctx, &token, "Deck").await;
    let id = pdf["id"].as_i64().unwrap();

    let (status, body) = put_json_authed(
        ctx.app(),
        &format!("/api/portfolio/pdfs/{id}"),
        &token,
        json!({ "description": "Slides", "is_active": false }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Deck");
    assert_eq!(body["description"], "Slides");
    assert_eq!(body["is_active"], false);
    assert_eq!(body["order_index"], 1);
}

#[tokio::test]
async fn update_rejects_blank_title() {
    let ctx = TestContext::new().await;
    let token = ctx.admin_token().await;
    let pdf = add(&ctx, &token, "Deck").await;
    let id = pdf["id"].as_i64().unwrap();

    let (status, _) = put_json_authed(
        ctx.app(),
        &format!("/api/portfolio/pdfs/{id}"),
        &token,
        json!({ "title": "" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn toggle_unknown_pdf_returns_404() {
    let ctx = TestContext::new().await;
    let token = ctx.admin_token().await;

    let (status, _) = post_json_authed(
        ctx.app(),
        "/api/portfolio/pdfs/77/toggle",
        &token,
        json!({}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn file_is_served_publicly_at_its_url() {
    let ctx = TestContext::new().await;
    let token = ctx.admin_token().await;
    let pdf = add(&ctx, &token, "Deck").await;

    let url = pdf["url"].as_str().unwrap();
    let (status, headers, bytes) = get_raw(ctx.app(), url, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(bytes, PDF_BYTES);
}

#[tokio::test]
async fn serving_rejects_unknown_and_traversal_names() {
    let ctx = TestContext::new().await;

    let (status, _, _) =
        get_raw(ctx.app(), "/static/uploads/portfolio-pdfs/missing.pdf", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = get_raw(
        ctx.app(),
        "/static/uploads/portfolio-pdfs/..%2F..%2Fsecret.pdf",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_file_and_row() {
    let ctx = TestContext::new().await;
    let token = ctx.admin_token().await;
    let pdf = add(&ctx, &token, "Deck").await;
    let id = pdf["id"].as_i64().unwrap();
    let url = pdf["url"].as_str().unwrap().to_string();

    let (status, _) =
        delete_authed(ctx.app(), &format!("/api/portfolio/pdfs/{id}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ctx.count("portfolio_pdfs").await, 0);

    let (status, _, _) = get_raw(ctx.app(), &url, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
