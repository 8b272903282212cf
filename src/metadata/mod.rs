//! Best-effort page metadata for portfolio links.
//!
//! [`HttpMetadataExtractor`] fetches a page and reads its Open Graph tags.
//! Extraction is total: network errors, non-2xx responses and unreadable
//! bodies all become a placeholder [`ExtractionResult`] carrying the cause.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use scraper::{Html, Selector};
use url::Url;

use crate::models::ExtractionResult;

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
/// Upper bound on how much of a page is read.
pub const MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const UNTITLED: &str = "Sem título";
pub const NO_DESCRIPTION: &str = "Sem descrição";
pub const LOAD_ERROR_TITLE: &str = "Erro ao carregar";

/// Source of link previews. Never fails.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> ExtractionResult;
}

/// Fetches pages over HTTP with a browser-like User-Agent.
#[derive(Clone)]
pub struct HttpMetadataExtractor {
    client: ReqwestClient,
}

impl HttpMetadataExtractor {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    /// Same as [`new`](Self::new) with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Read at most [`MAX_PAGE_BYTES`] of the body. The metadata lives in
    /// `<head>`, so a truncated page still parses.
    async fn fetch(&self, url: &str) -> Result<String, reqwest::Error> {
        let mut response = self.client.get(url).send().await?.error_for_status()?;

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let room = MAX_PAGE_BYTES - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                tracing::debug!(url = %url, "Page body truncated for metadata extraction");
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[async_trait]
impl MetadataExtractor for HttpMetadataExtractor {
    async fn extract(&self, url: &str) -> ExtractionResult {
        match self.fetch(url).await {
            Ok(html) => extract_from_html(&html, url),
            Err(e) => {
                tracing::warn!(error = ?e, url = %url, "Failed to fetch URL for metadata extraction");
                failure_result(&e)
            }
        }
    }
}

/// Placeholder returned when the page could not be loaded.
pub fn failure_result(cause: &dyn std::fmt::Display) -> ExtractionResult {
    ExtractionResult {
        title: LOAD_ERROR_TITLE.to_string(),
        description: format!("Não foi possível carregar o conteúdo: {cause}"),
        image_url: None,
    }
}

// ── Strategies ─────────────────────────────────────────────────────────────

/// One way of reading a value out of a parsed document.
type Strategy = fn(&Html) -> Option<String>;

const TITLE_STRATEGIES: &[Strategy] = &[og_title, title_tag];
const DESCRIPTION_STRATEGIES: &[Strategy] = &[og_description, meta_description];

/// First strategy that yields a value wins.
fn first_match(doc: &Html, strategies: &[Strategy]) -> Option<String> {
    strategies.iter().find_map(|strategy| strategy(doc))
}

/// Parse `html` (fetched from `base_url`) into an extraction result,
/// substituting placeholders for anything the page does not declare.
pub fn extract_from_html(html: &str, base_url: &str) -> ExtractionResult {
    let document = Html::parse_document(html);

    let title = first_match(&document, TITLE_STRATEGIES).unwrap_or_else(|| UNTITLED.to_string());
    let description = first_match(&document, DESCRIPTION_STRATEGIES)
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());
    let image_url = get_meta_property(&document, "og:image").map(|img| absolutize(&img, base_url));

    ExtractionResult {
        title,
        description,
        image_url,
    }
}

/// Resolve `candidate` against `base_url` unless it already carries a scheme.
/// Left as-is when the base itself cannot be parsed.
pub fn absolutize(candidate: &str, base_url: &str) -> String {
    if Url::parse(candidate).is_ok() {
        return candidate.to_string();
    }
    Url::parse(base_url)
        .and_then(|base| base.join(candidate))
        .map(String::from)
        .unwrap_or_else(|_| candidate.to_string())
}

fn og_title(doc: &Html) -> Option<String> {
    get_meta_property(doc, "og:title")
}

fn og_description(doc: &Html) -> Option<String> {
    get_meta_property(doc, "og:description")
}

fn meta_description(doc: &Html) -> Option<String> {
    get_meta_name(doc, "description")
}

fn title_tag(doc: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    doc.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn get_meta_property(doc: &Html, property: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[property="{property}"]"#)).ok()?;
    meta_content(doc, &selector)
}

fn get_meta_name(doc: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[name="{name}"]"#)).ok()?;
    meta_content(doc, &selector)
}

fn meta_content(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// ── Unit tests ─────────────────────────────────────────────────────────────
