mod extraction;

pub use extraction::ExtractionResult;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

// ============================================================================
// Partial updates
// ============================================================================

/// One field of a partial update: either left untouched or set to a value.
///
/// Deserializes from any JSON value accepted by `T`; a key missing from the
/// request body stays `Unset` when the containing struct uses
/// `#[serde(default)]`. For nullable columns use `Patch<Option<T>>`, where an
/// explicit `null` becomes `Value(None)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Unset,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unset
    }
}

impl<T> Patch<T> {
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            Patch::Unset => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Patch::Value(v) => Patch::Value(f(v)),
            Patch::Unset => Patch::Unset,
        }
    }

    /// Overwrite `target` when set; leave it alone otherwise.
    pub fn apply_to(self, target: &mut T) {
        if let Patch::Value(v) = self {
            *target = v;
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Patch::Value)
    }
}

// ============================================================================
// Admin Models
// ============================================================================

/// Internal database row. Not serializable — use AdminDto for API responses
/// to avoid accidentally exposing password_hash.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct AdminDto {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<Admin> for AdminDto {
    fn from(admin: Admin) -> Self {
        AdminDto {
            id: admin.id,
            username: admin.username,
            created_at: admin.created_at,
            last_login: admin.last_login,
        }
    }
}

// ============================================================================
// Portfolio Link Models
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PortfolioLink {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: String,
    pub image_url: Option<String>,
    pub pdf_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new link. Any of title, description and
/// image_url left empty is filled from the extracted page metadata.
#[derive(Debug, Default, Deserialize)]
pub struct CreateLinkDto {
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub pdf_url: Option<String>,
}

/// Fully resolved link ready for insertion.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub title: String,
    pub url: String,
    pub description: String,
    pub image_url: Option<String>,
    pub pdf_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LinkPatch {
    pub title: Patch<String>,
    pub url: Patch<String>,
    pub description: Patch<String>,
    pub image_url: Patch<Option<String>>,
    pub pdf_url: Patch<Option<String>>,
    pub is_active: Patch<bool>,
}

impl PortfolioLink {
    /// Apply only the fields present in `patch`. The stored preview metadata
    /// is not refreshed when `url` changes.
    pub fn apply(&mut self, patch: LinkPatch) {
        patch.title.apply_to(&mut self.title);
        patch.url.apply_to(&mut self.url);
        patch.description.apply_to(&mut self.description);
        patch.image_url.apply_to(&mut self.image_url);
        patch.pdf_url.apply_to(&mut self.pdf_url);
        patch.is_active.apply_to(&mut self.is_active);
    }
}

// ============================================================================
// Standalone PDF Models
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StandalonePdf {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub filename: String,
    pub original_name: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPdf {
    pub title: String,
    pub description: Option<String>,
    pub filename: String,
    pub original_name: String,
    pub size: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateStandalonePdfDto {
    pub title: String,
    pub description: Option<String>,
}

// ============================================================================
// Portfolio PDF Models
// ============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct PortfolioPdf {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub filename: String,
    pub original_name: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    pub order_index: i64,
}

/// Portfolio PDF as returned by the API, with its public file URL.
#[derive(Debug, Serialize)]
pub struct PortfolioPdfDto {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub filename: String,
    pub original_name: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    pub order_index: i64,
    pub url: String,
}

impl PortfolioPdfDto {
    pub fn new(pdf: PortfolioPdf, url: String) -> Self {
        PortfolioPdfDto {
            id: pdf.id,
            title: pdf.title,
            description: pdf.description,
            filename: pdf.filename,
            original_name: pdf.original_name,
            size: pdf.size,
            created_at: pdf.created_at,
            is_active: pdf.is_active,
            order_index: pdf.order_index,
            url,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PortfolioPdfPatch {
    pub title: Patch<String>,
    pub description: Patch<Option<String>>,
    pub is_active: Patch<bool>,
    pub order_index: Patch<i64>,
}

impl PortfolioPdf {
    pub fn apply(&mut self, patch: PortfolioPdfPatch) {
        patch.title.map(|t| t.trim().to_string()).apply_to(&mut self.title);
        patch
            .description
            .map(normalize_description)
            .apply_to(&mut self.description);
        patch.is_active.apply_to(&mut self.is_active);
        patch.order_index.apply_to(&mut self.order_index);
    }
}

/// Trim a free-text description, storing blank input as NULL.
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
