//! Portfolio link lifecycle: creation with scraped metadata, partial
//! updates, deletion, and the public/admin listings.

use sqlx::SqlitePool;
use tracing::info;

use crate::{
    auth::AuthAdmin,
    db::{self, Visibility},
    error::{AppError, AppResult},
    metadata::MetadataExtractor,
    models::{CreateLinkDto, ExtractionResult, LinkPatch, NewLink, PortfolioLink},
    state::AppState,
};

pub struct LinkManager<'a> {
    pool: &'a SqlitePool,
    extractor: &'a dyn MetadataExtractor,
}

impl<'a> LinkManager<'a> {
    pub fn new(pool: &'a SqlitePool, extractor: &'a dyn MetadataExtractor) -> Self {
        LinkManager { pool, extractor }
    }

    pub fn from_state(state: &'a AppState) -> Self {
        LinkManager::new(&state.pool, state.extractor.as_ref())
    }

    /// Create a link from `input`, filling empty fields from the page itself.
    pub async fn create(&self, admin: &AuthAdmin, input: CreateLinkDto) -> AppResult<PortfolioLink> {
        let url = non_blank(input.url)
            .ok_or_else(|| AppError::Validation("URL é obrigatória".into()))?;

        let extracted = self.extractor.extract(&url).await;
        let link = merge(
            url,
            input.title,
            input.description,
            input.image_url,
            input.pdf_url,
            extracted,
        );

        let created = db::links::create(self.pool, &link).await?;
        info!(
            link_id = created.id,
            url = %created.url,
            admin = admin.username(),
            "Portfolio link created"
        );
        Ok(created)
    }

    /// Apply the fields present in `patch`. Changing `url` does not
    /// re-extract metadata; the stored title, description and image stay.
    pub async fn update(
        &self,
        admin: &AuthAdmin,
        id: i64,
        patch: LinkPatch,
    ) -> AppResult<PortfolioLink> {
        validate_patch(&patch)?;

        let mut link = db::links::fetch(self.pool, id).await?;
        link.apply(patch);
        link.title = link.title.trim().to_string();
        link.url = link.url.trim().to_string();

        let updated = db::links::update(self.pool, &link).await?;
        info!(link_id = id, admin = admin.username(), "Portfolio link updated");
        Ok(updated)
    }

    /// Hard delete.
    pub async fn delete(&self, admin: &AuthAdmin, id: i64) -> AppResult<()> {
        db::links::delete(self.pool, id).await?;
        info!(link_id = id, admin = admin.username(), "Portfolio link deleted");
        Ok(())
    }

    pub async fn list_public(&self) -> AppResult<Vec<PortfolioLink>> {
        db::links::list(self.pool, Visibility::ActiveOnly).await
    }

    pub async fn list_all(&self, _admin: &AuthAdmin) -> AppResult<Vec<PortfolioLink>> {
        db::links::list(self.pool, Visibility::All).await
    }
}

/// Caller-supplied fields win over extracted ones; blank counts as absent.
fn merge(
    url: String,
    title: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    pdf_url: Option<String>,
    extracted: ExtractionResult,
) -> NewLink {
    NewLink {
        title: non_blank(title).unwrap_or(extracted.title),
        url,
        description: non_blank(description).unwrap_or(extracted.description),
        image_url: non_blank(image_url).or(extracted.image_url),
        pdf_url,
    }
}

fn validate_patch(patch: &LinkPatch) -> AppResult<()> {
    if patch.title.as_value().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::Validation("Título é obrigatório".into()));
    }
    if patch.url.as_value().is_some_and(|u| u.trim().is_empty()) {
        return Err(AppError::Validation("URL é obrigatória".into()));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
