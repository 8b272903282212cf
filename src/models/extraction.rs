use serde::{Deserialize, Serialize};

/// Best-effort page metadata produced by the metadata extractor.
///
/// Always fully populated: `title` and `description` fall back to
/// placeholder text, only `image_url` may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
}
