//! On-disk storage for uploaded PDFs.
//!
//! Each [`FileStore`] owns one directory. Files are admitted only when they
//! carry a `.pdf` name, look like a PDF by magic bytes and fit in 16 MiB;
//! stored names are generated so concurrent uploads never collide.

use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Maximum upload size in bytes (16 MiB).
pub const MAX_FILE_SIZE: usize = 16 * 1024 * 1024;

/// Body limit for upload routes: file plus multipart framing and form fields.
pub const MAX_UPLOAD_BODY: usize = MAX_FILE_SIZE + 65_536;

/// Rejection message for anything over [`MAX_FILE_SIZE`].
pub const FILE_TOO_LARGE: &str = "Arquivo muito grande. Máximo 16MB";

const PDF_MIME: &str = "application/pdf";

/// How stored file names are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Naming {
    /// `YYYYMMDD_HHMMSS_<8 hex>_<sanitized stem>.pdf`
    Timestamped,
    /// `<32 hex>.pdf`
    RandomToken,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    url_prefix: String,
    naming: Naming,
}

/// Outcome of a successful save.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub stored_name: String,
    pub original_name: String,
    pub size: i64,
}

/// Directory listing entry.
#[derive(Debug, Clone, Serialize)]
pub struct FileInfo {
    pub filename: String,
    pub url: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>, naming: Naming) -> Self {
        FileStore {
            root: root.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
            naming,
        }
    }

    pub async fn ensure_dir(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            tracing::error!(error = ?e, path = ?self.root, "Failed to create upload directory");
            AppError::Io(e)
        })
    }

    /// Admission policy, checked before anything touches disk.
    pub fn admit(&self, original_name: &str, data: &[u8]) -> AppResult<()> {
        if original_name.trim().is_empty() {
            return Err(AppError::Validation("Nenhum arquivo selecionado".into()));
        }
        if !has_pdf_extension(original_name) {
            return Err(AppError::Validation(
                "Apenas arquivos PDF são permitidos".into(),
            ));
        }
        if data.len() > MAX_FILE_SIZE {
            return Err(AppError::Validation(FILE_TOO_LARGE.into()));
        }
        // Detect the type from magic bytes so a renamed file is refused.
        let detected = infer::get(data).map(|t| t.mime_type());
        if detected != Some(PDF_MIME) {
            return Err(AppError::Validation(
                "Apenas arquivos PDF são permitidos".into(),
            ));
        }
        Ok(())
    }

    /// Admit and write `data`, returning the generated stored name.
    pub async fn save(&self, data: &[u8], suggested_name: &str) -> AppResult<StoredFile> {
        self.admit(suggested_name, data)?;
        self.ensure_dir().await?;

        let stored_name = self.generate_name(suggested_name);
        let path = self.root.join(&stored_name);
        tokio::fs::write(&path, data).await.map_err(|e| {
            tracing::error!(error = ?e, path = ?path, "Failed to write uploaded file");
            AppError::Io(e)
        })?;

        tracing::info!(stored_name = %stored_name, size = data.len(), "Stored PDF");

        Ok(StoredFile {
            stored_name,
            original_name: sanitize_filename(suggested_name),
            size: data.len() as i64,
        })
    }

    /// Remove a stored file. A file that is already gone is not an error.
    pub async fn delete(&self, stored_name: &str) -> AppResult<()> {
        let path = self.path_for(stored_name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                tracing::error!(error = ?e, path = ?path, "Failed to remove stored file");
                Err(AppError::Io(e))
            }
        }
    }

    pub async fn exists(&self, stored_name: &str) -> bool {
        match self.path_for(stored_name) {
            Ok(path) => tokio::fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    pub fn url_for(&self, stored_name: &str) -> String {
        format!("{}/{}", self.url_prefix, stored_name)
    }

    pub async fn read(&self, stored_name: &str) -> AppResult<Vec<u8>> {
        let path = self.path_for(stored_name)?;
        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound("Arquivo não encontrado".into())
            } else {
                tracing::error!(error = ?e, path = ?path, "Failed to read stored file");
                AppError::Io(e)
            }
        })
    }

    /// PDF files in the directory, newest first.
    pub async fn list(&self) -> AppResult<Vec<FileInfo>> {
        self.ensure_dir().await?;

        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let filename = entry.file_name().to_string_lossy().into_owned();
            if !has_pdf_extension(&filename) {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let created = metadata.created().or_else(|_| metadata.modified())?;
            files.push(FileInfo {
                url: self.url_for(&filename),
                filename,
                size: metadata.len(),
                created_at: DateTime::<Utc>::from(created),
            });
        }

        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    /// Resolve a stored name to a path inside the store. Names that could
    /// escape the directory are reported as not found.
    fn path_for(&self, stored_name: &str) -> AppResult<PathBuf> {
        if !is_safe_name(stored_name) {
            return Err(AppError::NotFound("Arquivo não encontrado".into()));
        }
        Ok(self.root.join(stored_name))
    }

    fn generate_name(&self, suggested_name: &str) -> String {
        match self.naming {
            Naming::Timestamped => {
                let timestamp = Local::now().format("%Y%m%d_%H%M%S");
                let token = Uuid::new_v4().simple().to_string();
                let sanitized = sanitize_filename(suggested_name);
                let stem = sanitized
                    .rsplit_once('.')
                    .map(|(stem, _)| stem)
                    .filter(|stem| !stem.is_empty())
                    .unwrap_or("file");
                format!("{timestamp}_{}_{stem}.pdf", &token[..8])
            }
            Naming::RandomToken => format!("{}.pdf", Uuid::new_v4().simple()),
        }
    }
}

fn has_pdf_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
        && !name.starts_with('.')
}

/// Replace any character that is not ASCII alphanumeric, dot, underscore, or
/// hyphen with an underscore, collapse runs of dots, drop leading dots, and
/// cap the result at 128 characters.
pub fn sanitize_filename(name: &str) -> String {
    let mut mapped: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    while mapped.contains("..") {
        mapped = mapped.replace("..", ".");
    }
    let sanitized: String = mapped.trim_start_matches('.').chars().take(128).collect();

    if sanitized.is_empty() {
        "file".to_string()
    } else {
        sanitized
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
