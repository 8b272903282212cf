use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart},
    http::{header, StatusCode},
    response::Response,
};
use bytes::Bytes;
use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::files::FILE_TOO_LARGE;

/// A multipart upload read fully into memory: one file field plus any
/// plain text fields.
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

impl UploadForm {
    /// Trimmed value of a text field, empty when absent.
    pub fn text(&self, name: &str) -> String {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }
}

/// Read every field of `multipart`, keeping the first file found under
/// `file_field`. Other file fields are ignored.
pub async fn read_upload_form(mut multipart: Multipart, file_field: &str) -> AppResult<UploadForm> {
    let mut file = None;
    let mut fields = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Dados multipart inválidos"))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == file_field {
            let filename = field.file_name().unwrap_or("").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| multipart_error(e, "Falha ao ler o arquivo enviado"))?;
            if file.is_none() {
                file = Some(UploadedFile { filename, data });
            }
        } else if field.file_name().is_none() {
            let value = field
                .text()
                .await
                .map_err(|e| multipart_error(e, "Dados multipart inválidos"))?;
            fields.insert(name, value);
        }
    }

    Ok(UploadForm { file, fields })
}

/// A body cut off by the upload limit reports the size rule; any other
/// multipart failure becomes `message`.
fn multipart_error(e: MultipartError, message: &str) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(error = %e, "Upload exceeded the body limit");
        return AppError::Validation(FILE_TOO_LARGE.into());
    }
    tracing::warn!(error = ?e, "Failed to read multipart upload");
    AppError::Validation(message.into())
}

/// How a served PDF should be presented by the browser.
pub enum Disposition<'a> {
    Inline,
    Attachment(&'a str),
}

/// Build a PDF response from bytes already read from a file store.
pub fn pdf_response(data: Vec<u8>, disposition: Disposition<'_>) -> AppResult<Response> {
    let disposition = match disposition {
        Disposition::Inline => "inline".to_string(),
        Disposition::Attachment(name) => {
            format!("attachment; filename=\"{}\"", name.replace('"', ""))
        }
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(data))
        .map_err(|_| AppError::Internal)
}
