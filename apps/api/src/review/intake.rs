//! Document Intake: reads a multipart submission and captures the `DocumentPayload`.
//!
//! Any failure here is fatal for the submission: no model call is made.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::DocumentMode;
use crate::errors::AppError;
use crate::models::document::{DocumentPayload, DocumentSummary, PDF_MIME};

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("No document was uploaded")]
    MissingFile,

    #[error("The uploaded document is empty")]
    EmptyFile,

    #[error("The uploaded document is {size} bytes; the limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("The request exceeds the {limit} byte upload limit")]
    RequestTooLarge { limit: usize },

    #[error("Unsupported document type '{0}'; upload a PDF")]
    UnsupportedType(String),

    #[error("The uploaded file is not a readable PDF")]
    NotAPdf,

    #[error("Could not extract text from the PDF: {0}")]
    Extraction(String),

    #[error("The PDF contains no extractable text")]
    NoText,
}

/// The uploaded file as received.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl Upload {
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary::new(self.file_name.clone(), self.data.len())
    }
}

/// All fields of one submission form.
#[derive(Debug, Default)]
pub struct Submission {
    pub upload: Option<Upload>,
    pub problem_statement: String,
    pub reviewer_mode: bool,
    pub session_id: Option<Uuid>,
}

/// Reads the multipart form. Unknown fields are ignored.
///
/// # Fields
/// - `file`: the PDF (required later by `validate_upload`)
/// - `problem_statement`: free text, may be empty
/// - `reviewer_mode`: `true` / `1` / `on` / `yes` for mentor framing
/// - `session_id`: client-chosen UUID, lets the caller poll progress
///
/// A body cut off by the request size limit is reported against `max_bytes`.
pub async fn read_submission(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<Submission, AppError> {
    let mut submission = Submission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        let field_name = field.name().map(|n| n.to_string());
        match field_name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().map(|n| n.to_string());
                let content_type = field.content_type().map(|c| c.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, max_bytes))?;
                submission.upload = Some(Upload {
                    file_name,
                    content_type,
                    data,
                });
            }
            Some("problem_statement") => {
                submission.problem_statement = read_text(field, max_bytes).await?;
            }
            Some("reviewer_mode") => {
                submission.reviewer_mode = parse_flag(&read_text(field, max_bytes).await?);
            }
            Some("session_id") => {
                let raw = read_text(field, max_bytes).await?;
                if !raw.trim().is_empty() {
                    let id = Uuid::parse_str(raw.trim()).map_err(|_| {
                        AppError::Validation(format!("session_id '{raw}' is not a valid UUID"))
                    })?;
                    submission.session_id = Some(id);
                }
            }
            _ => {}
        }
    }

    Ok(submission)
}

async fn read_text(field: Field<'_>, max_bytes: usize) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| multipart_error(e, max_bytes))
}

fn multipart_error(error: MultipartError, max_bytes: usize) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        IntakeError::RequestTooLarge { limit: max_bytes }.into()
    } else {
        AppError::Validation(format!("Multipart error: {error}"))
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}

/// Checks presence, size, declared type and PDF signature.
pub fn validate_upload(upload: Option<Upload>, max_bytes: usize) -> Result<Upload, IntakeError> {
    let upload = upload.ok_or(IntakeError::MissingFile)?;

    if upload.data.is_empty() {
        return Err(IntakeError::EmptyFile);
    }
    if upload.data.len() > max_bytes {
        return Err(IntakeError::TooLarge {
            size: upload.data.len(),
            limit: max_bytes,
        });
    }
    if !declares_pdf(&upload) {
        return Err(IntakeError::UnsupportedType(
            upload
                .content_type
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
        ));
    }
    if !upload.data.starts_with(PDF_MAGIC) {
        return Err(IntakeError::NotAPdf);
    }
    Ok(upload)
}

/// `application/pdf`, or a generic/missing type on a `.pdf` file name.
fn declares_pdf(upload: &Upload) -> bool {
    let essence = upload
        .content_type
        .as_deref()
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase());
    let pdf_name = upload
        .file_name
        .as_deref()
        .is_some_and(|n| n.to_ascii_lowercase().ends_with(".pdf"));

    match essence.as_deref() {
        Some(PDF_MIME) => true,
        None | Some("application/octet-stream") => pdf_name,
        Some(_) => false,
    }
}

/// Captures the payload the model will see. Text extraction runs off the async runtime.
pub async fn capture_payload(
    upload: &Upload,
    mode: DocumentMode,
) -> Result<DocumentPayload, IntakeError> {
    match mode {
        DocumentMode::Pdf => Ok(DocumentPayload::pdf(upload.data.clone())),
        DocumentMode::Text => {
            let data = upload.data.clone();
            let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
                .await
                .map_err(|e| IntakeError::Extraction(format!("extraction task failed: {e}")))?
                .map_err(|e| IntakeError::Extraction(e.to_string()))?;

            if text.trim().is_empty() {
                return Err(IntakeError::NoText);
            }
            info!("Extracted {} chars of text from upload", text.len());
            Ok(DocumentPayload::Text(text))
        }
    }
}
