use bytes::Bytes;
use serde::Serialize;

pub const PDF_MIME: &str = "application/pdf";

/// The document handed to the model alongside each prompt.
///
/// Captured once per submission and only ever borrowed by the pipeline.
#[derive(Debug, Clone)]
pub enum DocumentPayload {
    /// Raw upload bytes, tagged with their MIME type.
    Binary { data: Bytes, mime_type: String },
    /// Text extracted from the upload before any model call.
    Text(String),
}

impl DocumentPayload {
    pub fn pdf(data: Bytes) -> Self {
        DocumentPayload::Binary {
            data,
            mime_type: PDF_MIME.to_string(),
        }
    }

    /// Short description used in logs, never the content itself.
    pub fn describe(&self) -> String {
        match self {
            DocumentPayload::Binary { data, mime_type } => {
                format!("{mime_type} ({} bytes)", data.len())
            }
            DocumentPayload::Text(text) => format!("extracted text ({} chars)", text.len()),
        }
    }
}

/// What the caller sees about their upload.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub file_name: Option<String>,
    pub size_bytes: usize,
    pub size_kb: f64,
}

impl DocumentSummary {
    pub fn new(file_name: Option<String>, size_bytes: usize) -> Self {
        // One decimal place, matching how the upload size is displayed.
        let size_kb = (size_bytes as f64 / 1024.0 * 10.0).round() / 10.0;
        Self {
            file_name,
            size_bytes,
            size_kb,
        }
    }
}
