// PDF intake: validation of uploaded bytes, rasterization into page images,
// and a best-effort text preview.
// Rasterization is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod render;
pub mod text;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

pub use render::{Rasterizer, RenderError};

/// Upload ceiling: 10 MiB.
pub const MAX_PDF_BYTES: u64 = 10 * 1024 * 1024;
const PDF_SIGNATURE: &[u8; 4] = b"%PDF";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("File too large. Maximum size is {}MB", MAX_PDF_BYTES / 1024 / 1024)]
    TooLarge,

    #[error("Please upload a PDF file")]
    WrongExtension,

    #[error("Invalid PDF file format")]
    BadSignature,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::TooLarge => "PDF_TOO_LARGE",
            ValidationError::WrongExtension => "PDF_WRONG_EXTENSION",
            ValidationError::BadSignature => "PDF_BAD_SIGNATURE",
        }
    }
}

/// Checks size, extension, then signature. The first failing check wins.
pub fn validate(file_bytes: &[u8], declared_name: &str, size_bytes: u64) -> Result<(), ValidationError> {
    if size_bytes > MAX_PDF_BYTES {
        return Err(ValidationError::TooLarge);
    }
    if !has_pdf_extension(declared_name) {
        return Err(ValidationError::WrongExtension);
    }
    if !file_bytes.starts_with(PDF_SIGNATURE) {
        return Err(ValidationError::BadSignature);
    }
    Ok(())
}

fn has_pdf_extension(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".pdf")
}

/// A resume as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedPdf {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedPdf {
    pub fn new(name: impl Into<String>, content_type: Option<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type,
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate(&self.bytes, &self.name, self.size())
    }

    pub fn info(&self) -> PdfInfo {
        PdfInfo {
            name: self.name.clone(),
            size: self.size(),
            content_type: self.content_type.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdfInfo {
    pub name: String,
    pub size: u64,
    pub content_type: Option<String>,
}
