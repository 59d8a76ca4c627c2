use crate::error::{Error, Result};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [DocumentKind::Pdf, DocumentKind::Docx, DocumentKind::Txt];

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::Txt => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentKind::Txt => "text/plain",
        }
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())?;
        Self::ALL.into_iter().find(|k| k.extension() == ext)
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| k.mime_type() == essence)
    }

    /// Both the extension and the declared MIME type must name the same kind.
    pub fn resolve(filename: &str, mime: &str) -> Result<Self> {
        let by_ext = Self::from_filename(filename).ok_or_else(|| {
            Error::UnsupportedFile(format!(
                "Unsupported file extension for '{}'. Allowed: .pdf, .docx, .txt",
                filename
            ))
        })?;
        let by_mime = Self::from_mime(mime).ok_or_else(|| {
            Error::UnsupportedFile(format!("Unsupported file type '{}'", mime))
        })?;

        if by_ext != by_mime {
            return Err(Error::UnsupportedFile(format!(
                "File extension .{} does not match declared type '{}'",
                by_ext.extension(),
                mime
            )));
        }
        Ok(by_ext)
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub text: String,
    pub filename: String,
    pub file_type: String,
}
