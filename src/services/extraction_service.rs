use crate::error::{Error, Result};
use crate::models::document::{DocumentKind, ExtractionResult, UploadedFile};
use bytes::Bytes;
use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild,
    TableRowChild,
};
use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_EXTRACTED_CHARS: usize = 10;

static EXCESS_BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").expect("valid blank line regex"));

#[derive(Clone)]
pub struct ExtractionService {
    max_upload_bytes: usize,
}

impl ExtractionService {
    pub fn new(max_upload_bytes: usize) -> Self {
        Self { max_upload_bytes }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Checks size and type before any parsing happens.
    pub fn validate(&self, upload: &UploadedFile) -> Result<DocumentKind> {
        if upload.data.len() > self.max_upload_bytes {
            return Err(Error::FileTooLarge {
                size: upload.data.len(),
                limit: self.max_upload_bytes,
            });
        }
        DocumentKind::resolve(&upload.filename, &upload.content_type)
    }

    pub async fn extract(&self, upload: UploadedFile) -> Result<ExtractionResult> {
        let kind = self.validate(&upload)?;
        tracing::info!(
            filename = %upload.filename,
            kind = kind.extension(),
            size = upload.data.len(),
            "Extracting document text"
        );

        let raw = match kind {
            DocumentKind::Txt => decode_text(&upload.data),
            DocumentKind::Pdf => run_blocking(upload.data.clone(), extract_pdf).await?,
            DocumentKind::Docx => run_blocking(upload.data.clone(), extract_docx).await?,
        };

        let text = normalize_text(&raw);
        if text.chars().count() < MIN_EXTRACTED_CHARS {
            tracing::warn!(filename = %upload.filename, chars = text.chars().count(), "Extracted text too short");
            return Err(Error::ExtractionEmpty(upload.filename));
        }

        Ok(ExtractionResult {
            text,
            filename: upload.filename,
            file_type: kind.mime_type().to_string(),
        })
    }
}

async fn run_blocking(data: Bytes, f: fn(&[u8]) -> Result<String>) -> Result<String> {
    tokio::task::spawn_blocking(move || f(&data))
        .await
        .map_err(|e| {
            tracing::error!("Extraction task aborted: {}", e);
            Error::ExtractionFailed(format!("extraction task aborted: {}", e))
        })?
}

fn decode_text(data: &[u8]) -> String {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    String::from_utf8_lossy(data).into_owned()
}

fn extract_pdf(data: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(data).map_err(|e| {
        tracing::error!("PDF extraction failed: {}", e);
        Error::ExtractionFailed(format!("failed to parse PDF: {}", e))
    })
}

fn extract_docx(data: &[u8]) -> Result<String> {
    let docx = docx_rs::read_docx(data).map_err(|e| {
        tracing::error!("DOCX extraction failed: {:?}", e);
        Error::ExtractionFailed(format!("failed to parse DOCX: {:?}", e))
    })?;

    let mut paragraphs: Vec<String> = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(para) => paragraphs.push(paragraph_text(para)),
            DocumentChild::Table(table) => collect_table_text(table, &mut paragraphs),
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

fn collect_table_text(table: &Table, out: &mut Vec<String>) {
    for TableChild::TableRow(row) in &table.rows {
        for TableRowChild::TableCell(cell) in &row.cells {
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(para) => out.push(paragraph_text(para)),
                    TableCellContent::Table(inner) => collect_table_text(inner, out),
                    _ => {}
                }
            }
        }
    }
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                match rc {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
    }
    text
}

fn normalize_text(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n").replace('\0', "");
    EXCESS_BLANK_LINES
        .replace_all(&unified, "\n\n")
        .trim()
        .to_string()
}
