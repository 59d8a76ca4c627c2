use crate::{
    dto::extraction_dto::ExtractTextResponse,
    error::{Error, Result},
    models::document::{DocumentKind, UploadedFile},
    services::extraction_service::MIN_EXTRACTED_CHARS,
    AppState,
};
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

#[axum::debug_handler]
pub async fn extract_text(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| {
            tracing::warn!(filename = %filename, error = %e, "Failed to read uploaded file");
            Error::Multipart(e)
        })?;

        upload = Some(UploadedFile {
            filename,
            content_type,
            data,
        });
        break;
    }

    let upload = upload.ok_or_else(|| Error::BadRequest("No file provided".to_string()))?;
    if upload.filename.is_empty() {
        return Err(Error::BadRequest("No file provided".to_string()));
    }

    let result = state.extraction_service.extract(upload).await?;
    tracing::info!(
        filename = %result.filename,
        chars = result.text.chars().count(),
        "Text extracted"
    );

    Ok(Json(ExtractTextResponse::from(result)))
}

pub async fn extraction_info(State(state): State<AppState>) -> impl IntoResponse {
    let max_bytes = state.extraction_service.max_upload_bytes();

    Json(json!({
        "name": "extract-text",
        "version": env!("CARGO_PKG_VERSION"),
        "supportedExtensions": DocumentKind::ALL.map(|k| format!(".{}", k.extension())),
        "supportedMimeTypes": DocumentKind::ALL.map(|k| k.mime_type()),
        "maxFileSize": max_bytes,
        "maxFileSizeMb": max_bytes / (1024 * 1024),
        "minTextLength": MIN_EXTRACTED_CHARS,
    }))
}
