use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

pub const PROVIDER_UNAVAILABLE_MESSAGE: &str =
    "Question generation is temporarily unavailable. Please try again later.";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),

    #[error("File is too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { size: usize, limit: usize },

    #[error("No readable text found in {0}")]
    ExtractionEmpty(String),

    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Provider {provider} failed: {message}")]
    Provider { provider: String, message: String },

    #[error("Unparseable model response: {0}")]
    ResponseUnparseable(String),

    #[error("No question provider succeeded")]
    ProviderUnavailable(Option<String>),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
}

impl Error {
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, details) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string(), None),
            Error::UnsupportedFile(msg) => (StatusCode::BAD_REQUEST, msg, None),
            err @ Error::FileTooLarge { .. } => (StatusCode::BAD_REQUEST, err.to_string(), None),
            Error::ExtractionEmpty(filename) => (
                StatusCode::BAD_REQUEST,
                "The document does not contain enough readable text".to_string(),
                Some(filename),
            ),
            Error::ExtractionFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to extract text from the document".to_string(),
                Some(msg),
            ),
            Error::ProviderUnavailable(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                PROVIDER_UNAVAILABLE_MESSAGE.to_string(),
                details,
            ),
            Error::Multipart(err) => (err.status(), err.body_text(), None),
            Error::Reqwest(err) => (
                StatusCode::BAD_GATEWAY,
                "External service error".to_string(),
                Some(err.without_url().to_string()),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
                None,
            ),
        };

        let body = match details {
            Some(details) => json!({ "success": false, "error": error_message, "details": details }),
            None => json!({ "success": false, "error": error_message }),
        };
        (status, Json(body)).into_response()
    }
}
