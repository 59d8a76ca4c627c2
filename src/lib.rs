pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use crate::config::Config;
use crate::error::Result;
use crate::services::{ai_service::AIService, extraction_service::ExtractionService};
use reqwest::Client;

#[derive(Clone)]
pub struct AppState {
    pub ai_service: AIService,
    pub extraction_service: ExtractionService,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.provider_timeout_secs))
            .build()?;

        let ai_service = AIService::from_config(config, http_client);
        let extraction_service = ExtractionService::new(config.max_upload_bytes);

        Ok(Self {
            ai_service,
            extraction_service,
        })
    }
}
