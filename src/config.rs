use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
    pub openrouter_base_url: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub template_fallback_enabled: bool,
    pub provider_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub app_url: String,
    pub app_name: String,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:3000".to_string(),
            openrouter_api_key: None,
            openrouter_model: "openai/gpt-4o-mini".to_string(),
            openrouter_base_url: "https://openrouter.ai/api/v1".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            template_fallback_enabled: true,
            provider_timeout_secs: 60,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            app_url: "http://localhost:3000".to_string(),
            app_name: "Exam Assist".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", defaults.server_address),
            openrouter_api_key: get_env_opt("OPENROUTER_API_KEY"),
            openrouter_model: get_env_or("OPENROUTER_MODEL", defaults.openrouter_model),
            openrouter_base_url: get_env_or("OPENROUTER_BASE_URL", defaults.openrouter_base_url),
            gemini_api_key: get_env_opt("GEMINI_API_KEY"),
            gemini_model: get_env_or("GEMINI_MODEL", defaults.gemini_model),
            gemini_base_url: get_env_or("GEMINI_BASE_URL", defaults.gemini_base_url),
            template_fallback_enabled: get_env_parse_or(
                "TEMPLATE_FALLBACK_ENABLED",
                defaults.template_fallback_enabled,
            )?,
            provider_timeout_secs: get_env_parse_or(
                "PROVIDER_TIMEOUT_SECS",
                defaults.provider_timeout_secs,
            )?,
            max_upload_bytes: get_env_parse_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            app_url: get_env_or("APP_URL", defaults.app_url),
            app_name: get_env_or("APP_NAME", defaults.app_name),
        })
    }

    pub fn has_ai_provider(&self) -> bool {
        self.openrouter_api_key.is_some() || self.gemini_api_key.is_some()
    }
}

fn get_env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn get_env_or(name: &str, default: String) -> String {
    get_env_opt(name).unwrap_or(default)
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_opt(name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        None => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}
