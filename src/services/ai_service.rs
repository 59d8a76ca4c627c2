use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::question::{GenerationRequest, Question};
use crate::services::fallback_service::generate_fallback;
use crate::services::gemini_service::GeminiProvider;
use crate::services::openrouter_service::OpenRouterProvider;
use crate::services::prompt_service::build_prompt;
use crate::services::response_parser::{parse_response, sanitize_questions};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenRouter,
    Gemini,
    Template,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Template => "template",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A text-completion backend that can be asked for a question set.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn model(&self) -> String;

    /// Sends the prompt and returns the raw text of the model reply.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct FailedAttempt {
    pub provider: ProviderKind,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub questions: Vec<Question>,
    pub provider: ProviderKind,
    pub model: Option<String>,
    pub failed_attempts: Vec<FailedAttempt>,
}

impl GenerationOutput {
    pub fn used_fallback(&self) -> bool {
        self.provider == ProviderKind::Template
    }

    pub fn failed_providers(&self) -> Vec<ProviderKind> {
        self.failed_attempts.iter().map(|a| a.provider).collect()
    }
}

#[derive(Clone)]
pub struct AIService {
    providers: Vec<Arc<dyn QuestionProvider>>,
    template_fallback: bool,
}

impl AIService {
    pub fn new(providers: Vec<Arc<dyn QuestionProvider>>, template_fallback: bool) -> Self {
        Self {
            providers,
            template_fallback,
        }
    }

    /// Builds the OpenRouter -> Gemini chain from whichever keys are configured.
    pub fn from_config(config: &Config, client: Client) -> Self {
        let mut providers: Vec<Arc<dyn QuestionProvider>> = Vec::new();

        if let Some(key) = &config.openrouter_api_key {
            providers.push(Arc::new(OpenRouterProvider::new(
                client.clone(),
                key.clone(),
                config.openrouter_base_url.clone(),
                config.openrouter_model.clone(),
                config.app_url.clone(),
                config.app_name.clone(),
            )));
        }
        if let Some(key) = &config.gemini_api_key {
            providers.push(Arc::new(GeminiProvider::new(
                client,
                key.clone(),
                config.gemini_base_url.clone(),
                config.gemini_model.clone(),
            )));
        }

        if !config.has_ai_provider() {
            tracing::warn!("No AI provider API key configured");
        }

        Self::new(providers, config.template_fallback_enabled)
    }

    pub fn provider_kinds(&self) -> Vec<ProviderKind> {
        self.providers.iter().map(|p| p.kind()).collect()
    }

    pub fn template_fallback_enabled(&self) -> bool {
        self.template_fallback
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutput> {
        let prompt = build_prompt(
            &request.material,
            request.question_type,
            request.question_count,
            request.difficulty,
        );
        let mut failed_attempts = Vec::new();

        for provider in &self.providers {
            let kind = provider.kind();
            tracing::info!(provider = %kind, model = %provider.model(), "Requesting questions");

            match self.attempt(provider.as_ref(), &prompt, request).await {
                Ok(questions) => {
                    tracing::info!(provider = %kind, count = questions.len(), "Questions generated");
                    return Ok(GenerationOutput {
                        questions,
                        provider: kind,
                        model: Some(provider.model()),
                        failed_attempts,
                    });
                }
                Err(e) => {
                    tracing::warn!(provider = %kind, error = %e, "Provider failed, trying next");
                    failed_attempts.push(FailedAttempt {
                        provider: kind,
                        error: e.to_string(),
                    });
                }
            }
        }

        if self.template_fallback {
            tracing::info!(
                failed = failed_attempts.len(),
                "Falling back to template question generator"
            );
            return Ok(GenerationOutput {
                questions: generate_fallback(request),
                provider: ProviderKind::Template,
                model: None,
                failed_attempts,
            });
        }

        let details = failed_attempts
            .last()
            .map(|a| format!("{}: {}", a.provider, a.error))
            .or_else(|| Some("No AI provider is configured".to_string()));
        Err(Error::ProviderUnavailable(details))
    }

    async fn attempt(
        &self,
        provider: &dyn QuestionProvider,
        prompt: &str,
        request: &GenerationRequest,
    ) -> Result<Vec<Question>> {
        let raw = provider.complete(prompt).await?;
        let value = parse_response(&raw)?;
        let questions = sanitize_questions(&value, request);
        if questions.is_empty() {
            return Err(Error::ResponseUnparseable(
                "response contained no usable questions".to_string(),
            ));
        }
        Ok(questions)
    }
}
