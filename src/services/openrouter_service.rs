use crate::error::{Error, Result};
use crate::services::ai_service::{ProviderKind, QuestionProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

const SYSTEM_PROMPT: &str = "You are an assistant that writes exam questions for teachers. \
Always answer with a single valid JSON object and nothing else.";

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<Msg<'a>>,
}

#[derive(Deserialize)]
struct RespChoiceMsg {
    content: Option<String>,
}

#[derive(Deserialize)]
struct RespChoice {
    message: RespChoiceMsg,
}

#[derive(Deserialize)]
struct Resp {
    #[serde(default)]
    choices: Vec<RespChoice>,
    error: Option<JsonValue>,
}

#[derive(Clone)]
pub struct OpenRouterProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    app_url: String,
    app_name: String,
}

impl OpenRouterProvider {
    pub fn new(
        client: Client,
        api_key: String,
        base_url: String,
        model: String,
        app_url: String,
        app_name: String,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            app_url,
            app_name,
        }
    }

    fn fail(&self, message: impl Into<String>) -> Error {
        Error::provider(ProviderKind::OpenRouter.as_str(), message)
    }

    fn transport(&self, err: reqwest::Error) -> Error {
        self.fail(format!("HTTP error: {}", err.without_url()))
    }
}

#[async_trait]
impl QuestionProvider for OpenRouterProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenRouter
    }

    fn model(&self) -> String {
        self.model.clone()
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let req = Req {
            model: &self.model,
            temperature: 0.7,
            max_tokens: 4000,
            messages: vec![
                Msg {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Msg {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.app_url)
            .header("X-Title", &self.app_name)
            .json(&req)
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(self.fail(format!("API error {}: {}", status, text)));
        }

        let body: Resp = res.json().await.map_err(|e| self.transport(e))?;
        if let Some(err) = body.error {
            return Err(self.fail(format!("API reported error: {}", err)));
        }

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| self.fail("Invalid response format: no message content"))
    }
}
