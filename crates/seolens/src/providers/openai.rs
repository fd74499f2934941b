use std::time::Duration;

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

use super::{create_client, optional_env, required_env, send_json};
use crate::error::ProviderRequestError;
use crate::prelude::*;

pub const VENDOR: &str = "openai";

const TIMEOUT: Duration = Duration::from_secs(60);

/// Text-generation vendor configuration from environment variables
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
}

impl OpenAiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com";
    pub const DEFAULT_MODEL: &'static str = "gpt-4o-mini";
    pub const DEFAULT_TEMPERATURE: f64 = 0.7;

    /// Load configuration from environment variables
    /// Uses OPENAI_API_KEY as a bearer token
    /// Uses OPENAI_BASE_URL, OPENAI_MODEL and OPENAI_TEMPERATURE with default fallbacks
    pub fn from_env() -> SeoResult<Self> {
        let temperature = match optional_env("OPENAI_TEMPERATURE") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|e| Error::Config(format!("Invalid OPENAI_TEMPERATURE '{raw}': {e}")))?,
            None => Self::DEFAULT_TEMPERATURE,
        };

        Ok(Self {
            base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            api_key: required_env("OPENAI_API_KEY")?,
            model: optional_env("OPENAI_MODEL").unwrap_or_else(|| Self::DEFAULT_MODEL.to_string()),
            temperature,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f64,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> SeoResult<Self> {
        Ok(Self {
            client: create_client(HeaderMap::new(), TIMEOUT)?,
            endpoint: format!(
                "{}/v1/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
            api_key: config.api_key,
            model: config.model,
            temperature: config.temperature,
        })
    }

    /// Send `prompt` as the only (system) message and return the first
    /// choice's text, if any.
    pub async fn complete_system_prompt(
        &self,
        prompt: &str,
    ) -> Result<Option<String>, ProviderRequestError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "system",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body);

        let response: ChatResponse = send_json(VENDOR, "chat_completion", request).await?;

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty()))
    }
}
