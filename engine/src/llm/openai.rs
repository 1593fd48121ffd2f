use super::{LLMError, LLMProvider, Message};
use crate::auth::SecretString;
use crate::config::AdvisorConfig;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

/// Longest slice of an error body kept in an `LLMError`
const MAX_ERROR_BODY: usize = 200;

/// OpenAI-compatible chat-completion client
pub struct OpenAIProvider {
    base_url: String,
    model: String,
    temperature: f32,
    api_key: SecretString,
    client: reqwest::Client,
}

impl OpenAIProvider {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, LLMError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into(),
            model: model.into(),
            temperature,
            api_key,
            client,
        })
    }

    /// Build a provider from the advisor config, or `None` when no key is set
    pub fn from_config(config: &AdvisorConfig) -> Result<Option<Self>, LLMError> {
        match config.api_key() {
            Some(api_key) => Self::new(
                config.base_url.clone(),
                config.model.clone(),
                config.temperature,
                api_key,
                config.timeout(),
            )
            .map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, messages: &[Message]) -> super::Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let payload = json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key.unsecure()))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LLMError::Timeout
                } else {
                    LLMError::NetworkError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }

            return Err(match status {
                401 | 403 => LLMError::AuthenticationFailed(body),
                429 => LLMError::RateLimitExceeded,
                _ => LLMError::HttpStatus { status, body },
            });
        }

        let data: serde_json::Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LLMError::Timeout
            } else {
                LLMError::ParseError(e.to_string())
            }
        })?;

        let choice = data
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .ok_or_else(|| LLMError::ParseError("No choices in response".to_string()))?;

        let content = choice
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or(LLMError::EmptyContent)?;

        if content.trim().is_empty() {
            return Err(LLMError::EmptyContent);
        }

        Ok(content.to_string())
    }
}
