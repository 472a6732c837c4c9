//! Mistral chat-completions client.

use async_trait::async_trait;
use blindcv_core::AppConfig;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};

use super::prompt::build_prompt;
use super::{RedactionError, Redactor};

pub struct MistralRedactor {
    http_client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    timeout_secs: u64,
}

impl Debug for MistralRedactor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MistralRedactor")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl MistralRedactor {
    pub fn new(config: &AppConfig) -> Result<Self, RedactionError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.redaction_timeout())
            .build()
            .map_err(|e| RedactionError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            api_base: config.mistral_api_base.trim_end_matches('/').to_string(),
            api_key: config.mistral_api_key.clone(),
            model: config.mistral_model.clone(),
            timeout_secs: config.redaction_timeout_secs,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    fn map_send_error(&self, e: reqwest::Error) -> RedactionError {
        if e.is_timeout() {
            RedactionError::Timeout(self.timeout_secs)
        } else {
            RedactionError::Transport(e.to_string())
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, RedactionError> {
        let body = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(RedactionError::Authentication {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RedactionError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await.map_err(|e| self.map_send_error(e))?;
        let parsed: ChatResponse =
            serde_json::from_str(&raw).map_err(|e| RedactionError::Decode(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(RedactionError::EmptyResponse);
        }
        Ok(content)
    }
}

#[async_trait]
impl Redactor for MistralRedactor {
    async fn anonymize(&self, text: &str) -> Result<String, RedactionError> {
        let prompt = build_prompt(text);
        tracing::debug!(
            model = %self.model,
            text_len = text.len(),
            "Sending text to the redaction service"
        );

        match self.complete(&prompt).await {
            Ok(redacted) => {
                tracing::debug!(redacted_len = redacted.len(), "Redaction completed");
                Ok(redacted)
            }
            Err(e) => {
                tracing::error!(error = %e, model = %self.model, "Mistral API error");
                Err(e)
            }
        }
    }
}
