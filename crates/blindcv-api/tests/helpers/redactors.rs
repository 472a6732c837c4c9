//! Stub redactors standing in for the Mistral client.

use async_trait::async_trait;
use blindcv_services::{build_prompt, RedactionError, Redactor};
use std::sync::Mutex;

/// Returns a fixed reply and records the prompt it would have sent.
pub struct RecordingRedactor {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingRedactor {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Redactor for RecordingRedactor {
    async fn anonymize(&self, text: &str) -> Result<String, RedactionError> {
        self.prompts.lock().unwrap().push(build_prompt(text));
        Ok(self.reply.clone())
    }
}

/// Always fails, as the real client does with a bad key or no connection.
pub struct FailingRedactor;

#[async_trait]
impl Redactor for FailingRedactor {
    async fn anonymize(&self, _text: &str) -> Result<String, RedactionError> {
        Err(RedactionError::Authentication { status: 401 })
    }
}
