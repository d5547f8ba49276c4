//! OpenAI-compatible chat completions provider.
//!
//! Speaks `POST {api_base}/chat/completions` with a bearer credential. Any
//! server exposing the same surface (proxies, local gateways) works by
//! pointing `provider.api_base` at it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::{AuditError, Result};

use super::{parse_provider_error, ChatMessage, ChatOptions, LLMProvider, ProviderFactory};

// ── Provider ──────────────────────────────────────────────────────────────────

pub struct OpenAIProvider {
    api_key: String,
    api_base: String,
    model: String,
    client: Client,
}

impl std::fmt::Debug for OpenAIProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAIProvider {
    pub fn new(api_key: &str, config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            api_key: api_key.trim().to_string(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            client,
        })
    }

    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    /// Build the `chat/completions` request body.
    pub fn build_request_body(&self, messages: &[ChatMessage], options: &ChatOptions) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": messages,
        });
        if let Some(temp) = options.temperature {
            body["temperature"] = json!(temp);
        }
        if let Some(max_tokens) = options.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if options.json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }

    /// Text of the first choice, if the response carries one.
    pub fn extract_content(response: &Value) -> Option<String> {
        response["choices"][0]["message"]["content"]
            .as_str()
            .map(String::from)
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, messages: Vec<ChatMessage>, options: ChatOptions) -> Result<String> {
        let body = self.build_request_body(&messages, &options);
        debug!(model = %self.model, messages = messages.len(), "OpenAI chat request");

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(parse_provider_error(status.as_u16(), &error_text));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| AuditError::Parse(format!("Failed to decode provider response: {}", e)))?;

        Self::extract_content(&json)
            .ok_or_else(|| AuditError::Parse("Provider response had no message content".into()))
    }
}

// ── Factory ───────────────────────────────────────────────────────────────────

/// Creates [`OpenAIProvider`]s for live audits.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAIProviderFactory;

impl ProviderFactory for OpenAIProviderFactory {
    fn create(&self, api_key: &str, config: &ProviderConfig) -> Result<Arc<dyn LLMProvider>> {
        Ok(Arc::new(OpenAIProvider::new(api_key, config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAIProvider {
        let config = ProviderConfig {
            api_base: "https://proxy.example/v1/".to_string(),
            ..ProviderConfig::default()
        };
        OpenAIProvider::new("sk-secret", &config).unwrap()
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        assert_eq!(provider().api_url(), "https://proxy.example/v1/chat/completions");
    }

    #[test]
    fn test_request_body_json_mode() {
        let p = provider();
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hi")];
        let body = p.build_request_body(&messages, &ChatOptions::from_config(&ProviderConfig::default()));
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert_eq!(body["max_tokens"], 4000);
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_request_body_plain_mode() {
        let body = provider().build_request_body(&[ChatMessage::user("x")], &ChatOptions::default());
        assert!(body.get("response_format").is_none());
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_extract_content() {
        let resp = json!({"choices": [{"message": {"role": "assistant", "content": "{\"a\":1}"}}]});
        assert_eq!(
            OpenAIProvider::extract_content(&resp).as_deref(),
            Some("{\"a\":1}")
        );
        assert!(OpenAIProvider::extract_content(&json!({"choices": []})).is_none());
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", provider());
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn test_factory_builds_provider() {
        let provider = OpenAIProviderFactory
            .create("sk", &ProviderConfig::default())
            .unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.default_model(), "gpt-4o-mini");
    }
}
