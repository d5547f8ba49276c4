//! LLM provider abstraction.
//!
//! The orchestrator talks to a model through [`LLMProvider`] and obtains
//! one per credential through a [`ProviderFactory`], which lets tests swap
//! in canned providers without touching the network.

pub mod openai;

pub use openai::{OpenAIProvider, OpenAIProviderFactory};

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::error::{AuditError, Result};

// ── Messages ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Sampling options for a single completion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Ask the provider to constrain output to a JSON object.
    pub json_mode: bool,
}

impl ChatOptions {
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            temperature: Some(config.temperature),
            max_tokens: Some(config.max_tokens),
            json_mode: config.json_mode,
        }
    }

    pub fn with_json_mode(mut self, json_mode: bool) -> Self {
        self.json_mode = json_mode;
        self
    }
}

// ── Traits ───────────────────────────────────────────────────────────────────

/// A chat-completion backend.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Model used when the caller does not override it.
    fn default_model(&self) -> &str;

    /// Send `messages` and return the first choice's text.
    async fn chat(&self, messages: Vec<ChatMessage>, options: ChatOptions) -> Result<String>;
}

/// Builds a provider for a given credential.
pub trait ProviderFactory: Send + Sync {
    fn create(&self, api_key: &str, config: &ProviderConfig) -> Result<Arc<dyn LLMProvider>>;
}

// ── Errors ───────────────────────────────────────────────────────────────────

/// Map a non-success HTTP status and body to an [`AuditError`].
///
/// The message is taken from the body's `error.message` when present,
/// otherwise the raw body (or the status itself if the body is empty).
pub fn parse_provider_error(status: u16, body: &str) -> AuditError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("HTTP {}", status)
            } else {
                trimmed.to_string()
            }
        });

    match status {
        401 => AuditError::InvalidCredential(message),
        403 => AuditError::AccessDenied(message),
        429 => AuditError::RateLimited(message),
        _ => AuditError::Transport {
            status: Some(status),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            parse_provider_error(401, "{}"),
            AuditError::InvalidCredential(_)
        ));
        assert!(matches!(
            parse_provider_error(403, ""),
            AuditError::AccessDenied(_)
        ));
        assert!(matches!(
            parse_provider_error(429, "slow down"),
            AuditError::RateLimited(_)
        ));
    }

    #[test]
    fn test_other_status_carries_provider_message() {
        let err = parse_provider_error(500, r#"{"error":{"message":"server exploded"}}"#);
        match err {
            AuditError::Transport { status, message } => {
                assert_eq!(status, Some(500));
                assert_eq!(message, "server exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_body_falls_back_to_status() {
        match parse_provider_error(502, "  ") {
            AuditError::Transport { message, .. } => assert_eq!(message, "HTTP 502"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_options_from_config() {
        let opts = ChatOptions::from_config(&ProviderConfig::default());
        assert_eq!(opts.max_tokens, Some(4000));
        assert!(opts.json_mode);
        assert!(!opts.with_json_mode(false).json_mode);
    }
}
