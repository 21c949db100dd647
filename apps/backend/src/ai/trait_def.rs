//! Provider-agnostic AI client trait.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by an AI provider call.
#[derive(Debug, Error)]
pub enum AiError {
    /// Transport failure (DNS, TLS, timeout)
    #[error("AI request failed: {0}")]
    Request(String),
    /// Provider answered with a non-success status
    #[error("AI provider returned {status}: {body}")]
    Upstream { status: u16, body: String },
    /// Provider answered 2xx with a body we could not use
    #[error("AI response malformed: {0}")]
    InvalidResponse(String),
    #[error("AI provider is not configured")]
    NotConfigured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: 0.8,
            max_tokens: 800,
        }
    }
}

/// One generated image; providers return either a URL or inline base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,
}

/// Text, image and audio generation.
///
/// Implementations must be cheap to share behind an `Arc`; calls are made
/// outside any database transaction.
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Chat completion; returns the assistant text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, AiError>;

    async fn generate_image(&self, prompt: &str, size: &str) -> Result<GeneratedImage, AiError>;

    /// Text-to-speech; returns encoded audio (mp3).
    async fn synthesize_speech(&self, text: &str, voice: Option<&str>) -> Result<Bytes, AiError>;

    /// Speech-to-text over raw audio bytes.
    async fn transcribe(
        &self,
        audio: Bytes,
        filename: &str,
        mime: &str,
    ) -> Result<String, AiError>;
}

/// Stand-in used when no provider key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledAi;

#[async_trait]
impl AiClient for DisabledAi {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, AiError> {
        Err(AiError::NotConfigured)
    }

    async fn generate_image(&self, _prompt: &str, _size: &str) -> Result<GeneratedImage, AiError> {
        Err(AiError::NotConfigured)
    }

    async fn synthesize_speech(&self, _text: &str, _voice: Option<&str>) -> Result<Bytes, AiError> {
        Err(AiError::NotConfigured)
    }

    async fn transcribe(
        &self,
        _audio: Bytes,
        _filename: &str,
        _mime: &str,
    ) -> Result<String, AiError> {
        Err(AiError::NotConfigured)
    }
}
