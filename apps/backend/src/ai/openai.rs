//! OpenAI-compatible HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use super::trait_def::{AiClient, AiError, ChatMessage, CompletionRequest, GeneratedImage};
use crate::config::ai::AiConfig;

/// Longest provider error body kept in logs and problem details.
const MAX_ERROR_BODY: usize = 512;

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    config: AiConfig,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.config.base_url)
            .field("chat_model", &self.config.chat_model)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<GeneratedImage>,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl OpenAiClient {
    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        let api_key = config.api_key.clone().ok_or(AiError::NotConfigured)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AiError::Request(e.to_string()))?;
        Ok(Self {
            http,
            api_key,
            config,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, AiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let mut body = resp.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        warn!(status = status.as_u16(), body = %body, "AI provider returned an error");
        Err(AiError::Upstream {
            status: status.as_u16(),
            body,
        })
    }

    async fn post_json(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<reqwest::Response, AiError> {
        let resp = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AiError::Request(e.to_string()))?;
        Self::check(resp).await
    }
}

#[async_trait]
impl AiClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, AiError> {
        debug!(
            model = %self.config.chat_model,
            messages = request.messages.len(),
            "Requesting chat completion"
        );
        let body = ChatBody {
            model: &self.config.chat_model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };
        let parsed: ChatResponse = self
            .post_json("chat/completions", &body)
            .await?
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AiError::InvalidResponse("completion had no content".into()))
    }

    async fn generate_image(&self, prompt: &str, size: &str) -> Result<GeneratedImage, AiError> {
        let body = json!({
            "model": self.config.image_model,
            "prompt": prompt,
            "n": 1,
            "size": size,
        });
        let parsed: ImageResponse = self
            .post_json("images/generations", &body)
            .await?
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;

        parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| AiError::InvalidResponse("no image returned".into()))
    }

    async fn synthesize_speech(&self, text: &str, voice: Option<&str>) -> Result<Bytes, AiError> {
        let body = json!({
            "model": self.config.tts_model,
            "input": text,
            "voice": voice.unwrap_or(&self.config.tts_voice),
        });
        self.post_json("audio/speech", &body)
            .await?
            .bytes()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))
    }

    async fn transcribe(
        &self,
        audio: Bytes,
        filename: &str,
        mime: &str,
    ) -> Result<String, AiError> {
        let part = Part::bytes(audio.to_vec())
            .file_name(filename.to_string())
            .mime_str(mime)
            .map_err(|e| AiError::Request(e.to_string()))?;
        let form = Form::new()
            .text("model", self.config.stt_model.clone())
            .part("file", part);

        let resp = self
            .http
            .post(self.url("audio/transcriptions"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AiError::Request(e.to_string()))?;
        let parsed: TranscriptionResponse = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;
        Ok(parsed.text)
    }
}
