//! AI provider settings read from the environment.

use std::env;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Settings for the OpenAI-compatible provider.
#[derive(Debug, Clone, PartialEq)]
pub struct AiConfig {
    /// No key means AI endpoints answer 503 AI_NOT_CONFIGURED
    pub api_key: Option<String>,
    pub base_url: String,
    pub chat_model: String,
    pub image_model: String,
    pub tts_model: String,
    pub tts_voice: String,
    pub stt_model: String,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            image_model: "dall-e-3".to_string(),
            tts_model: "tts-1".to_string(),
            tts_voice: "alloy".to_string(),
            stt_model: "whisper-1".to_string(),
            timeout_secs: 60,
        }
    }
}

impl AiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |name: &str, fallback: String| {
            env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(fallback)
        };

        Self {
            api_key: env::var("AI_API_KEY").ok().filter(|v| !v.trim().is_empty()),
            base_url: var("AI_BASE_URL", defaults.base_url)
                .trim_end_matches('/')
                .to_string(),
            chat_model: var("AI_CHAT_MODEL", defaults.chat_model),
            image_model: var("AI_IMAGE_MODEL", defaults.image_model),
            tts_model: var("AI_TTS_MODEL", defaults.tts_model),
            tts_voice: var("AI_TTS_VOICE", defaults.tts_voice),
            stt_model: var("AI_STT_MODEL", defaults.stt_model),
            timeout_secs: env::var("AI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}
