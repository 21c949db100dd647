//! Image, speech and transcription pass-through.

use bytes::Bytes;
use tracing::debug;

use crate::ai::GeneratedImage;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;

pub const MAX_IMAGE_PROMPT: usize = 1000;
pub const MAX_SPEECH_TEXT: usize = 4096;
/// Provider upload limit for transcription
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";
const IMAGE_SIZES: &[&str] = &["256x256", "512x512", "1024x1024", "1792x1024", "1024x1792"];

pub async fn generate_image(
    state: &AppState,
    prompt: &str,
    size: Option<&str>,
) -> Result<GeneratedImage, AppError> {
    let prompt = prompt.trim();
    if prompt.is_empty() || prompt.chars().count() > MAX_IMAGE_PROMPT {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            format!("Prompt must be 1-{MAX_IMAGE_PROMPT} characters"),
        ));
    }
    let size = size.unwrap_or(DEFAULT_IMAGE_SIZE);
    if !IMAGE_SIZES.contains(&size) {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            format!("Unsupported image size '{size}'"),
        ));
    }
    debug!(size, "Generating image");
    Ok(state.ai.generate_image(prompt, size).await?)
}

pub async fn synthesize_speech(
    state: &AppState,
    text: &str,
    voice: Option<&str>,
) -> Result<Bytes, AppError> {
    let text = text.trim();
    if text.is_empty() || text.chars().count() > MAX_SPEECH_TEXT {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            format!("Text must be 1-{MAX_SPEECH_TEXT} characters"),
        ));
    }
    Ok(state.ai.synthesize_speech(text, voice).await?)
}

pub async fn transcribe(state: &AppState, audio: Bytes, mime: &str) -> Result<String, AppError> {
    if audio.is_empty() {
        return Err(AppError::invalid(ErrorCode::ValidationError, "Audio body is empty"));
    }
    if audio.len() > MAX_AUDIO_BYTES {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            "Audio exceeds the 25 MB limit",
        ));
    }
    let filename = match mime {
        "audio/wav" | "audio/x-wav" => "audio.wav",
        "audio/mpeg" | "audio/mp3" => "audio.mp3",
        "audio/ogg" => "audio.ogg",
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" => "audio.m4a",
        _ => "audio.webm",
    };
    debug!(bytes = audio.len(), mime, "Transcribing audio");
    Ok(state.ai.transcribe(audio, filename, mime).await?)
}
