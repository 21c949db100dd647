//! Narrator and media provider.
//!
//! Handlers talk to the provider only through [`AiClient`], so tests can
//! substitute a scripted client and production can point at any
//! OpenAI-compatible endpoint.

mod openai;
mod trait_def;

pub use openai::OpenAiClient;
pub use trait_def::{
    AiClient, AiError, ChatMessage, ChatRole, CompletionRequest, DisabledAi, GeneratedImage,
};
