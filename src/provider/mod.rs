//! LLM provider abstraction for tomo.
//!
//! Wraps rig-core's provider clients behind a [`Provider`] struct with enum
//! dispatch, keeping provider-specific details out of the CLI layer. Supports
//! Anthropic, OpenAI, OpenRouter, and Ollama (local) via [`ProviderKind`].
//! The chat loop only sees the [`Generator`] trait.

mod client;
mod error;
mod kind;
mod listing;
mod resolve;

pub use client::Provider;
pub use error::ProviderError;
pub use kind::{default_model_for, ProviderKind};
pub use listing::list_models;
pub use resolve::{resolve_model, ModelSelection};

use crate::message::Message;

/// A single request/response text generation capability.
#[async_trait::async_trait(?Send)]
pub trait Generator {
    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Sends `message` after the prior `history` and returns the reply text.
    async fn generate(&self, message: &str, history: &[Message]) -> Result<String, ProviderError>;
}
