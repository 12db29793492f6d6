//! LLM provider client.
//!
//! Contains the [`Provider`] struct which wraps rig-core provider clients
//! behind enum dispatch, keeping provider-specific details out of the CLI
//! layer. Supports Anthropic, OpenAI, OpenRouter, and Ollama.

use rig::client::CompletionClient;
use rig::completion::Chat;
use rig::message::Message as RigMessage;
use rig::providers::{anthropic, openai, openrouter};
use tracing::{debug, warn};

use super::error::ProviderError;
use super::kind::ProviderKind;
use super::resolve::ModelSelection;
use super::Generator;
use crate::config::Config;
use crate::message::{Message, Role};

/// Internal enum wrapping provider-specific clients.
enum ClientKind {
    Anthropic(anthropic::Client),
    OpenAI(openai::Client),
    OpenRouter(openrouter::Client),
    Ollama(openai::Client),
}

/// A configured LLM provider ready to handle completion requests.
///
/// Wraps a rig-core provider client, the target model name, and the system
/// prompt. Agents are constructed on each call since they are cheap to
/// create.
pub struct Provider {
    client: ClientKind,
    model: String,
    system_prompt: Option<String>,
}

/// Builds an agent from the given client, model, and optional system prompt,
/// then executes the provided block with the agent bound to `$agent`.
macro_rules! with_agent {
    ($client:expr, $model:expr, $sys:expr, |$agent:ident| $body:expr) => {{
        let $agent = if let Some(sys) = $sys {
            $client
                .agent($model)
                .preamble(sys)
                .max_tokens(crate::constants::MAX_TOKENS)
                .build()
        } else {
            $client
                .agent($model)
                .max_tokens(crate::constants::MAX_TOKENS)
                .build()
        };
        $body
    }};
}

/// Dispatches an operation across provider-specific clients.
///
/// Matches on [`ClientKind`] and executes the same block for each variant,
/// letting the compiler monomorphize per provider.
macro_rules! dispatch {
    ($self:expr, |$client:ident| $body:expr) => {
        match &$self.client {
            ClientKind::Anthropic($client) => $body,
            ClientKind::OpenAI($client) => $body,
            ClientKind::OpenRouter($client) => $body,
            ClientKind::Ollama($client) => $body,
        }
    };
}

impl Provider {
    /// Creates a new [`Provider`] from the loaded application config.
    ///
    /// Resolves the API key through the config precedence chain
    /// (env var, then config file) and builds the matching client.
    ///
    /// # Errors
    ///
    /// [`ProviderError::NotConfigured`] when no API key is found for a
    /// provider that needs one, [`ProviderError::InvalidCredential`] when the
    /// client rejects the key during construction.
    pub fn from_config(config: &Config, selection: &ModelSelection) -> Result<Self, ProviderError> {
        let kind = selection.provider;
        let api_key = if kind.needs_api_key() {
            config
                .resolve_api_key(kind.name())
                .ok_or_else(|| ProviderError::NotConfigured {
                    provider: kind.display_name(),
                    env_var: kind.api_key_env(),
                })?
        } else {
            String::new()
        };

        let client = match kind {
            ProviderKind::Anthropic => {
                ClientKind::Anthropic(anthropic::Client::new(&api_key).map_err(invalid_credential)?)
            }
            ProviderKind::OpenAI => {
                ClientKind::OpenAI(openai::Client::new(&api_key).map_err(invalid_credential)?)
            }
            ProviderKind::OpenRouter => {
                ClientKind::OpenRouter(openrouter::Client::new(&api_key).map_err(invalid_credential)?)
            }
            ProviderKind::Ollama => {
                let base_url = config
                    .provider_entry("ollama")
                    .and_then(|o| o.base_url.as_deref())
                    .unwrap_or(crate::constants::OLLAMA_DEFAULT_BASE_URL);
                let client = openai::Client::builder()
                    .api_key("ollama")
                    .base_url(format!("{}/v1", base_url.trim_end_matches('/')))
                    .build()
                    .map_err(|e| ProviderError::Transport(e.to_string()))?;
                ClientKind::Ollama(client)
            }
        };

        debug!(provider = kind.name(), model = %selection.model, "provider ready");
        Ok(Self {
            client,
            model: selection.model.clone(),
            system_prompt: config.system_prompt.clone().filter(|s| !s.trim().is_empty()),
        })
    }
}

#[async_trait::async_trait(?Send)]
impl Generator for Provider {
    fn model(&self) -> &str {
        &self.model
    }

    /// Sends `message` with the prior conversation and returns the full reply.
    async fn generate(&self, message: &str, history: &[Message]) -> Result<String, ProviderError> {
        let chat_history: Vec<RigMessage> = history.iter().map(to_rig_message).collect();
        let system_prompt = self.system_prompt.as_deref();

        debug!(
            model = %self.model,
            prompt_bytes = message.len(),
            history = chat_history.len(),
            "sending request"
        );

        let result = dispatch!(self, |client| {
            with_agent!(client, &self.model, system_prompt, |agent| {
                agent.chat(message.to_string(), chat_history).await
            })
        });

        result.map_err(|err| {
            let err = ProviderError::classify(&err.to_string());
            warn!(error = ?err, "generation failed");
            err
        })
    }
}

fn invalid_credential(err: impl std::fmt::Display) -> ProviderError {
    ProviderError::InvalidCredential(err.to_string())
}

fn to_rig_message(msg: &Message) -> RigMessage {
    match msg.role {
        Role::User => RigMessage::user(msg.text()),
        Role::Assistant => RigMessage::assistant(msg.text()),
    }
}
