//! Struct definitions and serde defaults for tomo configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for tomo, deserialized from `config.toml`.
///
/// Fields use serde defaults so tomo can run with sensible defaults
/// when no config file exists.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Default model identifier (e.g. `"claude-sonnet-4-6"`).
    #[serde(default = "default_model")]
    pub model: String,
    /// Default provider name (e.g., "anthropic", "openai").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_provider: Option<String>,
    /// Optional system prompt sent with every request.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: Option<String>,
    /// Per-provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Project context settings.
    #[serde(default)]
    pub context: ContextConfig,
}

/// Returns the default model identifier.
///
/// Used by serde's `#[serde(default)]` attribute during deserialization.
pub(super) fn default_model() -> String {
    crate::constants::DEFAULT_MODEL.to_string()
}

fn default_system_prompt() -> Option<String> {
    Some(crate::constants::DEFAULT_SYSTEM_PROMPT.to_string())
}

/// Provider-specific configuration map.
///
/// Each field corresponds to a supported LLM provider. Only providers
/// the user has configured will be `Some`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic: Option<ProviderEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai: Option<ProviderEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openrouter: Option<ProviderEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ollama: Option<ProviderEntry>,
}

/// Connection details for a single LLM provider.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderEntry {
    /// API key for authentication. Environment variables take precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Custom base URL (proxies, self-hosted instances, Ollama).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Model identifier to use with this provider, overriding the global default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// When project context is attached to a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ContextMode {
    /// Let the relevance classifier decide per message.
    #[default]
    Auto,
    /// Attach context whenever the working directory has eligible files.
    Always,
    /// Never attach context.
    Never,
}

/// Project context settings. Unset fields fall back to built-in limits.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct ContextConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ContextMode>,
    /// Maximum directory depth to walk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    /// Per-file ceiling in KiB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_kb: Option<u64>,
    /// Total snapshot ceiling in KiB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_total_kb: Option<u64>,
    /// Extra directory-name substrings to prune.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_dirs: Vec<String>,
    /// Extra glob patterns to exclude.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_patterns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            default_provider: None,
            system_prompt: default_system_prompt(),
            provider: ProviderConfig::default(),
            context: ContextConfig::default(),
        }
    }
}
