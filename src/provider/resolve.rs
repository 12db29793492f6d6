//! Model resolution logic for tomo.
//!
//! Resolves which provider and model to use based on CLI flags, config file,
//! and hardcoded defaults. Supports `provider/model` shorthand syntax.

use anyhow::Result;

use super::kind::{default_model_for, ProviderKind};
use crate::config::Config;
use crate::constants::DEFAULT_PROVIDER;

/// Resolved provider + model pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub provider: ProviderKind,
    pub model: String,
}

/// Resolve which provider and model to use.
/// Priority: CLI flags > provider entry in config > config.toml model > defaults.
///
/// Accepts these formats:
///   --model anthropic/claude-sonnet-4-6  (provider/model shorthand, only when --provider is omitted)
///   --provider openrouter --model "org/model-name"  (slash preserved as model name)
///   --provider anthropic  (uses provider's default model)
///   (nothing)  (uses config.toml, then hardcoded default)
pub fn resolve_model(
    cli_provider: Option<&str>,
    cli_model: Option<&str>,
    config: &Config,
) -> Result<ModelSelection> {
    if cli_provider.is_none() {
        if let Some((prov, model)) = cli_model.and_then(|m| m.split_once('/')) {
            if let Ok(provider) = ProviderKind::from_str(prov) {
                return Ok(ModelSelection {
                    provider,
                    model: model.to_string(),
                });
            }
        }
    }

    let provider_str = cli_provider
        .or(config.provider_name())
        .unwrap_or(DEFAULT_PROVIDER);
    let provider = ProviderKind::from_str(provider_str)?;

    let model = cli_model
        .map(String::from)
        .or_else(|| {
            config
                .provider_entry(provider.name())
                .and_then(|e| e.model.clone())
        })
        .or_else(|| config.model_name())
        .unwrap_or_else(|| default_model_for(&provider).to_string());

    Ok(ModelSelection { provider, model })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let selection = resolve_model(None, None, &Config::default()).unwrap();
        assert_eq!(selection.provider, ProviderKind::Anthropic);
        assert_eq!(selection.model, crate::constants::DEFAULT_MODEL);
    }

    #[test]
    fn test_shorthand() {
        let selection = resolve_model(None, Some("openai/gpt-4o"), &Config::default()).unwrap();
        assert_eq!(selection.provider, ProviderKind::OpenAI);
        assert_eq!(selection.model, "gpt-4o");
    }

    #[test]
    fn test_explicit_provider_keeps_slash_in_model() {
        let selection =
            resolve_model(Some("openrouter"), Some("meta/llama-3"), &Config::default()).unwrap();
        assert_eq!(selection.provider, ProviderKind::OpenRouter);
        assert_eq!(selection.model, "meta/llama-3");
    }

    #[test]
    fn test_provider_default_model() {
        let selection = resolve_model(Some("ollama"), None, &Config::default()).unwrap();
        assert_eq!(selection.model, crate::constants::OLLAMA_DEFAULT_MODEL);
    }

    #[test]
    fn test_provider_entry_model() {
        let mut config = Config::default();
        config.set_value("default_provider", "openai").unwrap();
        config.set_value("openai.model", "gpt-4.1-mini").unwrap();
        let selection = resolve_model(None, None, &config).unwrap();
        assert_eq!(selection.provider, ProviderKind::OpenAI);
        assert_eq!(selection.model, "gpt-4.1-mini");
    }

    #[test]
    fn test_unknown_provider() {
        assert!(resolve_model(Some("acme"), None, &Config::default()).is_err());
    }
}
