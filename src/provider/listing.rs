//! Model listing and discovery.
//!
//! Displays known models grouped by provider, including models installed on
//! a local Ollama server.

use anyhow::Result;
use colored::Colorize;
use tracing::debug;

use super::kind::{default_model_for, ProviderKind};
use super::resolve::resolve_model;
use crate::config::Config;

/// Models offered for each hosted provider. Any other identifier the provider
/// accepts also works via `--model`.
fn known_models(kind: ProviderKind) -> &'static [&'static str] {
    match kind {
        ProviderKind::Anthropic => &[
            "claude-opus-4-6",
            "claude-sonnet-4-6",
            "claude-haiku-4-5",
            "claude-sonnet-4-5",
        ],
        ProviderKind::OpenAI => &["gpt-4.1", "gpt-4.1-mini", "gpt-4o", "o4-mini"],
        ProviderKind::OpenRouter => &[
            "arcee-ai/trinity-large-preview:free",
            "anthropic/claude-sonnet-4.5",
            "openai/gpt-4.1",
        ],
        ProviderKind::Ollama => &[],
    }
}

/// List all available models, grouped by provider.
///
/// The model that would be used with the current config is marked.
pub async fn list_models(config: &Config) -> Result<()> {
    let selection = resolve_model(None, None, config)?;

    println!("{}\n", "Available models:".bold());

    for kind in ProviderKind::ALL {
        println!("  {}:", kind.name().cyan());
        let models: Vec<String> = if kind == ProviderKind::Ollama {
            match list_ollama_models(config).await {
                Ok(models) if models.is_empty() => {
                    println!("    (no models found -- run `ollama pull {}`)", default_model_for(&kind));
                    Vec::new()
                }
                Ok(models) => models,
                Err(err) => {
                    debug!(%err, "ollama query failed");
                    println!("    {}", "(ollama not running)".dimmed());
                    Vec::new()
                }
            }
        } else {
            known_models(kind).iter().map(|m| m.to_string()).collect()
        };

        for model in &models {
            let current = kind == selection.provider && *model == selection.model;
            let marker = if current { " (selected)".green().to_string() } else { String::new() };
            println!("    {model}{marker}");
        }
        println!();
    }

    Ok(())
}

/// Query Ollama's local API for installed models.
async fn list_ollama_models(config: &Config) -> Result<Vec<String>> {
    let base_url = config
        .provider_entry("ollama")
        .and_then(|o| o.base_url.as_deref())
        .unwrap_or(crate::constants::OLLAMA_DEFAULT_BASE_URL);

    let url = format!("{}/api/tags", base_url.trim_end_matches('/'));
    let resp: serde_json::Value = reqwest::get(&url).await?.json().await?;

    Ok(parse_ollama_tags(&resp))
}

fn parse_ollama_tags(resp: &serde_json::Value) -> Vec<String> {
    resp["models"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|m| m["name"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
