//! File loading, merging, and saving for tomo configuration.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

use super::types::{default_model, Config, ContextConfig, ProviderConfig, ProviderEntry};

impl Config {
    /// Loads the global config from `~/.config/tomo/config.toml`.
    ///
    /// If no config file exists, creates one with sensible defaults
    /// (including `{env:VAR}` placeholders for API keys) and returns it.
    /// No substitution is applied, so the result is safe to save back.
    pub fn load_global() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            let default_toml = format!(
                r#"model = "{}"

[provider.anthropic]
api_key = "{{env:ANTHROPIC_API_KEY}}"

[provider.openai]
api_key = "{{env:OPENAI_API_KEY}}"

[provider.openrouter]
api_key = "{{env:OPENROUTER_API_KEY}}"

[provider.ollama]
base_url = "http://localhost:11434"

[context]
mode = "auto"
"#,
                default_model()
            );
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &default_toml)
                .with_context(|| format!("Failed to write default config to {:?}", path))?;
            debug!(path = %path.display(), "created default config");
            let config: Config = toml::from_str(&default_toml)
                .with_context(|| "Failed to parse default config".to_string())?;
            return Ok(config);
        }

        Self::load_file(&path)
    }

    /// Reads and parses a single TOML config file.
    pub(super) fn load_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {:?}", path))?;
        Ok(config)
    }

    /// Look for tomo.toml in current dir, then walk up to git root.
    pub(super) fn load_project() -> Result<Option<Config>> {
        let mut dir = std::env::current_dir()?;
        loop {
            let candidate = dir.join(crate::constants::PROJECT_CONFIG_FILENAME);
            if candidate.exists() {
                debug!(path = %candidate.display(), "using project config");
                return Self::load_file(&candidate).map(Some);
            }
            // Stop at git root or filesystem root
            if dir.join(".git").exists() || !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Merge project config over global config.
    /// Project values win when present.
    pub(super) fn merge(global: Config, project: Config) -> Config {
        Config {
            model: if project.model != default_model() {
                project.model
            } else {
                global.model
            },
            default_provider: project.default_provider.or(global.default_provider),
            system_prompt: project.system_prompt.or(global.system_prompt),
            provider: ProviderConfig {
                anthropic: merge_entry(global.provider.anthropic, project.provider.anthropic),
                openai: merge_entry(global.provider.openai, project.provider.openai),
                openrouter: merge_entry(global.provider.openrouter, project.provider.openrouter),
                ollama: merge_entry(global.provider.ollama, project.provider.ollama),
            },
            context: ContextConfig {
                mode: project.context.mode.or(global.context.mode),
                max_depth: project.context.max_depth.or(global.context.max_depth),
                max_file_kb: project.context.max_file_kb.or(global.context.max_file_kb),
                max_total_kb: project.context.max_total_kb.or(global.context.max_total_kb),
                exclude_dirs: [global.context.exclude_dirs, project.context.exclude_dirs].concat(),
                exclude_patterns: [
                    global.context.exclude_patterns,
                    project.context.exclude_patterns,
                ]
                .concat(),
            },
        }
    }

    /// Writes this config to the global config path.
    pub fn save_global(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, toml_str)
            .with_context(|| format!("Failed to write config to {:?}", path))?;
        Ok(())
    }
}

fn merge_entry(
    global: Option<ProviderEntry>,
    project: Option<ProviderEntry>,
) -> Option<ProviderEntry> {
    match (global, project) {
        (Some(g), Some(p)) => Some(ProviderEntry {
            api_key: p.api_key.or(g.api_key),
            base_url: p.base_url.or(g.base_url),
            model: p.model.or(g.model),
        }),
        (g, p) => p.or(g),
    }
}
