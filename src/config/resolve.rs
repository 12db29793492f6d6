//! Environment variable substitution, API key resolution, and typed accessors.

use anyhow::{anyhow, bail, Context, Result};

use super::types::{Config, ContextMode, ProviderEntry};
use crate::constants::{CONTEXT_MAX_DEPTH, CONTEXT_MAX_FILE_BYTES, CONTEXT_MAX_TOTAL_BYTES};
use crate::context::{ContextBuilder, ContextLimits, ExclusionRules};

/// Provider names accepted in `<provider>.<field>` config keys.
const PROVIDER_NAMES: &[&str] = &["anthropic", "openai", "openrouter", "ollama"];

impl Config {
    /// Resolve {env:VAR_NAME} patterns in string fields.
    pub(super) fn resolve_substitutions(&mut self) {
        self.model = Self::resolve_str(&self.model);
        if let Some(ref mut sp) = self.system_prompt {
            *sp = Self::resolve_str(sp);
        }
        if let Some(ref mut dp) = self.default_provider {
            *dp = Self::resolve_str(dp);
        }
        for entry in [
            &mut self.provider.anthropic,
            &mut self.provider.openai,
            &mut self.provider.openrouter,
            &mut self.provider.ollama,
        ]
        .into_iter()
        .flatten()
        {
            for value in [&mut entry.api_key, &mut entry.base_url, &mut entry.model]
                .into_iter()
                .flatten()
            {
                *value = Self::resolve_str(value);
            }
        }
    }

    /// Replace {env:VAR} with the environment variable value.
    pub(super) fn resolve_str(s: &str) -> String {
        let mut result = s.to_string();
        while let Some(start) = result.find("{env:") {
            let Some(end) = result[start..].find('}') else {
                break;
            };
            let var_name = &result[start + 5..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
        }
        result
    }

    /// The config entry for a provider name, if configured.
    pub fn provider_entry(&self, provider: &str) -> Option<&ProviderEntry> {
        match provider {
            "anthropic" => self.provider.anthropic.as_ref(),
            "openai" => self.provider.openai.as_ref(),
            "openrouter" => self.provider.openrouter.as_ref(),
            "ollama" => self.provider.ollama.as_ref(),
            _ => None,
        }
    }

    fn provider_entry_mut(&mut self, provider: &str) -> Option<&mut ProviderEntry> {
        let slot = match provider {
            "anthropic" => &mut self.provider.anthropic,
            "openai" => &mut self.provider.openai,
            "openrouter" => &mut self.provider.openrouter,
            "ollama" => &mut self.provider.ollama,
            _ => return None,
        };
        Some(slot.get_or_insert_with(ProviderEntry::default))
    }

    /// Resolve API key for a provider: env var first, then config value.
    ///
    /// Empty values (e.g. an unset `{env:VAR}` placeholder) count as missing.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        let env_key = format!("{}_API_KEY", provider.to_uppercase());
        if let Ok(val) = std::env::var(&env_key) {
            if !val.is_empty() {
                return Some(val);
            }
        }

        self.provider_entry(provider)
            .and_then(|e| e.api_key.clone())
            .filter(|k| !k.trim().is_empty())
    }

    /// Get the configured default provider name, if any.
    pub fn provider_name(&self) -> Option<&str> {
        self.default_provider.as_deref()
    }

    /// Get the model name from config, stripping provider prefix if present.
    /// Returns None if the model is the compile-time default (meaning user hasn't configured it).
    pub fn model_name(&self) -> Option<String> {
        let m = &self.model;
        if m == crate::constants::DEFAULT_MODEL {
            return None;
        }
        if let Some((_prov, model)) = m.split_once('/') {
            Some(model.to_string())
        } else {
            Some(m.to_string())
        }
    }

    /// How project context is attached, defaulting to [`ContextMode::Auto`].
    pub fn context_mode(&self) -> ContextMode {
        self.context.mode.unwrap_or_default()
    }

    /// Size and depth limits for context builds.
    pub fn context_limits(&self) -> ContextLimits {
        ContextLimits {
            max_depth: self.context.max_depth.unwrap_or(CONTEXT_MAX_DEPTH),
            max_file_bytes: self
                .context
                .max_file_kb
                .map(|kb| kb.saturating_mul(1024))
                .unwrap_or(CONTEXT_MAX_FILE_BYTES),
            max_total_bytes: self
                .context
                .max_total_kb
                .map(|kb| kb.saturating_mul(1024))
                .unwrap_or(CONTEXT_MAX_TOTAL_BYTES),
        }
    }

    /// A filesystem context builder using the configured rules and limits.
    pub fn context_builder(&self) -> ContextBuilder {
        let rules = ExclusionRules::default()
            .extended(&self.context.exclude_dirs, &self.context.exclude_patterns);
        ContextBuilder::new()
            .rules(rules)
            .limits(self.context_limits())
    }

    /// Sets a config value by dotted key, as used by `tomo config set`.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "model" => self.model = value.to_string(),
            "default_provider" => {
                crate::provider::ProviderKind::from_str(value)?;
                self.default_provider = Some(value.to_lowercase());
            }
            "system_prompt" => self.system_prompt = Some(value.to_string()),
            "context.mode" => {
                let mode = <ContextMode as clap::ValueEnum>::from_str(value, true)
                    .map_err(|_| anyhow!("Invalid context mode: {value}. Use auto, always, or never"))?;
                self.context.mode = Some(mode);
            }
            "context.max_depth" => self.context.max_depth = Some(parse_number(key, value)?),
            "context.max_file_kb" => self.context.max_file_kb = Some(parse_number(key, value)?),
            "context.max_total_kb" => self.context.max_total_kb = Some(parse_number(key, value)?),
            _ => {
                let Some((provider, field)) = key.split_once('.') else {
                    bail!("Unknown config key: {key}");
                };
                if !PROVIDER_NAMES.contains(&provider) {
                    bail!("Unknown config key: {key}");
                }
                let entry = self
                    .provider_entry_mut(provider)
                    .ok_or_else(|| anyhow!("Unknown provider: {provider}"))?;
                let slot = match field {
                    "api_key" => &mut entry.api_key,
                    "base_url" => &mut entry.base_url,
                    "model" => &mut entry.model,
                    _ => bail!("Unknown config key: {key}"),
                };
                *slot = Some(value.to_string());
            }
        }
        Ok(())
    }

    /// A copy with API keys masked, for display.
    pub fn masked(&self) -> Config {
        let mut copy = self.clone();
        for entry in [
            &mut copy.provider.anthropic,
            &mut copy.provider.openai,
            &mut copy.provider.openrouter,
            &mut copy.provider.ollama,
        ]
        .into_iter()
        .flatten()
        {
            if let Some(key) = entry.api_key.as_mut() {
                *key = mask_secret(key);
            }
        }
        copy
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow!("not a number: {value}"))
        .with_context(|| format!("Invalid value for {key}"))
}

/// Keeps `{env:...}` placeholders readable and hides literal keys.
fn mask_secret(key: &str) -> String {
    if key.starts_with("{env:") || key.is_empty() {
        return key.to_string();
    }
    let tail: String = key.chars().skip(key.chars().count().saturating_sub(4)).collect();
    format!("****{}", tail)
}
