//! First-run wizard: pick a provider, store an API key, choose a model.

use anyhow::{bail, Result};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::config::Config;
use crate::provider::{default_model_for, ProviderKind};

/// Walks the user through provider setup and writes the global config.
///
/// Blank answers keep the suggested default. An empty API key leaves the
/// existing entry alone, so keys supplied through the environment keep
/// working.
pub fn run_setup() -> Result<()> {
    let mut config = Config::load_global()?;
    let mut rl = DefaultEditor::new()?;

    println!("{}", "tomo setup".bold().cyan());
    println!();
    for (i, kind) in ProviderKind::ALL.iter().enumerate() {
        println!("  {}. {}", i + 1, kind.display_name());
    }
    println!();

    let current = config
        .provider_name()
        .and_then(|name| ProviderKind::from_str(name).ok())
        .unwrap_or(ProviderKind::Anthropic);
    let Some(answer) = ask(&mut rl, &format!("Provider [{}]: ", current.name()))? else {
        println!("Cancelled.");
        return Ok(());
    };
    let kind = parse_provider_choice(&answer, current)?;

    if kind.needs_api_key() {
        let prompt = format!("{} API key (blank to use ${}): ", kind.display_name(), kind.api_key_env());
        let Some(key) = ask(&mut rl, &prompt)? else {
            println!("Cancelled.");
            return Ok(());
        };
        if !key.is_empty() {
            config.set_value(&format!("{}.api_key", kind.name()), &key)?;
        }
    } else {
        let Some(url) = ask(&mut rl, "Ollama base URL [http://localhost:11434]: ")? else {
            println!("Cancelled.");
            return Ok(());
        };
        if !url.is_empty() {
            config.set_value("ollama.base_url", &url)?;
        }
    }

    let suggested = config
        .provider_entry(kind.name())
        .and_then(|e| e.model.clone())
        .unwrap_or_else(|| default_model_for(&kind).to_string());
    let Some(model) = ask(&mut rl, &format!("Model [{suggested}]: "))? else {
        println!("Cancelled.");
        return Ok(());
    };
    let model = if model.is_empty() { suggested } else { model };

    config.set_value("default_provider", kind.name())?;
    config.set_value(&format!("{}.model", kind.name()), &model)?;
    config.save_global()?;

    println!();
    println!(
        "{} {} with {} saved to {}",
        "✓".green(),
        kind.display_name().bold(),
        model.yellow(),
        Config::config_path()?.display()
    );
    Ok(())
}

/// Reads one trimmed line. `None` when the user cancels with Ctrl+C/Ctrl+D.
fn ask(rl: &mut DefaultEditor, prompt: &str) -> Result<Option<String>> {
    match rl.readline(prompt) {
        Ok(line) => Ok(Some(line.trim().to_string())),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Accepts a menu number or a provider name; blank keeps `current`.
fn parse_provider_choice(answer: &str, current: ProviderKind) -> Result<ProviderKind> {
    if answer.is_empty() {
        return Ok(current);
    }
    if let Ok(n) = answer.parse::<usize>() {
        return match n.checked_sub(1).and_then(|i| ProviderKind::ALL.get(i)) {
            Some(kind) => Ok(*kind),
            None => bail!("No provider numbered {n}"),
        };
    }
    ProviderKind::from_str(answer)
}
