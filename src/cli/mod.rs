//! Command-line interface definition and dispatch for tomo.
//!
//! Uses [`clap`] for argument parsing with derive macros. Each subcommand is
//! routed to its handler; the first-run wizard lives in the [`setup`]
//! submodule.

mod setup;

use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::chat::{self, TurnOutcome};
use crate::config::{Config, ContextMode};
use crate::format;
use crate::provider::{self, Provider};

/// Top-level CLI structure for tomo.
#[derive(Parser)]
#[command(
    name = "tomo",
    version,
    about = "Terminal chat with your project's files as context"
)]
pub struct Cli {
    /// Show debug logs on stderr (TOMO_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for the tomo CLI.
///
/// The `///` doc comments on variants double as `--help` text rendered by
/// clap.
#[derive(Subcommand)]
pub enum Commands {
    /// Ask a one-shot question
    Ask {
        /// The question to ask
        prompt: Vec<String>,
        /// Model to use (overrides config)
        #[arg(short, long)]
        model: Option<String>,
        /// Provider to use (anthropic, openai, openrouter, ollama)
        #[arg(short, long)]
        provider: Option<String>,
        /// When to attach project files (overrides config)
        #[arg(long, value_enum)]
        context: Option<ContextMode>,
    },
    /// Start an interactive chat session
    Chat {
        /// Provider to use (anthropic, openai, openrouter, ollama)
        #[arg(long)]
        provider: Option<String>,
        /// Model to use (overrides config)
        #[arg(short, long)]
        model: Option<String>,
        /// When to attach project files (overrides config)
        #[arg(long, value_enum)]
        context: Option<ContextMode>,
    },
    /// Configure a provider, API key and model
    Setup,
    /// List available models
    Models,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Subcommands for the `config` command.
///
/// Controls reading and writing tomo's TOML configuration file
/// stored at the XDG config path (`~/.config/tomo/config.toml`).
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current config (API keys masked)
    Show,
    /// Set a config value, e.g. `context.mode never` or `openai.api_key sk-...`
    Set { key: String, value: String },
    /// Print the config file path
    Path,
}

/// Parses command-line arguments into a [`Cli`] struct.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Dispatches the parsed CLI command to its handler.
pub async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Ask {
            prompt,
            model,
            provider: provider_name,
            context,
        } => {
            let prompt = prompt.join(" ");
            if prompt.trim().is_empty() {
                bail!("No prompt provided. Usage: tomo ask \"your question here\"");
            }

            let config = Config::load()?;
            let selection =
                provider::resolve_model(provider_name.as_deref(), model.as_deref(), &config)?;
            let provider = Provider::from_config(&config, &selection)?;

            let mode = context.unwrap_or_else(|| config.context_mode());
            let working_dir = std::env::current_dir()?;
            let mut interrupt = chat::Interrupt::arm().await;
            let prepared =
                chat::prepare_prompt(&prompt, mode, &config.context_builder(), &working_dir);

            println!(
                "{} [model: {}]",
                "tomo".bold().cyan(),
                selection.model.yellow(),
            );
            if let Some(summary) = &prepared.context_summary {
                println!("{}", format!("[context] {summary}").dimmed());
            }
            println!();

            match chat::generate_or_interrupt(&provider, &prepared.text, &[], interrupt.fired()).await
            {
                TurnOutcome::Reply(reply) => {
                    println!("{}", format::render_markdown_lite(&reply));
                    Ok(ExitCode::SUCCESS)
                }
                TurnOutcome::Failed(err) => Err(err.into()),
                TurnOutcome::Interrupted => {
                    println!("{}", chat::FAREWELL.dimmed());
                    Ok(ExitCode::from(chat::INTERRUPTED_EXIT_CODE))
                }
            }
        }
        Commands::Chat {
            provider: provider_name,
            model,
            context,
        } => {
            let config = Config::load()?;
            let selection =
                provider::resolve_model(provider_name.as_deref(), model.as_deref(), &config)?;
            let mode = context.unwrap_or_else(|| config.context_mode());
            chat::run_chat(&config, &selection, mode).await
        }
        Commands::Setup => {
            setup::run_setup()?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Models => {
            let config = Config::load()?;
            provider::list_models(&config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => {
                    let config = Config::load()?;
                    let path = Config::config_path()?;
                    println!("{} {}", "Config path:".bold(), path.display());
                    println!();
                    println!("{}", toml::to_string_pretty(&config.masked())?);
                }
                ConfigAction::Set { key, value } => {
                    let mut config = Config::load_global()?;
                    config.set_value(&key, &value)?;
                    config.save_global()?;
                    println!("{} {} = {}", "Set".green(), key.bold(), display_value(&key, &value));
                }
                ConfigAction::Path => {
                    println!("{}", Config::config_path()?.display());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Hides API keys echoed back by `config set`.
fn display_value(key: &str, value: &str) -> String {
    if key.ends_with(".api_key") {
        "****".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_context_override() {
        let cli = Cli::try_parse_from([
            "tomo", "ask", "--context", "never", "-p", "openai", "what", "is", "rust",
        ])
        .unwrap();
        let Commands::Ask {
            prompt,
            provider,
            context,
            model,
        } = cli.command
        else {
            panic!("expected ask");
        };
        assert_eq!(prompt.join(" "), "what is rust");
        assert_eq!(provider.as_deref(), Some("openai"));
        assert_eq!(context, Some(ContextMode::Never));
        assert_eq!(model, None);
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["tomo", "chat", "-v"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_invalid_context_mode_rejected() {
        assert!(Cli::try_parse_from(["tomo", "chat", "--context", "sometimes"]).is_err());
    }

    #[test]
    fn test_display_value_masks_keys() {
        assert_eq!(display_value("openai.api_key", "sk-secret"), "****");
        assert_eq!(display_value("context.mode", "never"), "never");
    }
}
