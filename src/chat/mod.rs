//! Interactive chat REPL for tomo.
//!
//! Provides a multi-turn conversation loop using [`rustyline`] for readline
//! support (history, line editing). Each message is classified and, when it
//! is about the project, sent with a snapshot of the working directory. The
//! in-memory history is sent with each request so the LLM keeps context
//! across turns; it stores the questions as typed, not the augmented prompts.

mod commands;
mod turn;

pub use turn::{generate_or_interrupt, prepare_prompt, Interrupt, TurnOutcome};

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::config::{Config, ContextMode};
use crate::format;
use crate::message::Message;
use crate::provider::{Generator, ModelSelection, Provider};

/// Printed when the user leaves the REPL.
pub const FAREWELL: &str = "goodbye.";

/// Exit code used when a request is interrupted with Ctrl+C.
pub const INTERRUPTED_EXIT_CODE: u8 = 130;

/// Runs the interactive chat REPL.
///
/// # Readline behavior
///
/// - **Ctrl+C**: at the prompt or during a request, exits with "goodbye."
/// - **Ctrl+D**: exits cleanly with "goodbye."
/// - Readline history is persisted to `~/.cache/tomo/chat_history.txt`
///
/// Provider failures are reported and the turn is dropped from history so
/// the user can retry.
pub async fn run_chat(
    config: &Config,
    selection: &ModelSelection,
    mode: ContextMode,
) -> Result<ExitCode> {
    let provider = Provider::from_config(config, selection)?;
    let builder = config.context_builder();
    let working_dir = std::env::current_dir()?;

    println!(
        "{} [{}] [model: {}] [context: {}] (Ctrl+D to exit, /help for commands)",
        "tomo chat".bold().cyan(),
        selection.provider.name(),
        provider.model().yellow(),
        format!("{mode:?}").to_lowercase(),
    );
    println!();

    let mut rl = DefaultEditor::new()?;
    let history_path = Config::cache_dir()?.join(crate::constants::HISTORY_FILENAME);
    if history_path.exists() {
        let _ = rl.load_history(&history_path);
    }

    let mut history: Vec<Message> = Vec::new();
    let mut exit_code = ExitCode::SUCCESS;

    loop {
        let readline = rl.readline(&format!("{} ", ">".green().bold()));

        match readline {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }

                if line.starts_with('/') {
                    match commands::handle_slash_command(
                        &line,
                        &mut history,
                        &builder,
                        &working_dir,
                    ) {
                        commands::CommandAction::Continue => continue,
                        commands::CommandAction::Exit => {
                            println!("{}", FAREWELL.dimmed());
                            break;
                        }
                        commands::CommandAction::Unknown(cmd) => {
                            println!("{} Unknown command: {}", "?".yellow(), cmd);
                            continue;
                        }
                    }
                }

                let _ = rl.add_history_entry(&line);

                let mut interrupt = Interrupt::arm().await;
                let prepared = prepare_prompt(&line, mode, &builder, &working_dir);
                if let Some(summary) = &prepared.context_summary {
                    println!("{}", format!("[context] {summary}").dimmed());
                }
                println!();

                match generate_or_interrupt(&provider, &prepared.text, &history, interrupt.fired())
                    .await
                {
                    TurnOutcome::Reply(reply) => {
                        println!("{}", format::render_markdown_lite(&reply));
                        history.push(Message::user(line));
                        history.push(Message::assistant(reply));
                        debug!(turns = history.len() / 2, "turn recorded");
                    }
                    TurnOutcome::Failed(err) => {
                        debug!(detail = err.detail().unwrap_or_default(), "turn dropped");
                        eprintln!("{} {}", "error:".red().bold(), err);
                    }
                    TurnOutcome::Interrupted => {
                        println!("{}", FAREWELL.dimmed());
                        exit_code = ExitCode::from(INTERRUPTED_EXIT_CODE);
                        break;
                    }
                }
                println!();
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("{}", FAREWELL.dimmed());
                break;
            }
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                break;
            }
        }
    }

    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = rl.save_history(&history_path);

    Ok(exit_code)
}
