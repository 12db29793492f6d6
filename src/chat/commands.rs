//! Slash command handlers for the chat REPL.
//!
//! Dispatches `/help`, `/clear`, `/history`, `/context`, `/exit` and `/quit`.
//! Returns a [`CommandAction`] so the REPL loop can decide how to proceed.

use std::path::Path;

use colored::Colorize;

use crate::context::{ContextBuilder, DirLister};
use crate::format;
use crate::message::Message;

/// Action returned by slash command handling.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum CommandAction {
    /// Command was handled; continue the REPL loop.
    Continue,
    /// Leave the REPL.
    Exit,
    /// Unknown command was entered.
    Unknown(String),
}

/// Dispatch and handle a slash command.
pub(crate) fn handle_slash_command<L: DirLister>(
    command: &str,
    history: &mut Vec<Message>,
    builder: &ContextBuilder<L>,
    working_dir: &Path,
) -> CommandAction {
    match command {
        "/history" => {
            if history.is_empty() {
                println!("{}", "No messages yet.".dimmed());
            }
            for msg in history.iter() {
                println!("{}", format::format_message(msg));
                println!();
            }
            CommandAction::Continue
        }
        "/clear" => {
            history.clear();
            println!("{}", "History cleared.".dimmed());
            CommandAction::Continue
        }
        "/context" => {
            let snapshot = builder.build(working_dir);
            if snapshot.is_empty() {
                println!("{}", "No eligible project files here.".dimmed());
            } else {
                println!("{}", snapshot.summary());
                for file in snapshot.files() {
                    println!(
                        "  {} {}",
                        file.relative_path(),
                        format!("({})", format::format_size(file.size_bytes())).dimmed()
                    );
                }
            }
            CommandAction::Continue
        }
        "/help" => {
            println!("{}", "Commands:".bold());
            println!("  {} - show conversation history", "/history".cyan());
            println!("  {} - clear conversation", "/clear".cyan());
            println!(
                "  {} - show which project files would be attached",
                "/context".cyan()
            );
            println!("  {} - show this help", "/help".cyan());
            println!("  {} - exit", "/exit, /quit, Ctrl+D".cyan());
            CommandAction::Continue
        }
        "/exit" | "/quit" => CommandAction::Exit,
        _ => CommandAction::Unknown(command.to_string()),
    }
}
