//! Entry point for tomo, a terminal chat client that can ground its answers
//! in the files of the current project.
//!
//! This binary loads environment variables, parses CLI arguments via [`cli`],
//! installs logging, and dispatches to the appropriate subcommand handler.

mod chat;
mod classifier;
mod cli;
mod config;
mod constants;
mod context;
mod format;
mod logging;
mod message;
mod provider;

use std::process::ExitCode;

use colored::Colorize;

/// Runs the tomo CLI.
///
/// Loads `.env` files (silently ignored if absent), parses command-line
/// arguments into a [`cli::Cli`] struct, and dispatches the chosen
/// subcommand via [`cli::run`]. Errors are printed once and exit with 1.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = cli::parse();
    logging::init(cli.verbose);

    match cli::run(cli).await {
        Ok(code) => code,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
