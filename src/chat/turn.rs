//! One conversational turn: decide on project context, build the prompt,
//! and wait for the provider (or the user giving up).

use std::future::Future;
use std::path::Path;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::classifier::classify;
use crate::config::ContextMode;
use crate::context::{augment_prompt, ContextBuilder, DirLister};
use crate::message::Message;
use crate::provider::{Generator, ProviderError};

/// The text sent to the provider for one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPrompt {
    pub text: String,
    /// Snapshot summary when project files were attached.
    pub context_summary: Option<String>,
}

impl PreparedPrompt {
    fn passthrough(message: &str) -> Self {
        Self {
            text: message.to_string(),
            context_summary: None,
        }
    }
}

/// Classifies `message` and, when project context applies, prepends a
/// snapshot of `working_dir`.
///
/// In [`ContextMode::Auto`] the classifier decides; `Always` attaches context
/// whenever eligible files exist, `Never` passes the message through. An empty
/// snapshot never changes the message.
pub fn prepare_prompt<L: DirLister>(
    message: &str,
    mode: ContextMode,
    builder: &ContextBuilder<L>,
    working_dir: &Path,
) -> PreparedPrompt {
    let wants_context = match mode {
        ContextMode::Never => false,
        ContextMode::Always => true,
        ContextMode::Auto => classify(message, || builder.has_eligible_files(working_dir, true))
            .needs_context(),
    };
    debug!(?mode, wants_context, "context decision");
    if !wants_context {
        return PreparedPrompt::passthrough(message);
    }

    let snapshot = builder.build(working_dir);
    if snapshot.is_empty() {
        return PreparedPrompt::passthrough(message);
    }
    PreparedPrompt {
        text: augment_prompt(&snapshot, message),
        context_summary: Some(snapshot.summary()),
    }
}

/// How a generation request ended.
#[derive(Debug)]
pub enum TurnOutcome {
    Reply(String),
    Failed(ProviderError),
    /// The interrupt fired before the provider answered.
    Interrupted,
}

/// Sends `prompt` and races the request against `interrupt`.
pub async fn generate_or_interrupt<G, F>(
    generator: &G,
    prompt: &str,
    history: &[Message],
    interrupt: F,
) -> TurnOutcome
where
    G: Generator + ?Sized,
    F: Future<Output = ()>,
{
    tokio::select! {
        result = generator.generate(prompt, history) => match result {
            Ok(reply) => TurnOutcome::Reply(reply),
            Err(err) => TurnOutcome::Failed(err),
        },
        _ = interrupt => TurnOutcome::Interrupted,
    }
}

/// A Ctrl+C listener armed before a turn starts.
///
/// Arming registers the signal listener up front, so a Ctrl+C that lands
/// while the snapshot is being built is still seen by [`Interrupt::fired`].
pub struct Interrupt {
    rx: oneshot::Receiver<()>,
    listener: Option<JoinHandle<()>>,
}

impl Interrupt {
    /// Spawns the listener and yields once so it registers before any
    /// blocking work on this thread.
    pub async fn arm() -> Self {
        let (tx, rx) = oneshot::channel();
        let listener = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    let _ = tx.send(());
                }
                Err(err) => debug!(%err, "ctrl-c handler unavailable"),
            }
        });
        tokio::task::yield_now().await;
        Self {
            rx,
            listener: Some(listener),
        }
    }

    #[cfg(test)]
    pub(super) fn from_channel(rx: oneshot::Receiver<()>) -> Self {
        Self { rx, listener: None }
    }

    /// Resolves once Ctrl+C was pressed since arming. Never resolves if the
    /// handler could not be installed.
    pub async fn fired(&mut self) {
        if (&mut self.rx).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl Drop for Interrupt {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}
