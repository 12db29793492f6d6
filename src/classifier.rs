//! Decides whether a message needs project context attached.
//!
//! Matching is phrase-based over the lower-cased message and runs in a fixed
//! order where the first match wins:
//!
//! 1. general-knowledge phrases ("what is", "define", ...) never get context,
//!    even when project words also appear;
//! 2. strong project references ("this project", "my code", ...) always do;
//! 3. weaker project keywords ("fix", "refactor", ...) do only when the
//!    working directory actually holds eligible files;
//! 4. everything else is general knowledge.

use std::path::Path;

use tracing::debug;

use crate::context::ContextBuilder;

/// Bumped whenever one of the phrase sets below changes.
pub const PHRASE_SET_VERSION: u32 = 1;

/// Phrases that mark an explicit request for general knowledge.
pub const GENERAL_KNOWLEDGE_PHRASES: &[&str] = &[
    "what is",
    "what's a",
    "what are the benefits of",
    "define ",
    "definition of",
    "tell me about",
    "explain the concept",
    "explain what",
    "meaning of",
    "history of",
    "who invented",
    "who is",
];

/// Phrases that clearly refer to the user's own project.
pub const PROJECT_REFERENCE_PHRASES: &[&str] = &[
    "this project",
    "my project",
    "our project",
    "this codebase",
    "the codebase",
    "my code",
    "our code",
    "this code",
    "this repository",
    "this repo",
    "my repo",
    "explain this",
    "how does this work",
    "in this directory",
    "these files",
];

/// Terms that suggest project work, but only when files are present.
pub const PROJECT_KEYWORDS: &[&str] = &[
    "implement",
    "fix",
    "bug",
    "refactor",
    "debug",
    "optimize",
    "review",
    "function",
    "class",
    "method",
    "module",
    "component",
    "architecture",
    "dependency",
    "dependencies",
    "test",
    "package.json",
    "cargo.toml",
    "readme",
    "config",
];

/// Outcome of classifying one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relevance {
    GeneralKnowledge,
    ProjectSpecific,
}

impl Relevance {
    pub fn needs_context(self) -> bool {
        self == Relevance::ProjectSpecific
    }
}

/// Classifies `message`.
///
/// `has_project_files` is only invoked when the decision hinges on it (a
/// project keyword with no stronger phrase), so the filesystem probe is
/// skipped for most messages.
pub fn classify(message: &str, has_project_files: impl FnOnce() -> bool) -> Relevance {
    let lowered = message.to_lowercase();

    if let Some(phrase) = find_phrase(&lowered, GENERAL_KNOWLEDGE_PHRASES) {
        debug!(phrase, version = PHRASE_SET_VERSION, "general-knowledge phrase");
        return Relevance::GeneralKnowledge;
    }

    if let Some(phrase) = find_phrase(&lowered, PROJECT_REFERENCE_PHRASES) {
        debug!(phrase, version = PHRASE_SET_VERSION, "project reference phrase");
        return Relevance::ProjectSpecific;
    }

    if let Some(keyword) = find_phrase(&lowered, PROJECT_KEYWORDS) {
        let has_files = has_project_files();
        debug!(keyword, has_files, "project keyword");
        if has_files {
            return Relevance::ProjectSpecific;
        }
    }

    Relevance::GeneralKnowledge
}

/// Classifies `message` against the files in `working_dir` using the
/// default exclusion rules.
#[allow(dead_code)]
pub fn classify_in(message: &str, working_dir: &Path) -> Relevance {
    let builder = ContextBuilder::new();
    classify(message, || builder.has_eligible_files(working_dir, true))
}

fn find_phrase(lowered: &str, phrases: &[&'static str]) -> Option<&'static str> {
    phrases.iter().copied().find(|p| lowered.contains(p))
}
