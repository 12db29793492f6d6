//! Eligibility and exclusion rules for project files.

use glob::Pattern;
use tracing::warn;

use crate::constants::{
    DEFAULT_EXCLUDED_DIRS, DEFAULT_EXCLUDED_PATTERNS, ENV_TEMPLATE_FILES, SUPPORTED_EXTENSIONS,
};

/// Returns `true` if a file name passes the extension/dotfile allow-list.
///
/// Dotfiles (`.gitignore`, `.env.example`, ...) are always allowed; every
/// other file needs an extension from [`SUPPORTED_EXTENSIONS`], compared
/// case-insensitively.
pub fn is_supported_file(name: &str) -> bool {
    if name.starts_with('.') {
        return true;
    }
    match extension_of(name) {
        Some(ext) => SUPPORTED_EXTENSIONS.contains(&ext.as_str()),
        None => false,
    }
}

/// Lower-cased extension of a file name, or `None` for extension-less names.
///
/// A leading dot does not start an extension, so `.gitignore` has none.
pub fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Exclusion rules applied while walking the project tree.
///
/// Substring rules prune directories whose name contains the substring;
/// a rule starting with `.` (`.git`) only prunes that exact name, so
/// `.github` is still walked. Glob rules (`*` wildcards) prune any entry whose relative path or bare
/// name matches.
#[derive(Debug, Clone)]
pub struct ExclusionRules {
    dir_substrings: Vec<String>,
    patterns: Vec<Pattern>,
}

impl ExclusionRules {
    /// Builds rules from explicit substring and glob lists.
    ///
    /// Invalid glob patterns are logged and dropped.
    pub fn new<S, P>(dir_substrings: S, patterns: P) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .filter_map(|p| match Pattern::new(p.as_ref()) {
                Ok(pattern) => Some(pattern),
                Err(err) => {
                    warn!(pattern = p.as_ref(), %err, "ignoring invalid exclusion pattern");
                    None
                }
            })
            .collect();
        Self {
            dir_substrings: dir_substrings.into_iter().map(Into::into).collect(),
            patterns,
        }
    }

    /// Appends extra substrings and patterns (from configuration) to these rules.
    pub fn extended(mut self, dir_substrings: &[String], patterns: &[String]) -> Self {
        let extra = Self::new(dir_substrings.iter().cloned(), patterns);
        self.dir_substrings.extend(extra.dir_substrings);
        self.patterns.extend(extra.patterns);
        self
    }

    /// Whether a directory entry should be pruned before recursion.
    pub fn excludes_dir(&self, name: &str, relative_path: &str) -> bool {
        self.dir_substrings.iter().any(|s| dir_rule_matches(s, name))
            || self.matches_pattern(name, relative_path)
    }

    /// Whether a file entry should be dropped. Env templates are always kept.
    pub fn excludes_file(&self, name: &str, relative_path: &str) -> bool {
        if ENV_TEMPLATE_FILES.contains(&name) {
            return false;
        }
        self.matches_pattern(name, relative_path)
    }

    fn matches_pattern(&self, name: &str, relative_path: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches(relative_path) || p.matches(name))
    }
}

fn dir_rule_matches(rule: &str, name: &str) -> bool {
    if rule.starts_with('.') {
        name == rule
    } else {
        name.contains(rule)
    }
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self::new(
            DEFAULT_EXCLUDED_DIRS.iter().copied(),
            DEFAULT_EXCLUDED_PATTERNS.iter().copied(),
        )
    }
}
