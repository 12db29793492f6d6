//! Greedy, ceiling-bounded snapshot construction.

use std::cmp::Ordering;
use std::path::Path;

use tracing::{debug, info};

use super::filter::ExclusionRules;
use super::snapshot::{ContextSnapshot, FileRecord};
use super::walker::{discover, Candidate, DirLister, FsLister};
use crate::constants::{
    CONTEXT_MAX_DEPTH, CONTEXT_MAX_FILE_BYTES, CONTEXT_MAX_TOTAL_BYTES, CONTEXT_SHALLOW_DEPTH,
    MANIFEST_FILES,
};
use crate::format::format_size;

/// Size and depth bounds for one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextLimits {
    pub max_depth: usize,
    pub max_file_bytes: u64,
    pub max_total_bytes: u64,
}

impl ContextLimits {
    /// Same limits, reduced to the shallow probe depth.
    pub fn shallow(self) -> Self {
        Self {
            max_depth: CONTEXT_SHALLOW_DEPTH,
            ..self
        }
    }
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            max_depth: CONTEXT_MAX_DEPTH,
            max_file_bytes: CONTEXT_MAX_FILE_BYTES,
            max_total_bytes: CONTEXT_MAX_TOTAL_BYTES,
        }
    }
}

/// Builds [`ContextSnapshot`]s for a working directory.
///
/// Never fails: unreadable directories are skipped, unreadable or oversized
/// files become placeholders, and files past the total ceiling are recorded
/// in [`ContextSnapshot::skipped_paths`].
pub struct ContextBuilder<L: DirLister = FsLister> {
    lister: L,
    rules: ExclusionRules,
    limits: ContextLimits,
}

impl ContextBuilder<FsLister> {
    /// A builder over the real filesystem with default rules and limits.
    pub fn new() -> Self {
        Self::with_lister(FsLister)
    }
}

impl Default for ContextBuilder<FsLister> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: DirLister> ContextBuilder<L> {
    pub fn with_lister(lister: L) -> Self {
        Self {
            lister,
            rules: ExclusionRules::default(),
            limits: ContextLimits::default(),
        }
    }

    pub fn rules(mut self, rules: ExclusionRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn limits(mut self, limits: ContextLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Cheap existence probe: is there at least one eligible file?
    ///
    /// With `shallow` set only the root and its immediate subdirectories are
    /// listed. The walk stops at the first eligible file.
    pub fn has_eligible_files(&self, working_dir: &Path, shallow: bool) -> bool {
        let depth = if shallow {
            self.limits.shallow().max_depth
        } else {
            self.limits.max_depth
        };
        !discover(&self.lister, working_dir, &self.rules, depth, true).is_empty()
    }

    /// Discovers, orders, reads, and aggregates eligible files.
    pub fn build(&self, working_dir: &Path) -> ContextSnapshot {
        let mut candidates = discover(
            &self.lister,
            working_dir,
            &self.rules,
            self.limits.max_depth,
            false,
        );
        candidates.sort_by(compare_significance);

        let mut files = Vec::new();
        let mut skipped = Vec::new();
        let mut total: u64 = 0;

        for candidate in candidates {
            let record = self.read_record(&candidate);
            let size = record.size_bytes();
            let over = total.saturating_add(size) > self.limits.max_total_bytes;
            if self.limits.max_total_bytes == 0 || over {
                debug!(
                    path = %candidate.relative_path,
                    size,
                    total,
                    "skipping file past total size ceiling"
                );
                skipped.push(candidate.relative_path);
                continue;
            }
            total += size;
            files.push(record);
        }

        let snapshot = ContextSnapshot::new(directory_label(working_dir), files, skipped);
        info!(
            files = snapshot.files().len(),
            bytes = snapshot.total_bytes(),
            skipped = snapshot.skipped_paths().len(),
            "built project context"
        );
        snapshot
    }

    fn read_record(&self, candidate: &Candidate) -> FileRecord {
        let content = if candidate.len > self.limits.max_file_bytes {
            format!("[File too large: {}]", format_size(candidate.len))
        } else {
            match self.lister.read_to_string(&candidate.absolute_path) {
                Ok(text) => text,
                Err(err) => {
                    debug!(path = %candidate.relative_path, %err, "unreadable file");
                    format!("[Error reading file: {}]", err)
                }
            }
        };
        FileRecord::new(candidate.relative_path.clone(), content)
    }
}

/// Sort rank: root-level manifests, then readmes, then everything else.
fn significance_rank(candidate: &Candidate) -> u8 {
    if MANIFEST_FILES.contains(&candidate.relative_path.as_str()) {
        0
    } else if candidate.name.to_lowercase().starts_with("readme") {
        1
    } else {
        2
    }
}

fn compare_significance(a: &Candidate, b: &Candidate) -> Ordering {
    significance_rank(a)
        .cmp(&significance_rank(b))
        .then_with(|| a.relative_path.cmp(&b.relative_path))
}

/// Base name of the working directory, falling back to the full path.
fn directory_label(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}
