//! Project context snapshots for prompt enrichment.
//!
//! Walks the working directory (depth-bounded, with exclusion rules), orders
//! eligible files so the most informative ones come first, and greedily packs
//! them into a [`ContextSnapshot`] under per-file and total byte ceilings.
//! [`serialize`] renders the snapshot as the text block that is prepended to
//! the user's question.

mod builder;
mod filter;
mod snapshot;
mod walker;

pub use builder::{ContextBuilder, ContextLimits};
pub use filter::ExclusionRules;
pub use snapshot::{serialize, ContextSnapshot, FileRecord};
#[allow(unused_imports)]
pub use walker::{DirLister, EntryKind, FsLister, ListedEntry};

use std::path::Path;

use crate::constants::CONTEXT_INSTRUCTION;

/// Builds a snapshot of `working_dir` with default rules and serializes it.
#[allow(dead_code)]
pub fn build_and_serialize(working_dir: &Path) -> String {
    serialize(&ContextBuilder::new().build(working_dir))
}

/// Whether `working_dir` holds at least one eligible file.
#[allow(dead_code)]
pub fn has_eligible_files(working_dir: &Path, shallow: bool) -> bool {
    ContextBuilder::new().has_eligible_files(working_dir, shallow)
}

/// Prepends the serialized snapshot and the answer instruction to `question`.
///
/// An empty snapshot adds nothing, so the question is returned unchanged.
pub fn augment_prompt(snapshot: &ContextSnapshot, question: &str) -> String {
    if snapshot.is_empty() {
        return question.to_string();
    }
    format!(
        "{}\n\n{}\n\n{}",
        serialize(snapshot),
        CONTEXT_INSTRUCTION,
        question
    )
}

#[cfg(test)]
mod tests;
