//! Snapshot types and the prompt-ready text serialization.

use std::collections::BTreeMap;

use super::filter::extension_of;
use crate::format::format_size;

/// Histogram bucket for files without an extension.
const NO_EXTENSION_BUCKET: &str = "config";

/// One file included in a [`ContextSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    relative_path: String,
    content: String,
}

impl FileRecord {
    pub(super) fn new(relative_path: String, content: String) -> Self {
        Self {
            relative_path,
            content,
        }
    }

    /// `/`-separated path relative to the working directory.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// File text, or a placeholder for oversized/unreadable files.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Byte length of [`content`](Self::content) as serialized.
    pub fn size_bytes(&self) -> u64 {
        self.content.len() as u64
    }
}

/// The immutable result of one context build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSnapshot {
    working_directory_label: String,
    files: Vec<FileRecord>,
    total_bytes: u64,
    skipped_paths: Vec<String>,
}

impl ContextSnapshot {
    pub(super) fn new(
        working_directory_label: String,
        files: Vec<FileRecord>,
        skipped_paths: Vec<String>,
    ) -> Self {
        let total_bytes = files.iter().map(FileRecord::size_bytes).sum();
        Self {
            working_directory_label,
            files,
            total_bytes,
            skipped_paths,
        }
    }

    pub fn working_directory_label(&self) -> &str {
        &self.working_directory_label
    }

    /// Included files in significance order.
    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Paths dropped because the total size ceiling was reached.
    pub fn skipped_paths(&self) -> &[String] {
        &self.skipped_paths
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Extension histogram, alphabetical by bucket.
    pub fn file_types(&self) -> BTreeMap<String, usize> {
        let mut types = BTreeMap::new();
        for file in &self.files {
            let name = file
                .relative_path
                .rsplit('/')
                .next()
                .unwrap_or(&file.relative_path);
            let bucket = extension_of(name).unwrap_or_else(|| NO_EXTENSION_BUCKET.to_string());
            *types.entry(bucket).or_insert(0) += 1;
        }
        types
    }

    /// One-line description: file count, size, types, and skip count.
    pub fn summary(&self) -> String {
        let types = if self.files.is_empty() {
            "none".to_string()
        } else {
            self.file_types()
                .into_iter()
                .map(|(ext, count)| format!("{}({})", ext, count))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut line = format!(
            "Found {} files ({}) in {}. File types: {}",
            self.files.len(),
            format_size(self.total_bytes),
            self.working_directory_label,
            types
        );
        if !self.skipped_paths.is_empty() {
            line.push_str(&format!(
                " Skipped {} files due to size limits.",
                self.skipped_paths.len()
            ));
        }
        line
    }
}

/// Renders a snapshot as the text block injected into the prompt.
pub fn serialize(snapshot: &ContextSnapshot) -> String {
    let mut out = String::with_capacity(snapshot.total_bytes as usize + 256);
    out.push_str("=== PROJECT CONTEXT ===\n");
    out.push_str(&format!(
        "Working Directory: {}\n",
        snapshot.working_directory_label
    ));
    out.push_str(&snapshot.summary());
    out.push_str("\n\n");

    for file in &snapshot.files {
        out.push_str(&format!("=== FILE: {} ===\n", file.relative_path));
        out.push_str(&file.content);
        out.push_str("\n\n");
    }

    out.push_str("=== END CONTEXT ===");
    out
}
