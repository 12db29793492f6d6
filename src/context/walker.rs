//! Depth-bounded discovery of eligible project files.
//!
//! Directory access goes through the [`DirLister`] trait so the walk can run
//! against an in-memory tree in tests. The walk itself is an explicit stack
//! with a depth counter per directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::filter::{is_supported_file, ExclusionRules};

/// What a listed directory entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// A symlink to a directory. Never descended into.
    SymlinkDir,
    /// Anything else (sockets, broken links, ...).
    Other,
}

/// One entry returned by [`DirLister::list`].
#[derive(Debug, Clone)]
pub struct ListedEntry {
    pub name: String,
    pub kind: EntryKind,
    /// Size in bytes as reported by the filesystem (0 for non-files).
    pub len: u64,
}

/// Read access to a directory tree.
pub trait DirLister {
    /// Lists the immediate children of `dir`.
    fn list(&self, dir: &Path) -> io::Result<Vec<ListedEntry>>;

    /// Reads a file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

impl<T: DirLister + ?Sized> DirLister for &T {
    fn list(&self, dir: &Path) -> io::Result<Vec<ListedEntry>> {
        (**self).list(dir)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }
}

/// [`DirLister`] over the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLister;

impl DirLister for FsLister {
    fn list(&self, dir: &Path) -> io::Result<Vec<ListedEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            // Entries that vanish mid-listing are skipped
            let Ok(entry) = entry else { continue };
            let name = entry.file_name().to_string_lossy().into_owned();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            let (kind, len) = if file_type.is_symlink() {
                // Follow the link once to learn what it points at
                match fs::metadata(entry.path()) {
                    Ok(meta) if meta.is_dir() => (EntryKind::SymlinkDir, 0),
                    Ok(meta) if meta.is_file() => (EntryKind::File, meta.len()),
                    _ => (EntryKind::Other, 0),
                }
            } else if file_type.is_dir() {
                (EntryKind::Dir, 0)
            } else if file_type.is_file() {
                let len = entry.metadata().map(|m| m.len()).unwrap_or(0);
                (EntryKind::File, len)
            } else {
                (EntryKind::Other, 0)
            };

            entries.push(ListedEntry { name, kind, len });
        }
        Ok(entries)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// An eligible file found during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// `/`-separated path relative to the walk root.
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub name: String,
    pub len: u64,
}

/// Walks `root` and returns every eligible file up to `max_depth`.
///
/// The root directory sits at depth 0 and a directory at depth `d` is listed
/// only while `d <= max_depth`. Excluded entries are pruned before recursion
/// and unreadable directories are skipped. When `stop_at_first` is set the
/// walk returns as soon as one candidate is found.
pub fn discover(
    lister: &dyn DirLister,
    root: &Path,
    rules: &ExclusionRules,
    max_depth: usize,
    stop_at_first: bool,
) -> Vec<Candidate> {
    let mut found = Vec::new();
    // (absolute dir, relative prefix, depth)
    let mut stack: Vec<(PathBuf, String, usize)> = vec![(root.to_path_buf(), String::new(), 0)];

    while let Some((dir, prefix, depth)) = stack.pop() {
        let mut entries = match lister.list(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(dir = %dir.display(), %err, "skipping unreadable directory");
                continue;
            }
        };
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        let mut subdirs = Vec::new();
        for entry in entries {
            let relative = if prefix.is_empty() {
                entry.name.clone()
            } else {
                format!("{}/{}", prefix, entry.name)
            };

            match entry.kind {
                EntryKind::Dir => {
                    if rules.excludes_dir(&entry.name, &relative) {
                        debug!(path = %relative, "pruned directory");
                        continue;
                    }
                    if depth < max_depth {
                        subdirs.push((dir.join(&entry.name), relative, depth + 1));
                    }
                }
                EntryKind::File => {
                    if !is_supported_file(&entry.name)
                        || rules.excludes_file(&entry.name, &relative)
                    {
                        continue;
                    }
                    found.push(Candidate {
                        relative_path: relative,
                        absolute_path: dir.join(&entry.name),
                        name: entry.name,
                        len: entry.len,
                    });
                    if stop_at_first {
                        return found;
                    }
                }
                EntryKind::SymlinkDir | EntryKind::Other => {}
            }
        }

        // Reverse so the stack pops subdirectories in name order
        stack.extend(subdirs.into_iter().rev());
    }

    found
}
