use super::*;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

/// In-memory directory tree. `None` content marks an unreadable file.
#[derive(Default)]
struct MemLister {
    files: BTreeMap<PathBuf, Option<String>>,
    unreadable_dirs: BTreeSet<PathBuf>,
    reads: RefCell<Vec<PathBuf>>,
}

impl MemLister {
    fn new() -> Self {
        Self::default()
    }

    fn file(mut self, path: &str, content: impl Into<String>) -> Self {
        self.files
            .insert(Path::new("/proj").join(path), Some(content.into()));
        self
    }

    fn unreadable_file(mut self, path: &str) -> Self {
        self.files.insert(Path::new("/proj").join(path), None);
        self
    }

    fn unreadable_dir(mut self, path: &str) -> Self {
        self.unreadable_dirs.insert(Path::new("/proj").join(path));
        self
    }

    fn was_read(&self, path: &str) -> bool {
        self.reads
            .borrow()
            .iter()
            .any(|p| p == &Path::new("/proj").join(path))
    }
}

impl DirLister for MemLister {
    fn list(&self, dir: &Path) -> io::Result<Vec<ListedEntry>> {
        if self.unreadable_dirs.contains(dir) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        }
        let mut entries: BTreeMap<String, ListedEntry> = BTreeMap::new();
        for (path, content) in &self.files {
            let Ok(rest) = path.strip_prefix(dir) else {
                continue;
            };
            let mut parts = rest.components();
            let Some(first) = parts.next() else { continue };
            let name = first.as_os_str().to_string_lossy().into_owned();
            let entry = if parts.next().is_some() {
                ListedEntry {
                    name: name.clone(),
                    kind: EntryKind::Dir,
                    len: 0,
                }
            } else {
                ListedEntry {
                    name: name.clone(),
                    kind: EntryKind::File,
                    len: content.as_ref().map(|c| c.len() as u64).unwrap_or(10),
                }
            };
            entries.insert(name, entry);
        }
        if entries.is_empty() && dir != Path::new("/proj") {
            return Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        }
        // Unsorted on purpose: the walker must impose its own order
        Ok(entries.into_values().rev().collect())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.reads.borrow_mut().push(path.to_path_buf());
        match self.files.get(path) {
            Some(Some(content)) => Ok(content.clone()),
            Some(None) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            )),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "not found")),
        }
    }
}

fn paths(snapshot: &ContextSnapshot) -> Vec<&str> {
    snapshot.files().iter().map(|f| f.relative_path()).collect()
}

fn root() -> &'static Path {
    Path::new("/proj")
}

#[test]
fn test_manifest_then_readme_then_lexicographic() {
    let lister = MemLister::new()
        .file("src/app.js", "app")
        .file("index.js", "index")
        .file("a.md", "notes")
        .file("docs/readme.txt", "more docs")
        .file("README.md", "# readme")
        .file("package.json", "{}");
    let snapshot = ContextBuilder::with_lister(lister).build(root());
    assert_eq!(
        paths(&snapshot),
        vec![
            "package.json",
            "README.md",
            "docs/readme.txt",
            "a.md",
            "index.js",
            "src/app.js",
        ]
    );
}

#[test]
fn test_nested_manifest_is_not_promoted() {
    let lister = MemLister::new()
        .file("web/package.json", "{}")
        .file("app.js", "x");
    let snapshot = ContextBuilder::with_lister(lister).build(root());
    assert_eq!(paths(&snapshot), vec!["app.js", "web/package.json"]);
}

#[test]
fn test_architecture_scenario_order() {
    let lister = MemLister::new()
        .file("index.js", "console.log('hi')")
        .file("README.md", "# demo")
        .file("package.json", "{\"name\":\"demo\"}");
    let snapshot = ContextBuilder::with_lister(lister).build(root());
    assert_eq!(paths(&snapshot), vec!["package.json", "README.md", "index.js"]);
    assert_eq!(snapshot.working_directory_label(), "proj");
}

#[test]
fn test_ineligible_files_are_never_recorded() {
    let lister = MemLister::new()
        .file("logo.png", "binary")
        .file("Makefile", "all:")
        .file(".gitignore", "target")
        .file("main.rs", "fn main() {}");
    let snapshot = ContextBuilder::with_lister(lister).build(root());
    assert_eq!(paths(&snapshot), vec![".gitignore", "main.rs"]);
    assert!(snapshot.skipped_paths().is_empty());
}

#[test]
fn test_excluded_dirs_are_pruned() {
    let lister = MemLister::new()
        .file("node_modules/dep/index.js", "dep")
        .file(".git/config.toml", "x")
        .file("dist/bundle.js", "x")
        .file("app.log", "log line")
        .file("src/lib.rs", "pub fn f() {}");
    let builder = ContextBuilder::with_lister(lister);
    let snapshot = builder.build(root());
    assert_eq!(paths(&snapshot), vec!["src/lib.rs"]);
    assert!(snapshot.skipped_paths().is_empty());
}

#[test]
fn test_oversized_file_gets_size_placeholder() {
    let lister = MemLister::new().file("big.js", "x".repeat(60 * 1024));
    let snapshot = ContextBuilder::with_lister(&lister).build(root());
    assert_eq!(snapshot.files().len(), 1);
    assert_eq!(snapshot.files()[0].content(), "[File too large: 60.0 KB]");
    assert_eq!(
        snapshot.total_bytes(),
        "[File too large: 60.0 KB]".len() as u64
    );
    assert!(!lister.was_read("big.js"));
}

#[test]
fn test_unreadable_file_gets_error_placeholder() {
    let lister = MemLister::new()
        .unreadable_file("secret.rs")
        .file("ok.rs", "fn ok() {}");
    let snapshot = ContextBuilder::with_lister(lister).build(root());
    assert_eq!(paths(&snapshot), vec!["ok.rs", "secret.rs"]);
    assert!(snapshot.files()[1]
        .content()
        .starts_with("[Error reading file:"));
}

#[test]
fn test_unreadable_dir_is_skipped() {
    let lister = MemLister::new()
        .file("locked/inner.rs", "x")
        .file("open/inner.rs", "y")
        .unreadable_dir("locked");
    let snapshot = ContextBuilder::with_lister(lister).build(root());
    assert_eq!(paths(&snapshot), vec!["open/inner.rs"]);
}

#[test]
fn test_total_ceiling_skips_and_continues() {
    let lister = MemLister::new()
        .file("a.js", "a".repeat(60))
        .file("b.js", "b".repeat(50))
        .file("c.js", "c".repeat(30));
    let snapshot = ContextBuilder::with_lister(lister)
        .limits(ContextLimits {
            max_depth: 3,
            max_file_bytes: 1000,
            max_total_bytes: 100,
        })
        .build(root());
    assert_eq!(paths(&snapshot), vec!["a.js", "c.js"]);
    assert_eq!(snapshot.skipped_paths(), ["b.js".to_string()]);
    assert_eq!(snapshot.total_bytes(), 90);
}

#[test]
fn test_default_ceilings_with_250_kib_of_candidates() {
    let mut lister = MemLister::new();
    for name in ["a.js", "b.js", "c.js", "d.js", "e.js"] {
        lister = lister.file(name, "x".repeat(50 * 1024));
    }
    let snapshot = ContextBuilder::with_lister(lister).build(root());
    assert_eq!(snapshot.files().len(), 4);
    assert_eq!(snapshot.skipped_paths(), ["e.js".to_string()]);
    assert!(snapshot.total_bytes() <= 200 * 1024);
}

#[test]
fn test_zero_ceiling_includes_nothing() {
    let lister = MemLister::new().file("a.rs", "").file("b.rs", "b");
    let snapshot = ContextBuilder::with_lister(lister)
        .limits(ContextLimits {
            max_total_bytes: 0,
            ..ContextLimits::default()
        })
        .build(root());
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.skipped_paths().len(), 2);
}

#[test]
fn test_depth_bound() {
    let lister = MemLister::new()
        .file("a.rs", "0")
        .file("d1/b.rs", "1")
        .file("d1/d2/c.rs", "2")
        .file("d1/d2/d3/d.rs", "3")
        .file("d1/d2/d3/d4/e.rs", "4");
    let snapshot = ContextBuilder::with_lister(lister).build(root());
    assert_eq!(
        paths(&snapshot),
        vec!["a.rs", "d1/b.rs", "d1/d2/c.rs", "d1/d2/d3/d.rs"]
    );
}

#[test]
fn test_shallow_probe_only_looks_one_level_down() {
    let deep = ContextBuilder::with_lister(MemLister::new().file("d1/d2/x.rs", "x"));
    assert!(!deep.has_eligible_files(root(), true));
    assert!(deep.has_eligible_files(root(), false));

    let near = ContextBuilder::with_lister(MemLister::new().file("d1/x.rs", "x"));
    assert!(near.has_eligible_files(root(), true));
}

#[test]
fn test_probe_ignores_ineligible_and_excluded() {
    let builder = ContextBuilder::with_lister(
        MemLister::new()
            .file("photo.jpg", "x")
            .file("node_modules/a.js", "x"),
    );
    assert!(!builder.has_eligible_files(root(), true));
}

#[test]
fn test_build_is_idempotent() {
    let lister = MemLister::new()
        .file("package.json", "{}")
        .file("src/z.rs", "z".repeat(40))
        .file("src/a.rs", "a".repeat(40))
        .file("README.md", "r".repeat(40));
    let builder = ContextBuilder::with_lister(lister).limits(ContextLimits {
        max_depth: 3,
        max_file_bytes: 100,
        max_total_bytes: 90,
    });
    let first = builder.build(root());
    let second = builder.build(root());
    assert_eq!(first, second);
    assert_eq!(first.skipped_paths(), second.skipped_paths());
}

#[test]
fn test_serialize_format() {
    let lister = MemLister::new()
        .file("package.json", "{}")
        .file("src/main.rs", "fn main() {}");
    let snapshot = ContextBuilder::with_lister(lister).build(root());
    let expected = "=== PROJECT CONTEXT ===\n\
Working Directory: proj\n\
Found 2 files (14 B) in proj. File types: json(1), rs(1)\n\
\n\
=== FILE: package.json ===\n\
{}\n\
\n\
=== FILE: src/main.rs ===\n\
fn main() {}\n\
\n\
=== END CONTEXT ===";
    assert_eq!(serialize(&snapshot), expected);
}

#[test]
fn test_summary_mentions_skips_and_config_bucket() {
    let lister = MemLister::new()
        .file(".editorconfig", "root = true")
        .file("a.rs", "a".repeat(100))
        .file("b.rs", "b".repeat(100));
    let snapshot = ContextBuilder::with_lister(lister)
        .limits(ContextLimits {
            max_depth: 3,
            max_file_bytes: 1000,
            max_total_bytes: 150,
        })
        .build(root());
    let summary = snapshot.summary();
    assert!(summary.contains("File types: config(1), rs(1)"));
    assert!(summary.ends_with("Skipped 1 files due to size limits."));
}

#[test]
fn test_augment_prompt() {
    let lister = MemLister::new().file("main.rs", "fn main() {}");
    let snapshot = ContextBuilder::with_lister(lister).build(root());
    let prompt = augment_prompt(&snapshot, "Explain this project's architecture");
    assert!(prompt.starts_with("=== PROJECT CONTEXT ==="));
    assert!(prompt.ends_with(
        "=== END CONTEXT ===\n\n\
Please answer the following question using the project files above as reference:\n\n\
Explain this project's architecture"
    ));
}

#[test]
fn test_augment_prompt_with_empty_snapshot_passes_through() {
    let snapshot = ContextBuilder::with_lister(MemLister::new()).build(root());
    assert_eq!(augment_prompt(&snapshot, "hello"), "hello");
}

#[test]
fn test_real_filesystem_build() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::write(root.join("index.js"), "console.log(1);").unwrap();
    std::fs::write(root.join("README.md"), "# demo").unwrap();
    std::fs::write(root.join("package.json"), "{}").unwrap();
    std::fs::write(root.join("image.png"), [0u8, 1, 2]).unwrap();
    std::fs::create_dir_all(root.join("node_modules/dep")).unwrap();
    std::fs::write(root.join("node_modules/dep/index.js"), "dep").unwrap();

    #[cfg(unix)]
    std::os::unix::fs::symlink(root, root.join("loop")).unwrap();

    let snapshot = ContextBuilder::new().build(root);
    assert_eq!(paths(&snapshot), vec!["package.json", "README.md", "index.js"]);
    assert!(has_eligible_files(root, true));

    let block = build_and_serialize(root);
    assert!(block.contains("=== FILE: index.js ===\nconsole.log(1);"));
    assert!(!block.contains("node_modules"));
}

#[test]
fn test_real_filesystem_empty_dir() {
    let dir = tempfile::tempdir().unwrap();
    assert!(!has_eligible_files(dir.path(), true));
    let snapshot = ContextBuilder::new().build(dir.path());
    assert!(snapshot.is_empty());
    assert!(snapshot.summary().starts_with("Found 0 files (0 B)"));
    assert!(snapshot.summary().ends_with("File types: none"));
    assert!(build_and_serialize(dir.path()).contains("File types: none\n\n=== END CONTEXT ==="));
}

#[test]
fn test_real_filesystem_keeps_secrets_out() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::write(root.join(".env.local"), "OPENAI_API_KEY=sk-secret").unwrap();
    std::fs::write(root.join(".env.production"), "DB_PASSWORD=hunter2").unwrap();
    std::fs::write(root.join(".env.example"), "OPENAI_API_KEY=").unwrap();
    std::fs::write(root.join("main.rs"), "fn main() {}").unwrap();
    std::fs::create_dir_all(root.join(".github/workflows")).unwrap();
    std::fs::write(root.join(".github/workflows/ci.yml"), "on: push").unwrap();
    std::fs::create_dir_all(root.join(".git")).unwrap();
    std::fs::write(root.join(".git/config.toml"), "x = 1").unwrap();

    let block = build_and_serialize(root);
    assert!(!block.contains("sk-secret"));
    assert!(!block.contains("hunter2"));
    assert!(block.contains("=== FILE: .env.example ==="));
    assert!(block.contains("=== FILE: .github/workflows/ci.yml ===\non: push"));
    assert!(block.contains("=== FILE: main.rs ==="));
    assert!(!block.contains(".git/config.toml"));
}
