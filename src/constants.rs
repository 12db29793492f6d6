//! Centralized constants for tomo.
//!
//! Default strings, size ceilings, and file-name lists live here so they can
//! be changed in one place.

/// Application name used in CLI output and directory paths.
pub const APP_NAME: &str = "tomo";

/// Default LLM model identifier.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-6";

/// Maximum tokens for LLM completions.
pub const MAX_TOKENS: u64 = 4096;

/// Default system prompt prepended to all conversations.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are tomo, a helpful assistant in the terminal. \
When project files are attached, ground your answer in them and cite file paths. \
Be concise. Use code blocks with language tags when showing code.";

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Per-project configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = "tomo.toml";

/// Readline history filename.
pub const HISTORY_FILENAME: &str = "chat_history.txt";

/// Environment variable holding the tracing filter.
pub const LOG_ENV_VAR: &str = "TOMO_LOG";

// --- Provider defaults ---

/// Default provider when none is configured.
pub const DEFAULT_PROVIDER: &str = "anthropic";

/// Default LLM model identifier for OpenAI.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1";

/// Default LLM model identifier for OpenRouter.
pub const DEFAULT_OPENROUTER_MODEL: &str = "arcee-ai/trinity-large-preview:free";

/// Default base URL for local Ollama server.
pub const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default LLM model identifier for Ollama.
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3";

// --- Project context ---

/// Maximum directory depth walked when building a snapshot.
pub const CONTEXT_MAX_DEPTH: usize = 3;

/// Depth used by the cheap "are there any project files" probe.
pub const CONTEXT_SHALLOW_DEPTH: usize = 1;

/// Files larger than this are replaced by a size placeholder.
pub const CONTEXT_MAX_FILE_BYTES: u64 = 50 * 1024;

/// Upper bound on the summed size of all included files.
pub const CONTEXT_MAX_TOTAL_BYTES: u64 = 200 * 1024;

/// Instruction placed between the context block and the user's question.
pub const CONTEXT_INSTRUCTION: &str =
    "Please answer the following question using the project files above as reference:";

/// Extensions (lower-case, no dot) eligible for inclusion.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    // source
    "rs", "js", "jsx", "mjs", "cjs", "ts", "tsx", "py", "go", "java", "kt", "kts", "c", "h",
    "cc", "cpp", "hpp", "cs", "rb", "php", "swift", "scala", "dart", "lua", "ex", "exs", "hs",
    "vue", "svelte",
    // markup and styles
    "html", "htm", "css", "scss", "sass", "less", "xml", "svg",
    // config
    "json", "yaml", "yml", "toml", "ini", "cfg", "conf", "env", "properties", "gradle",
    // docs
    "md", "mdx", "txt", "rst", "adoc",
    // scripts and queries
    "sh", "bash", "zsh", "fish", "ps1", "bat", "sql", "graphql", "proto",
];

/// Directory-name rules pruned during traversal. Names starting with `.`
/// must match exactly, others match as substrings.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "target",
    "coverage",
    "__pycache__",
    ".next",
    ".venv",
    ".idea",
    ".vscode",
];

/// Glob patterns matched against relative paths and entry names.
pub const DEFAULT_EXCLUDED_PATTERNS: &[&str] = &[
    "*.log",
    "*.lock",
    "*.min.js",
    "package-lock.json",
    ".env",
    ".env.*",
    ".DS_Store",
];

/// Env templates kept even though `.env.*` is excluded. They document
/// variable names without holding values.
pub const ENV_TEMPLATE_FILES: &[&str] = &[".env.example", ".env.sample", ".env.template"];

/// Root-level package manifests, sorted ahead of every other file.
pub const MANIFEST_FILES: &[&str] = &[
    "package.json",
    "Cargo.toml",
    "pyproject.toml",
    "go.mod",
    "composer.json",
    "Gemfile",
    "pom.xml",
    "build.gradle",
];
