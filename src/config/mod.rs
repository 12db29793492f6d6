//! Configuration types and path resolution for tomo.
//!
//! Tomo stores its settings as TOML at the platform's XDG config path
//! (e.g. `~/.config/tomo/config.toml` on Linux). A `tomo.toml` in the project
//! (or any parent up to the git root) overrides individual values. The loaded
//! [`Config`] is passed explicitly to whatever needs it.

mod loader;
mod paths;
mod resolve;
mod types;

pub use types::{Config, ContextMode};

use anyhow::Result;

impl Config {
    /// Load config with precedence: project > global > defaults.
    /// Creates default config file if none exists.
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project()?;

        let mut config = global;
        if let Some(proj) = project {
            config = Self::merge(config, proj);
        }

        config.resolve_substitutions();
        Ok(config)
    }
}
