//! Diagnostic logging setup.
//!
//! Logs go to stderr so they never mix with model output on stdout. The
//! filter comes from `TOMO_LOG` (standard `EnvFilter` syntax) and falls back
//! to warnings only, or debug output with `--verbose`.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

use crate::constants::LOG_ENV_VAR;

/// Installs the global tracing subscriber.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // A second init (tests) is not an error worth surfacing.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "tomo=debug"
    } else {
        "tomo=warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "tomo=warn");
        assert_eq!(default_directive(true), "tomo=debug");
    }
}
