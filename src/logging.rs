//! Logging setup
//!
//! Diagnostics go to stderr through `tracing`. `STUBPACK_LOG` takes an
//! `EnvFilter` directive; without it the `-v` count picks the level.

use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::config::ENV_LOG;

/// Filter directive for a `-v` count.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "stubpack=info",
        1 => "stubpack=debug",
        _ => "stubpack=trace",
    }
}

/// Build the filter from `directive` (usually `STUBPACK_LOG`) or the `-v` count.
pub fn filter(directive: Option<&str>, verbose: u8) -> EnvFilter {
    directive
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(verbose: u8) {
    let directive = std::env::var(ENV_LOG).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(directive.as_deref(), verbose))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}
