//! Diagnostic logging setup
//!
//! Installs a `tracing` subscriber writing to stderr. `RUST_LOG` always wins
//! over the configured level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter from `RUST_LOG`, or from the configured level
fn env_filter(level: &str, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { level };
        EnvFilter::new(format!("kardex={}", level))
    })
}

/// Install the stderr subscriber
///
/// In TUI mode stderr shares the terminal with the alternate screen, so
/// logging is only installed there when `RUST_LOG` asks for it explicitly.
pub fn init(level: &str, verbose: bool, tui: bool) {
    if tui && std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    // A second init (e.g. from tests) is not an error worth surfacing
    let _ = tracing_subscriber::registry()
        .with(env_filter(level, verbose))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
