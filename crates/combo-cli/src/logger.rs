//! Logging setup for the `combo` binary.
//!
//! The level is chosen in this order:
//! 1. `--verbose`: debug for the combo crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. info for the combo crates

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "combo_config=debug,combo_plugin=debug,combo_cli=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "combo_config=info,combo_plugin=info,combo_cli=info";

/// The filter for the given flags; `RUST_LOG` only applies when neither is set.
pub fn filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber. Call once, before anything logs.
///
/// Logs go to stderr so stdout stays valid JSON.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter(verbose, quiet))
        .with(fmt_layer)
        .init();
}
