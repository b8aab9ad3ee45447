//! Logging initialization
//!
//! Installs a `tracing-subscriber` writing to stderr so stdout stays
//! pipeable. `RUST_LOG` wins when set.

use miette::{miette, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::cli::GlobalOpts;
use crate::core::Config;

/// Filter level implied by the global flags and config
pub fn log_level<'a>(global: &GlobalOpts, config: &'a Config) -> &'a str {
    if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        config.log_level()
    }
}

/// Initialize the global tracing subscriber.
///
/// Must be called once, before any tracing macros are used.
pub fn init_logging(global: &GlobalOpts, config: &Config) -> Result<()> {
    let level = log_level(global, config);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .map_err(|e| miette!("failed to initialize logging: {}", e))
}
