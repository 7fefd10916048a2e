//! Utilities: logging setup.
//!
//! Logs go to stderr only; stdout carries command output and the
//! completion protocol. `RUST_LOG` overrides the level derived from flags.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// `-q` wins over `-v`; default shows warnings and errors.
pub fn derive_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

pub fn init_logging(level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
