//! Tracing setup shared by the command-line tools

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber
///
/// `RUST_LOG` wins when set; otherwise `level` (from configuration) is used,
/// raised to `debug` by `verbose`.
pub fn init_tracing(level: &str, verbose: bool) {
    let fallback = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init (tests, repeated calls) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Build identification line, logged first by every tool
pub fn log_banner(tool: &str) {
    tracing::info!(
        "Starting {} v{} [{}] built {} ({})",
        tool,
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
}
