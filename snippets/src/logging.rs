//! Diagnostic logging for the command-line tools.

use tracing_subscriber::EnvFilter;

/// Install a stderr `fmt` subscriber driven by `RUST_LOG`, defaulting to `warn`.
///
/// Progress narration is printed directly to stdout by the tools; this only
/// carries internal diagnostics.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}
