//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

/// Route `tracing` output to stderr, filtered by `RUST_LOG` (default `warn`),
/// so it never mixes with the page list on stdout.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}
