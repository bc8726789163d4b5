//! # Logging Module
//!
//! Sets up the tracing subscriber for the logvault binary.
//!
//! ## Features
//!
//! - **Env Filter**: Directives come from the validated configuration (`LOGVAULT_LOG_LEVEL` / `RUST_LOG`)
//! - **Stderr Output**: Diagnostics never mix with command output on stdout

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// Invalid directives fall back to the default level. Calling this twice is
/// harmless; the second call leaves the first subscriber in place.
pub fn init_tracing(directives: &str) {
    let env_filter = EnvFilter::try_new(directives)
        .unwrap_or_else(|_| EnvFilter::new(crate::env::DEFAULT_LOG_LEVEL));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
