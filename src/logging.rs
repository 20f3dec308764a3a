use tracing_subscriber::EnvFilter;

/// Filter directive enabling debug events from this crate only.
const DEBUG_DIRECTIVE: &str = concat!(env!("CARGO_CRATE_NAME"), "=debug");

/// Install a process-wide `tracing` subscriber printing this crate's
/// debug-level events.
///
/// Returns `false` if a global subscriber was already installed. Parsing
/// results do not depend on whether this was called.
pub fn enable_debug_logging() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(DEBUG_DIRECTIVE))
        .with_target(false)
        .try_init()
        .is_ok()
}
