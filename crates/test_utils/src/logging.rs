//! Test Tracing Setup
//!
//! Installs a process-wide tracing subscriber for test binaries so
//! `RUST_LOG=debug cargo test` shows engine spans interleaved with test
//! output. Installation happens once per process; every test can call
//! it freely.

use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

static TRACING: Lazy<()> = Lazy::new(|| {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .ok();
});

/// Initializes tracing for the current test process
///
/// Only the first call installs a subscriber; later calls are no-ops,
/// including the case where the harness already installed one.
pub fn init_test_tracing() {
    Lazy::force(&TRACING);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
    }
}
