//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global fmt subscriber.
///
/// `RUST_LOG` wins over `default_level`. Returns false if a subscriber was
/// already installed, so calling this more than once is harmless.
pub fn init_tracing(default_level: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(filter).try_init().is_ok()
}
