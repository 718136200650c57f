//! Shared configuration and logging setup.

mod config;
mod market;

pub use config::{BookConfig, ConfigError, MAX_CONFIGURABLE_LEVELS};
pub use market::{Market, ParseMarketError};

use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
