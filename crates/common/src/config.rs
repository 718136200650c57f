//! Runtime configuration read from the environment.

use orderbook::DEFAULT_MAX_LEVELS;
use thiserror::Error;
use tracing::warn;

use crate::market::{Market, ParseMarketError};

/// Upper bound accepted for `DEPTH_BOOK_LEVELS`.
pub const MAX_CONFIGURABLE_LEVELS: usize = 1000;

const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(transparent)]
    InvalidMarket(#[from] ParseMarketError),

    #[error("invalid level count '{0}', expected 1..=1000")]
    InvalidLevels(String),

    #[error("invalid channel capacity '{0}'")]
    InvalidChannelCapacity(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookConfig {
    /// Market whose book is tracked.
    pub market: Market,
    /// Maximum levels kept per side.
    pub max_levels: usize,
    /// Feed channel buffer capacity.
    pub channel_capacity: usize,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            market: Market::default(),
            max_levels: DEFAULT_MAX_LEVELS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl BookConfig {
    /// Reads `DEPTH_BOOK_MARKET`, `DEPTH_BOOK_LEVELS` and
    /// `DEPTH_BOOK_CHANNEL_CAPACITY`; unset variables take defaults.
    pub fn try_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`BookConfig::try_from_env`], but falls back to defaults on error.
    pub fn from_env() -> Self {
        Self::try_from_env().unwrap_or_else(|e| {
            warn!(error = %e, "Invalid book configuration, using defaults");
            Self::default()
        })
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let market = match lookup("DEPTH_BOOK_MARKET") {
            Some(value) => value.parse()?,
            None => defaults.market,
        };

        let max_levels = match lookup("DEPTH_BOOK_LEVELS") {
            Some(value) => parse_levels(&value)?,
            None => defaults.max_levels,
        };

        let channel_capacity = match lookup("DEPTH_BOOK_CHANNEL_CAPACITY") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidChannelCapacity(value))?,
            None => defaults.channel_capacity,
        };

        Ok(Self {
            market,
            max_levels,
            channel_capacity,
        })
    }
}

fn parse_levels(value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=MAX_CONFIGURABLE_LEVELS).contains(n))
        .ok_or_else(|| ConfigError::InvalidLevels(value.to_string()))
}
