//! Feed boundary error types.

use orderbook::OrderBookError;
use thiserror::Error;

/// Errors raised while turning raw feed text into book messages.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Payload is not valid JSON or does not match the expected shape
    /// (for example a level missing its size).
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A level failed validation.
    #[error("invalid level: {0}")]
    InvalidLevel(#[from] OrderBookError),

    /// A book message without a required field.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("Channel closed")]
    ChannelClosed,
}
