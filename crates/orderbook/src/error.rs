//! Order book error types.

use thiserror::Error;

/// Errors raised when a feed payload fails validation before reaching the book.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderBookError {
    /// Invalid price level (negative or zero price).
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// Invalid size (negative size).
    #[error("invalid size {size} at price {price}")]
    InvalidSize { price: String, size: String },
}
