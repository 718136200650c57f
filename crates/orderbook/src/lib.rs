//! Bounded-depth order book with cumulative size and depth annotations.
//!
//! Each side keeps its levels in the order prices first appeared, capped at
//! a fixed level count. After every snapshot or delta batch the touched side
//! gets fresh running totals and a depth percentage per level, ready for a
//! renderer to draw depth bars.
//!
//! # Example
//!
//! ```rust
//! use model::{BookSnapshot, Side};
//! use orderbook::{OrderBookEngine, DEFAULT_MAX_LEVELS};
//! use rust_decimal_macros::dec;
//!
//! let mut book = OrderBookEngine::new("PI_XBTUSD", DEFAULT_MAX_LEVELS);
//!
//! book.apply_snapshot(&BookSnapshot {
//!     product_id: "PI_XBTUSD".to_string(),
//!     bids: vec![(dec!(100.0), dec!(5)), (dec!(99.5), dec!(3))],
//!     asks: vec![(dec!(100.5), dec!(2))],
//! });
//!
//! // Remove one bid level, add another
//! book.apply_delta_batch(Side::Bid, &[(dec!(99.5), dec!(0)), (dec!(99.0), dec!(5))]);
//!
//! for level in book.bids() {
//!     println!("{} {} {} {}%", level.price, level.size, level.cumulative_size, level.depth_percent);
//! }
//! ```

mod book;
mod error;
mod level;
mod side;
mod validation;

pub use book::{ApplyOutcome, OrderBookEngine, OrderBookState, DEFAULT_MAX_LEVELS};
pub use error::OrderBookError;
pub use level::PriceLevel;
pub use side::{BookSide, DeltaReport};
pub use validation::{validate_levels, validate_message};
