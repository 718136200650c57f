//! Price level representation.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// A single annotated row of one side of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceLevel {
    /// The price at this level.
    pub price: Decimal,
    /// The quantity resting at this price.
    pub size: Decimal,
    /// Running sum of `size` from the first level through this one, in
    /// iteration order.
    pub cumulative_size: Decimal,
    /// `cumulative_size` as a percentage of the side's largest cumulative size.
    pub depth_percent: Decimal,
}

impl PriceLevel {
    /// Creates an unannotated price level.
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self {
            price,
            size,
            cumulative_size: Decimal::ZERO,
            depth_percent: Decimal::ZERO,
        }
    }

    /// Depth as `f64` for renderers sizing a bar.
    pub fn depth_percent_f64(&self) -> f64 {
        self.depth_percent.to_f64().unwrap_or(0.0)
    }
}
