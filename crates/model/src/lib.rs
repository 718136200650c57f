use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A `(price, size)` pair as delivered by the feed.
pub type LevelUpdate = (Decimal, Decimal);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bid,
    Ask,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "bid"),
            Side::Ask => write!(f, "ask"),
        }
    }
}

/// Full, authoritative restatement of both sides of a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub product_id: String,
    pub bids: Vec<LevelUpdate>,
    pub asks: Vec<LevelUpdate>,
}

/// Incremental updates for one side, in feed arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaBatch {
    pub side: Side,
    pub deltas: Vec<LevelUpdate>,
}

impl DeltaBatch {
    pub fn new(side: Side, deltas: Vec<LevelUpdate>) -> Self {
        Self { side, deltas }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BookMessage {
    Snapshot(BookSnapshot),
    Delta(DeltaBatch),
}
