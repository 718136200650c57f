//! Depth-annotated order book for a single instrument.

use model::{BookMessage, BookSnapshot, LevelUpdate, Side};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::level::PriceLevel;
use crate::side::{BookSide, DeltaReport};

/// Default number of levels kept per side.
pub const DEFAULT_MAX_LEVELS: usize = 25;

/// Bid and ask sides for one instrument.
#[derive(Debug, Clone, Serialize)]
pub struct OrderBookState {
    instrument: String,
    bids: BookSide,
    asks: BookSide,
}

impl OrderBookState {
    /// Creates an empty state for the given instrument.
    pub fn new(instrument: impl Into<String>, max_levels: usize) -> Self {
        Self {
            instrument: instrument.into(),
            bids: BookSide::new(Side::Bid, max_levels),
            asks: BookSide::new(Side::Ask, max_levels),
        }
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn bids(&self) -> &BookSide {
        &self.bids
    }

    pub fn asks(&self) -> &BookSide {
        &self.asks
    }

    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    /// Largest cumulative bid size; the denominator for bid depth.
    pub fn max_total_bids(&self) -> Decimal {
        self.bids.max_total()
    }

    /// Largest cumulative ask size; the denominator for ask depth.
    pub fn max_total_asks(&self) -> Decimal {
        self.asks.max_total()
    }
}

/// What a single [`OrderBookEngine::apply`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Both sides were replaced by a snapshot.
    Seeded { bid_levels: usize, ask_levels: usize },
    /// A delta batch was merged into one side.
    Delta { side: Side, report: DeltaReport },
}

/// Applies snapshots and delta batches to an owned [`OrderBookState`].
///
/// Every call runs to completion and leaves the state with fresh cumulative
/// totals and depth percentages on the side it touched. Calls for one side
/// must be made in feed order.
#[derive(Debug, Clone)]
pub struct OrderBookEngine {
    state: OrderBookState,
    max_levels: usize,
}

impl OrderBookEngine {
    /// Creates an empty engine for the given instrument.
    pub fn new(instrument: impl Into<String>, max_levels: usize) -> Self {
        Self {
            state: OrderBookState::new(instrument, max_levels),
            max_levels,
        }
    }

    pub fn instrument(&self) -> &str {
        self.state.instrument()
    }

    pub fn state(&self) -> &OrderBookState {
        &self.state
    }

    /// Annotated bid levels in iteration order.
    pub fn bids(&self) -> &[PriceLevel] {
        self.state.bids.levels()
    }

    /// Annotated ask levels in iteration order.
    pub fn asks(&self) -> &[PriceLevel] {
        self.state.asks.levels()
    }

    /// Dispatches a feed message to the matching operation.
    pub fn apply(&mut self, message: &BookMessage) -> ApplyOutcome {
        match message {
            BookMessage::Snapshot(snapshot) => {
                let (bid_levels, ask_levels) = self.apply_snapshot(snapshot);
                ApplyOutcome::Seeded {
                    bid_levels,
                    ask_levels,
                }
            }
            BookMessage::Delta(batch) => ApplyOutcome::Delta {
                side: batch.side,
                report: self.apply_delta_batch(batch.side, &batch.deltas),
            },
        }
    }

    /// Seeds both sides from a full snapshot and adopts its instrument.
    ///
    /// Returns the number of bid and ask levels kept.
    pub fn apply_snapshot(&mut self, snapshot: &BookSnapshot) -> (usize, usize) {
        if snapshot.product_id != self.state.instrument {
            info!(
                from = %self.state.instrument,
                to = %snapshot.product_id,
                "Snapshot switched instrument"
            );
            self.state.instrument = snapshot.product_id.clone();
        }

        let bid_levels = self.state.bids.replace(&snapshot.bids);
        let ask_levels = self.state.asks.replace(&snapshot.asks);

        info!(
            symbol = %self.state.instrument,
            bid_levels,
            ask_levels,
            max_total_bids = %self.state.max_total_bids(),
            max_total_asks = %self.state.max_total_asks(),
            "Book seeded from snapshot"
        );

        (bid_levels, ask_levels)
    }

    /// Replaces one side wholesale, leaving the other untouched.
    pub fn apply_side_snapshot(&mut self, side: Side, levels: &[LevelUpdate]) -> usize {
        let kept = self.state.side_mut(side).replace(levels);
        debug!(symbol = %self.state.instrument, side = %side, levels = kept, "Side replaced");
        kept
    }

    /// Merges a batch of deltas into one side, in order.
    pub fn apply_delta_batch(&mut self, side: Side, deltas: &[LevelUpdate]) -> DeltaReport {
        let book_side = self.state.side_mut(side);
        let report = book_side.apply_deltas(deltas);
        let levels = book_side.len();
        let max_total = book_side.max_total();

        if report.dropped > 0 {
            warn!(
                symbol = %self.state.instrument,
                side = %side,
                dropped = report.dropped,
                capacity = self.max_levels,
                "Side at capacity, new levels dropped"
            );
        }

        debug!(
            symbol = %self.state.instrument,
            side = %side,
            inserted = report.inserted,
            updated = report.updated,
            removed = report.removed,
            levels,
            max_total = %max_total,
            "Delta batch applied"
        );

        report
    }

    /// Clears both sides and switches to `instrument`.
    pub fn reset(&mut self, instrument: impl Into<String>) {
        self.state.instrument = instrument.into();
        self.state.bids.clear();
        self.state.asks.clear();
        info!(symbol = %self.state.instrument, "Book reset");
    }

    /// Returns the best (highest) bid level.
    pub fn best_bid(&self) -> Option<PriceLevel> {
        self.state.bids.best().copied()
    }

    /// Returns the best (lowest) ask level.
    pub fn best_ask(&self) -> Option<PriceLevel> {
        self.state.asks.best().copied()
    }

    /// Returns the spread (best ask - best bid).
    pub fn spread(&self) -> Option<Decimal> {
        let bid = self.best_bid()?;
        let ask = self.best_ask()?;
        Some(ask.price - bid.price)
    }

    /// Returns the mid price (average of best bid and best ask).
    pub fn mid_price(&self) -> Option<Decimal> {
        let bid = self.best_bid()?;
        let ask = self.best_ask()?;
        Some((bid.price + ask.price) / Decimal::TWO)
    }
}
