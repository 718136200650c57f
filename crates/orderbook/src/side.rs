//! One side of the book: an insertion-ordered, capacity-bounded list of levels.

use std::collections::HashSet;

use model::{LevelUpdate, Side};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::level::PriceLevel;

/// Per-delta outcome counts for one applied batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeltaReport {
    /// New price levels appended to the side.
    pub inserted: usize,
    /// Existing levels whose size was overwritten in place.
    pub updated: usize,
    /// Levels removed by a zero-size delta.
    pub removed: usize,
    /// New prices discarded because the side was full.
    pub dropped: usize,
    /// Deltas that matched nothing in the running state.
    pub ignored: usize,
}

impl DeltaReport {
    /// Total number of deltas accounted for.
    pub fn total(&self) -> usize {
        self.inserted + self.updated + self.removed + self.dropped + self.ignored
    }
}

/// Levels for one side of the book.
///
/// Levels keep the order in which their prices first appeared. Updates
/// overwrite in place; removals close the gap. The side is never re-sorted
/// by price, use [`BookSide::sorted_by_price`] when a ladder is needed.
#[derive(Debug, Clone, Serialize)]
pub struct BookSide {
    side: Side,
    capacity: usize,
    levels: Vec<PriceLevel>,
    max_total: Decimal,
}

impl BookSide {
    pub fn new(side: Side, capacity: usize) -> Self {
        Self {
            side,
            capacity,
            levels: Vec::with_capacity(capacity),
            max_total: Decimal::ZERO,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Maximum number of levels this side will hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Annotated levels in iteration order.
    pub fn levels(&self) -> &[PriceLevel] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.levels.len() >= self.capacity
    }

    /// Largest cumulative size on this side, zero when empty.
    pub fn max_total(&self) -> Decimal {
        self.max_total
    }

    pub fn get(&self, price: Decimal) -> Option<&PriceLevel> {
        self.levels.iter().find(|level| level.price == price)
    }

    /// Sum of all resting sizes on this side.
    pub fn total_size(&self) -> Decimal {
        self.levels.iter().map(|level| level.size).sum()
    }

    /// Best level by price: highest bid or lowest ask.
    pub fn best(&self) -> Option<&PriceLevel> {
        match self.side {
            Side::Bid => self.levels.iter().max_by_key(|level| level.price),
            Side::Ask => self.levels.iter().min_by_key(|level| level.price),
        }
    }

    /// Copies of the levels ordered for display: bids highest first, asks
    /// lowest first. Annotations are left as computed in iteration order.
    pub fn sorted_by_price(&self) -> Vec<PriceLevel> {
        let mut sorted = self.levels.clone();
        match self.side {
            Side::Bid => sorted.sort_by(|a, b| b.price.cmp(&a.price)),
            Side::Ask => sorted.sort_by(|a, b| a.price.cmp(&b.price)),
        }
        sorted
    }

    /// Replaces every level with `levels`, truncated to capacity.
    ///
    /// Sizes are taken as-is, including zero. A price repeated within the
    /// snapshot keeps its first occurrence. Returns the number of levels kept.
    pub fn replace(&mut self, levels: &[LevelUpdate]) -> usize {
        self.levels.clear();
        let mut seen = HashSet::with_capacity(levels.len());
        let mut duplicates = 0usize;

        for &(price, size) in levels {
            if self.is_full() {
                break;
            }
            if !seen.insert(price) {
                duplicates += 1;
                continue;
            }
            self.levels.push(PriceLevel::new(price, size));
        }

        if duplicates > 0 {
            warn!(
                side = %self.side,
                duplicates,
                "snapshot contained repeated prices, kept first occurrence"
            );
        }

        self.recompute();
        self.levels.len()
    }

    /// Applies deltas in order, then recomputes totals and depth.
    ///
    /// A price is "known" if it was present before the batch or is held by
    /// the running state. Known prices only ever update (or remove) what the
    /// running state currently holds. A pre-batch price removed earlier in
    /// the batch therefore stays removed.
    pub fn apply_deltas(&mut self, deltas: &[LevelUpdate]) -> DeltaReport {
        let pre_batch: HashSet<Decimal> = self.levels.iter().map(|level| level.price).collect();
        let mut report = DeltaReport::default();

        for &(price, size) in deltas {
            if size.is_zero() {
                let before = self.levels.len();
                self.levels.retain(|level| level.price != price);
                if self.levels.len() < before {
                    report.removed += 1;
                } else {
                    report.ignored += 1;
                }
                continue;
            }

            let full = self.is_full();
            match self.levels.iter_mut().find(|level| level.price == price) {
                Some(level) => {
                    level.size = size;
                    report.updated += 1;
                }
                None if pre_batch.contains(&price) => report.ignored += 1,
                None if full => report.dropped += 1,
                None => {
                    self.levels.push(PriceLevel::new(price, size));
                    report.inserted += 1;
                }
            }
        }

        self.recompute();
        report
    }

    /// Drops all levels.
    pub fn clear(&mut self) {
        self.levels.clear();
        self.max_total = Decimal::ZERO;
    }

    fn recompute(&mut self) {
        self.max_total = self.accumulate_totals();
        self.normalize_depths();
    }

    /// Running sums in iteration order; returns the largest one.
    fn accumulate_totals(&mut self) -> Decimal {
        let mut running = Decimal::ZERO;
        for level in &mut self.levels {
            running += level.size;
            level.cumulative_size = running;
        }
        self.levels
            .iter()
            .map(|level| level.cumulative_size)
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    fn normalize_depths(&mut self) {
        let max_total = self.max_total;
        for level in &mut self.levels {
            level.depth_percent = depth_percent(level.cumulative_size, max_total);
        }
    }
}

/// `cumulative / max_total * 100`, or zero when there is nothing to scale by.
fn depth_percent(cumulative: Decimal, max_total: Decimal) -> Decimal {
    if max_total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    cumulative
        .checked_div(max_total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}
