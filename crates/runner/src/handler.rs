//! Routes parsed feed frames into the engine and metrics.

use feed::{FeedEvent, ParsedMessage};
use metrics::BookMetrics;
use model::BookMessage;
use orderbook::{ApplyOutcome, OrderBookEngine};
use tracing::{debug, info, warn};

/// Applies one parsed frame. Deltas for a product other than the tracked
/// one are skipped; a snapshot always applies and sets the tracked product.
pub fn handle_message(engine: &mut OrderBookEngine, message: ParsedMessage, metrics: &BookMetrics) {
    match message {
        ParsedMessage::Book {
            product_id,
            messages,
        } => {
            for message in &messages {
                let foreign = product_id != engine.instrument();
                if foreign && matches!(message, BookMessage::Delta(_)) {
                    metrics.inc_foreign_messages();
                    debug!(
                        product_id = %product_id,
                        tracked = %engine.instrument(),
                        "Skipping delta for untracked product"
                    );
                    continue;
                }

                match engine.apply(message) {
                    ApplyOutcome::Seeded { .. } => metrics.inc_snapshots_applied(),
                    ApplyOutcome::Delta { report, .. } => metrics.record_delta_batch(
                        (report.inserted + report.updated + report.removed) as u64,
                        report.dropped as u64,
                        report.ignored as u64,
                    ),
                }
            }
        }
        ParsedMessage::Event(event) => log_event(&event),
        ParsedMessage::Unknown => debug!("Ignoring unrecognised frame"),
    }
}

fn log_event(event: &FeedEvent) {
    match event.event.as_str() {
        "subscribed" | "unsubscribed" => info!(
            event = %event.event,
            feed = ?event.feed,
            product_ids = ?event.product_ids,
            "Feed subscription changed"
        ),
        "alert" | "error" => warn!(
            event = %event.event,
            message = ?event.message,
            "Feed alert"
        ),
        _ => debug!(event = %event.event, "Feed event"),
    }
}
