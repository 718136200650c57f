//! Boundary between the venue's book feed and the order book engine.
//!
//! Frames from the `book_ui_1` feed are parsed and validated here, so that
//! only well-formed [`model::BookMessage`]s reach the engine:
//!
//! - `book_ui_1_snapshot` becomes one `BookMessage::Snapshot`
//! - `book_ui_1` becomes one `BookMessage::Delta` per side that has updates
//! - `event` frames are surfaced as [`FeedEvent`]s

mod error;
mod parser;

use tokio::sync::mpsc;

pub use error::FeedError;
pub use parser::{
    parse_message, BookUiRaw, FeedEvent, ParsedMessage, BOOK_FEED, BOOK_SNAPSHOT_FEED,
};

pub type FeedSender = mpsc::Sender<ParsedMessage>;
pub type FeedReceiver = mpsc::Receiver<ParsedMessage>;

pub fn create_feed_channel(capacity: usize) -> (FeedSender, FeedReceiver) {
    mpsc::channel(capacity)
}
