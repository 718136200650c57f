use model::{BookMessage, BookSnapshot, DeltaBatch, LevelUpdate, Side};
use orderbook::validate_message;
use serde::Deserialize;

use crate::error::FeedError;

/// Feed name carrying incremental book updates.
pub const BOOK_FEED: &str = "book_ui_1";
/// Feed name carrying the full book sent right after subscribing.
pub const BOOK_SNAPSHOT_FEED: &str = "book_ui_1_snapshot";

/// Raw book payload, shared by the snapshot and delta feeds.
#[derive(Debug, Deserialize)]
pub struct BookUiRaw {
    pub feed: String,
    pub product_id: Option<String>,
    #[serde(default)]
    pub bids: Vec<LevelUpdate>,
    #[serde(default)]
    pub asks: Vec<LevelUpdate>,
}

/// Control message from the venue (`info`, `subscribed`, `alert`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedEvent {
    pub event: String,
    pub feed: Option<String>,
    #[serde(default)]
    pub product_ids: Vec<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedMessage {
    /// Book messages for one product, in the order they must be applied.
    Book {
        product_id: String,
        messages: Vec<BookMessage>,
    },
    Event(FeedEvent),
    Unknown,
}

impl BookUiRaw {
    fn into_messages(self) -> Result<ParsedMessage, FeedError> {
        let product_id = self.product_id.ok_or(FeedError::MissingField("product_id"))?;

        let messages = if self.feed == BOOK_SNAPSHOT_FEED {
            vec![BookMessage::Snapshot(BookSnapshot {
                product_id: product_id.clone(),
                bids: self.bids,
                asks: self.asks,
            })]
        } else {
            // Bids before asks, and only sides that carry updates
            [(Side::Bid, self.bids), (Side::Ask, self.asks)]
                .into_iter()
                .filter(|(_, deltas)| !deltas.is_empty())
                .map(|(side, deltas)| BookMessage::Delta(DeltaBatch::new(side, deltas)))
                .collect()
        };

        for message in &messages {
            validate_message(message)?;
        }

        Ok(ParsedMessage::Book {
            product_id,
            messages,
        })
    }
}

/// Parses one text frame from the feed.
///
/// Control events are recognised by their `event` field, book payloads by
/// their `feed` field. Anything else is `Unknown`.
pub fn parse_message(text: &str) -> Result<ParsedMessage, FeedError> {
    let raw: serde_json::Value = serde_json::from_str(text)?;

    if raw.get("event").is_some() {
        let event: FeedEvent = serde_json::from_value(raw)?;
        return Ok(ParsedMessage::Event(event));
    }

    match raw.get("feed").and_then(|v| v.as_str()) {
        Some(BOOK_FEED) | Some(BOOK_SNAPSHOT_FEED) => {
            let book: BookUiRaw = serde_json::from_value(raw)?;
            book.into_messages()
        }
        _ => Ok(ParsedMessage::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_snapshot() {
        let json = r#"{
            "numLevels": 25,
            "feed": "book_ui_1_snapshot",
            "bids": [[34878.5, 1500.0], [34877.0, 2500.0]],
            "asks": [[34880.0, 4000.0]],
            "product_id": "PI_XBTUSD"
        }"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Book {
                product_id,
                messages,
            } => {
                assert_eq!(product_id, "PI_XBTUSD");
                assert_eq!(messages.len(), 1);
                match &messages[0] {
                    BookMessage::Snapshot(snapshot) => {
                        assert_eq!(snapshot.product_id, "PI_XBTUSD");
                        assert_eq!(snapshot.bids.len(), 2);
                        assert_eq!(snapshot.bids[0], (dec!(34878.5), dec!(1500)));
                        assert_eq!(snapshot.asks[0], (dec!(34880.0), dec!(4000)));
                    }
                    _ => panic!("Expected Snapshot"),
                }
            }
            _ => panic!("Expected Book"),
        }
    }

    #[test]
    fn test_parse_delta_splits_sides() {
        let json = r#"{
            "feed": "book_ui_1",
            "product_id": "PI_XBTUSD",
            "bids": [[34877.5, 0.0], [34870.0, 120.0]],
            "asks": [[34881.0, 300.0]]
        }"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Book { messages, .. } => {
                assert_eq!(
                    messages,
                    vec![
                        BookMessage::Delta(DeltaBatch::new(
                            Side::Bid,
                            vec![(dec!(34877.5), dec!(0)), (dec!(34870.0), dec!(120))],
                        )),
                        BookMessage::Delta(DeltaBatch::new(
                            Side::Ask,
                            vec![(dec!(34881.0), dec!(300))],
                        )),
                    ]
                );
            }
            _ => panic!("Expected Book"),
        }
    }

    #[test]
    fn test_parse_delta_skips_empty_side() {
        let json = r#"{"feed":"book_ui_1","product_id":"PI_ETHUSD","bids":[],"asks":[[2400.5, 10.0]]}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Book {
                product_id,
                messages,
            } => {
                assert_eq!(product_id, "PI_ETHUSD");
                assert_eq!(messages.len(), 1);
                assert!(matches!(
                    &messages[0],
                    BookMessage::Delta(batch) if batch.side == Side::Ask
                ));
            }
            _ => panic!("Expected Book"),
        }
    }

    #[test]
    fn test_parse_string_levels() {
        let json = r#"{"feed":"book_ui_1","product_id":"PI_XBTUSD","bids":[["100.25","3"]]}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Book { messages, .. } => match &messages[0] {
                BookMessage::Delta(batch) => {
                    assert_eq!(batch.deltas, vec![(dec!(100.25), dec!(3))]);
                }
                _ => panic!("Expected Delta"),
            },
            _ => panic!("Expected Book"),
        }
    }

    #[test]
    fn test_level_missing_size_fails() {
        let json = r#"{"feed":"book_ui_1","product_id":"PI_XBTUSD","bids":[[34877.5]],"asks":[]}"#;

        assert!(matches!(parse_message(json), Err(FeedError::Parse(_))));
    }

    #[test]
    fn test_negative_size_fails_validation() {
        let json = r#"{"feed":"book_ui_1","product_id":"PI_XBTUSD","bids":[[34877.5, -1.0]],"asks":[]}"#;

        assert!(matches!(
            parse_message(json),
            Err(FeedError::InvalidLevel(_))
        ));
    }

    #[test]
    fn test_missing_product_id() {
        let json = r#"{"feed":"book_ui_1","bids":[[34877.5, 1.0]],"asks":[]}"#;

        assert!(matches!(
            parse_message(json),
            Err(FeedError::MissingField("product_id"))
        ));
    }

    #[test]
    fn test_parse_subscribed_event() {
        let json = r#"{"event":"subscribed","feed":"book_ui_1","product_ids":["PI_XBTUSD"]}"#;

        match parse_message(json).unwrap() {
            ParsedMessage::Event(event) => {
                assert_eq!(event.event, "subscribed");
                assert_eq!(event.feed.as_deref(), Some("book_ui_1"));
                assert_eq!(event.product_ids, vec!["PI_XBTUSD".to_string()]);
            }
            _ => panic!("Expected Event"),
        }
    }

    #[test]
    fn test_parse_info_event() {
        let json = r#"{"event":"info","version":1}"#;

        assert!(matches!(
            parse_message(json).unwrap(),
            ParsedMessage::Event(FeedEvent { ref event, .. }) if event == "info"
        ));
    }

    #[test]
    fn test_parse_unknown_feed() {
        let json = r#"{"feed":"ticker","product_id":"PI_XBTUSD","bid":34877.5}"#;

        assert!(matches!(parse_message(json).unwrap(), ParsedMessage::Unknown));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(parse_message("not json"), Err(FeedError::Parse(_))));
    }
}
