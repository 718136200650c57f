//! Boundary checks applied to feed payloads before they reach the engine.

use model::{BookMessage, LevelUpdate};

use crate::error::OrderBookError;

/// Rejects non-positive prices and negative sizes.
///
/// A size of zero is allowed: in a delta it means "remove".
pub fn validate_levels(levels: &[LevelUpdate]) -> Result<(), OrderBookError> {
    for (price, size) in levels {
        if price.is_sign_negative() || price.is_zero() {
            return Err(OrderBookError::InvalidPrice(price.to_string()));
        }
        if size.is_sign_negative() && !size.is_zero() {
            return Err(OrderBookError::InvalidSize {
                price: price.to_string(),
                size: size.to_string(),
            });
        }
    }
    Ok(())
}

/// Validates every level carried by a message.
pub fn validate_message(message: &BookMessage) -> Result<(), OrderBookError> {
    match message {
        BookMessage::Snapshot(snapshot) => {
            validate_levels(&snapshot.bids)?;
            validate_levels(&snapshot.asks)
        }
        BookMessage::Delta(batch) => validate_levels(&batch.deltas),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{DeltaBatch, Side};
    use rust_decimal_macros::dec;

    #[test]
    fn test_accepts_zero_size() {
        assert!(validate_levels(&[(dec!(100), dec!(0))]).is_ok());
    }

    #[test]
    fn test_rejects_zero_price() {
        let result = validate_levels(&[(dec!(0), dec!(1))]);
        assert_eq!(result, Err(OrderBookError::InvalidPrice("0".to_string())));
    }

    #[test]
    fn test_rejects_negative_size() {
        let result = validate_levels(&[(dec!(100), dec!(1)), (dec!(99), dec!(-2))]);
        assert!(matches!(result, Err(OrderBookError::InvalidSize { .. })));
    }

    #[test]
    fn test_negative_zero_size_is_zero() {
        // -0 parses to a zero with the sign bit set
        let size = -dec!(0);
        assert!(validate_levels(&[(dec!(100), size)]).is_ok());
    }

    #[test]
    fn test_validate_message_checks_delta() {
        let message = BookMessage::Delta(DeltaBatch::new(Side::Ask, vec![(dec!(-1), dec!(1))]));
        assert!(matches!(
            validate_message(&message),
            Err(OrderBookError::InvalidPrice(_))
        ));
    }
}
