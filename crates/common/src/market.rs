//! Supported book markets.
//!
//! The feed serves one perpetual contract per subscription; the UI toggles
//! between the XBT and ETH books.

use std::fmt;
use std::str::FromStr;

/// Perpetual contract whose book is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Market {
    /// Bitcoin perpetual.
    #[default]
    XbtUsd,
    /// Ether perpetual.
    EthUsd,
}

impl Market {
    /// Product identifier used on the feed.
    pub fn product_id(&self) -> &'static str {
        match self {
            Self::XbtUsd => "PI_XBTUSD",
            Self::EthUsd => "PI_ETHUSD",
        }
    }

    /// The other supported market.
    pub fn toggled(&self) -> Self {
        match self {
            Self::XbtUsd => Self::EthUsd,
            Self::EthUsd => Self::XbtUsd,
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.product_id())
    }
}

impl FromStr for Market {
    type Err = ParseMarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pi_xbtusd" | "xbtusd" | "xbt" | "btc" => Ok(Self::XbtUsd),
            "pi_ethusd" | "ethusd" | "eth" => Ok(Self::EthUsd),
            _ => Err(ParseMarketError(s.to_string())),
        }
    }
}

/// Error parsing market string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMarketError(String);

impl fmt::Display for ParseMarketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid market '{}', expected 'PI_XBTUSD' or 'PI_ETHUSD'",
            self.0
        )
    }
}

impl std::error::Error for ParseMarketError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_ids() {
        assert_eq!(Market::XbtUsd.product_id(), "PI_XBTUSD");
        assert_eq!(Market::EthUsd.product_id(), "PI_ETHUSD");
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Market::XbtUsd.toggled(), Market::EthUsd);
        assert_eq!(Market::EthUsd.toggled().toggled(), Market::EthUsd);
    }

    #[test]
    fn test_parse_xbt() {
        assert_eq!("PI_XBTUSD".parse::<Market>().unwrap(), Market::XbtUsd);
        assert_eq!("btc".parse::<Market>().unwrap(), Market::XbtUsd);
        assert_eq!(" XBT ".parse::<Market>().unwrap(), Market::XbtUsd);
    }

    #[test]
    fn test_parse_eth() {
        assert_eq!("PI_ETHUSD".parse::<Market>().unwrap(), Market::EthUsd);
        assert_eq!("Eth".parse::<Market>().unwrap(), Market::EthUsd);
    }

    #[test]
    fn test_parse_invalid() {
        assert!("PI_DOGEUSD".parse::<Market>().is_err());
    }

    #[test]
    fn test_default_and_display() {
        assert_eq!(Market::default(), Market::XbtUsd);
        assert_eq!(Market::EthUsd.to_string(), "PI_ETHUSD");
    }
}
