//! Signal generation.
//!
//! A single forward scan over the analysed series that emits discrete
//! long/short entries when the whole-run market state and the fast moving
//! average's trend agree. See `generator` for the scan and `trend` for the
//! trend check.

pub mod generator;
pub mod trend;

pub use generator::{GeneratorState, SignalGenerator};
pub use trend::{ma_trend, TrendDirection, TrendReading};

use crate::classify::MarketState;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalDirection {
    Long,
    Short,
}

impl SignalDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Long => "long",
            Self::Short => "short",
        }
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyLabel {
    #[serde(rename = "Sell in Premium Zone")]
    SellInPremiumZone,
    #[serde(rename = "Buy in Discount Zone")]
    BuyInDiscountZone,
    #[serde(rename = "Breakout-Buy")]
    BreakoutBuy,
    #[serde(rename = "Breakout-Sell")]
    BreakoutSell,
    #[serde(rename = "Buy the Dip")]
    BuyTheDip,
    #[serde(rename = "Sell the Rally")]
    SellTheRally,
    #[serde(rename = "Buy the Dip in Wide Market")]
    BuyTheDipInWideMarket,
    #[serde(rename = "Sell the Rally in Wide Market")]
    SellTheRallyInWideMarket,
}

impl StrategyLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SellInPremiumZone => "Sell in Premium Zone",
            Self::BuyInDiscountZone => "Buy in Discount Zone",
            Self::BreakoutBuy => "Breakout-Buy",
            Self::BreakoutSell => "Breakout-Sell",
            Self::BuyTheDip => "Buy the Dip",
            Self::SellTheRally => "Sell the Rally",
            Self::BuyTheDipInWideMarket => "Buy the Dip in Wide Market",
            Self::SellTheRallyInWideMarket => "Sell the Rally in Wide Market",
        }
    }

    pub fn direction(&self) -> SignalDirection {
        match self {
            Self::BuyInDiscountZone
            | Self::BreakoutBuy
            | Self::BuyTheDip
            | Self::BuyTheDipInWideMarket => SignalDirection::Long,
            Self::SellInPremiumZone
            | Self::BreakoutSell
            | Self::SellTheRally
            | Self::SellTheRallyInWideMarket => SignalDirection::Short,
        }
    }
}

impl fmt::Display for StrategyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One emitted entry. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub timestamp: NaiveDateTime,
    pub bar_index: usize,
    pub direction: SignalDirection,
    pub strategy: StrategyLabel,
    /// Close of the emitting bar.
    pub entry_price: f64,
    /// Trend strength at emission, in `[0, 1]`.
    pub strength: f64,
    pub market_state: MarketState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_serialize_as_display_text() {
        let json = serde_json::to_string(&StrategyLabel::BuyTheDipInWideMarket).unwrap();
        assert_eq!(json, "\"Buy the Dip in Wide Market\"");
        assert_eq!(StrategyLabel::BreakoutSell.to_string(), "Breakout-Sell");
    }

    #[test]
    fn label_direction() {
        assert_eq!(StrategyLabel::BuyTheDip.direction(), SignalDirection::Long);
        assert_eq!(
            StrategyLabel::SellInPremiumZone.direction(),
            SignalDirection::Short
        );
        assert_eq!(StrategyLabel::BreakoutBuy.direction(), SignalDirection::Long);
    }
}
