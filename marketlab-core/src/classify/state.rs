//! Market state tags and the enhanced (qualified) state.

use crate::detectors::{BarFlags, VolatilityRegime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical regime of the market at the last bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketState {
    Premium,
    Discount,
    #[serde(rename = "Narrow-HighVolume")]
    NarrowHighVolume,
    #[serde(rename = "Narrow-LowVolume")]
    NarrowLowVolume,
    Narrow,
    TrendingUp,
    #[serde(rename = "Wide-Bullish")]
    WideBullish,
    TrendingDown,
    #[serde(rename = "Wide-Bearish")]
    WideBearish,
    Equilibrium,
    /// Too few bars to classify. Not an error.
    InsufficientData,
}

impl MarketState {
    /// Every tag except `InsufficientData`, in decision order.
    pub const BASE: [MarketState; 10] = [
        MarketState::Premium,
        MarketState::Discount,
        MarketState::NarrowHighVolume,
        MarketState::NarrowLowVolume,
        MarketState::Narrow,
        MarketState::TrendingUp,
        MarketState::WideBullish,
        MarketState::TrendingDown,
        MarketState::WideBearish,
        MarketState::Equilibrium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Premium => "Premium",
            Self::Discount => "Discount",
            Self::NarrowHighVolume => "Narrow-HighVolume",
            Self::NarrowLowVolume => "Narrow-LowVolume",
            Self::Narrow => "Narrow",
            Self::TrendingUp => "TrendingUp",
            Self::WideBullish => "Wide-Bullish",
            Self::TrendingDown => "TrendingDown",
            Self::WideBearish => "Wide-Bearish",
            Self::Equilibrium => "Equilibrium",
            Self::InsufficientData => "InsufficientData",
        }
    }

    /// Any of the three narrow-range tags.
    pub fn is_narrow(&self) -> bool {
        matches!(
            self,
            Self::Narrow | Self::NarrowHighVolume | Self::NarrowLowVolume
        )
    }
}

impl fmt::Display for MarketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Qualifier {
    Absorption,
    Climax,
    Consolidating,
}

impl Qualifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Absorption => "Absorption",
            Self::Climax => "Climax",
            Self::Consolidating => "Consolidating",
        }
    }
}

/// Base state plus last-bar detector qualifiers and the volatility regime.
///
/// Rendered as `Base+Qualifier+...(Regime)`, e.g. `Narrow+Climax(NormalVol)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancedState {
    pub base: MarketState,
    pub qualifiers: Vec<Qualifier>,
    pub regime: Option<VolatilityRegime>,
}

impl EnhancedState {
    /// Qualify `base` with the flags of the last bar.
    ///
    /// `InsufficientData` is never qualified.
    pub fn from_flags(base: MarketState, last: Option<&BarFlags>) -> Self {
        let Some(flags) = last.filter(|_| base != MarketState::InsufficientData) else {
            return Self::plain(base);
        };
        let qualifiers = [
            (flags.absorption, Qualifier::Absorption),
            (flags.volume_climax, Qualifier::Climax),
            (flags.consolidation, Qualifier::Consolidating),
        ]
        .into_iter()
        .filter_map(|(set, q)| set.then_some(q))
        .collect();

        Self {
            base,
            qualifiers,
            regime: flags.volatility_regime,
        }
    }

    pub fn plain(base: MarketState) -> Self {
        Self {
            base,
            qualifiers: Vec::new(),
            regime: None,
        }
    }
}

impl fmt::Display for EnhancedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base.as_str())?;
        for q in &self.qualifiers {
            write!(f, "+{}", q.as_str())?;
        }
        if let Some(regime) = self.regime {
            write!(f, "({regime})")?;
        }
        Ok(())
    }
}
