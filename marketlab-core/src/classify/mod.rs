//! Market State Classifier.
//!
//! Reduces the last bar of an analysed series to one `MarketState` and a
//! `LevelSnapshot`. Rules are tried in order, first match wins:
//!
//! 1. close above the premium band: `Premium`
//! 2. close below the discount band: `Discount`
//! 3. `|ma_diff|` under the threshold: a narrow state, refined by the volume
//!    profile's largest bucket against its high/low percentiles
//! 4. `ma_diff` above the threshold: `TrendingUp` if both averages rose
//!    since the previous bar, else `Wide-Bullish`
//! 5. `ma_diff` below minus the threshold: `TrendingDown` or `Wide-Bearish`
//! 6. anything else (including undefined `ma_diff`): `Equilibrium`
//!
//! Undefined bands compare false, so they never select `Premium`/`Discount`.

pub mod state;

pub use state::{EnhancedState, MarketState, Qualifier};

use crate::config::AnalysisConfig;
use crate::detectors::DetectorFlags;
use crate::domain::Bar;
use crate::indicators::{volume_profile, IndicatorSet, VolumeProfile};
use serde::{Deserialize, Serialize};

/// Point-in-time levels at the last bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    /// Rolling low of the premium/discount window.
    pub support: f64,
    /// Rolling high of the premium/discount window.
    pub resistance: f64,
    pub current_price: f64,
    pub equilibrium: f64,
    pub bullish_fvg: bool,
    pub bearish_fvg: bool,
    pub order_block: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub state: MarketState,
    /// `None` exactly when `state` is `InsufficientData`.
    pub levels: Option<LevelSnapshot>,
}

impl Classification {
    pub fn insufficient() -> Self {
        Self {
            state: MarketState::InsufficientData,
            levels: None,
        }
    }
}

/// Classify the last bar of `bars`.
///
/// Fewer than `config.min_bars()` bars is the normal `InsufficientData`
/// outcome, not an error. `indicators` and `flags` must be aligned with `bars`.
pub fn classify(
    bars: &[Bar],
    indicators: &IndicatorSet,
    flags: &DetectorFlags,
    config: &AnalysisConfig,
) -> Classification {
    if bars.len() < config.min_bars() || indicators.len() != bars.len() {
        return Classification::insufficient();
    }
    let profile = match volume_profile(
        bars,
        config.indicators.profile_lookback,
        config.indicators.profile_bins,
    ) {
        Ok(profile) => profile,
        Err(_) => return Classification::insufficient(),
    };

    let i = bars.len() - 1;
    let state = base_state(bars, indicators, &profile, config);
    let last = flags.at(i).unwrap_or_default();

    Classification {
        state,
        levels: Some(LevelSnapshot {
            support: indicators.range_low[i],
            resistance: indicators.range_high[i],
            current_price: bars[i].close,
            equilibrium: indicators.equilibrium[i],
            bullish_fvg: last.bullish_fvg,
            bearish_fvg: last.bearish_fvg,
            order_block: last.order_block,
        }),
    }
}

/// Base tag of the last bar, given at least two bars.
fn base_state(
    bars: &[Bar],
    ind: &IndicatorSet,
    profile: &VolumeProfile,
    config: &AnalysisConfig,
) -> MarketState {
    let i = bars.len() - 1;
    let price = bars[i].close;
    let threshold = config.classifier.ma_diff_threshold;

    if price > ind.premium_zone[i] {
        return MarketState::Premium;
    }
    if price < ind.discount_zone[i] {
        return MarketState::Discount;
    }

    let ma_diff = ind.ma_diff(i);
    if ma_diff.abs() < threshold {
        let peak = profile.max_volume();
        return if peak > profile.volume_percentile(config.classifier.high_volume_percentile) {
            MarketState::NarrowHighVolume
        } else if peak < profile.volume_percentile(config.classifier.low_volume_percentile) {
            MarketState::NarrowLowVolume
        } else {
            MarketState::Narrow
        };
    }

    let fast_rising = ind.ma_fast[i] > ind.ma_fast[i - 1];
    let slow_rising = ind.ma_slow[i] > ind.ma_slow[i - 1];
    let fast_falling = ind.ma_fast[i] < ind.ma_fast[i - 1];
    let slow_falling = ind.ma_slow[i] < ind.ma_slow[i - 1];

    if ma_diff > threshold {
        if fast_rising && slow_rising {
            MarketState::TrendingUp
        } else {
            MarketState::WideBullish
        }
    } else if ma_diff < -threshold {
        if fast_falling && slow_falling {
            MarketState::TrendingDown
        } else {
            MarketState::WideBearish
        }
    } else {
        MarketState::Equilibrium
    }
}

/// Enhanced variant: the base classification qualified by the last bar's
/// detector flags. The base tag is never altered.
pub fn classify_enhanced(classification: &Classification, flags: &DetectorFlags) -> EnhancedState {
    EnhancedState::from_flags(classification.state, flags.last().as_ref())
}
