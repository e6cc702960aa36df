//! Pattern detectors.
//!
//! Every detector is a pure function of the bar series, producing flag (and
//! supporting numeric) series aligned 1:1 with the bars. They share no
//! state, so `detect_all` runs them on the rayon pool.

pub mod consolidation;
pub mod fvg;
pub mod order_block;
pub mod order_flow;
pub mod swing;
pub mod volatility;
pub mod vpa;

pub use consolidation::detect_consolidation;
pub use fvg::{detect_fair_value_gaps, FairValueGaps};
pub use order_block::detect_order_blocks;
pub use order_flow::{analyze_order_flow, OrderFlow};
pub use swing::{detect_swings, SwingStructure};
pub use volatility::{analyze_volatility, Volatility, VolatilityRegime};
pub use vpa::{analyze_volume_price, relative_volume, VolumePriceAnalysis};

use crate::config::DetectorConfig;
use crate::domain::Bar;
use serde::{Deserialize, Serialize};

/// Output of every detector over one series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectorFlags {
    pub fair_value_gaps: FairValueGaps,
    pub order_block: Vec<bool>,
    pub swings: SwingStructure,
    pub consolidation: Vec<bool>,
    pub order_flow: OrderFlow,
    pub volume_price: VolumePriceAnalysis,
    pub volatility: Volatility,
}

/// Point-in-time view of the flags at one bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BarFlags {
    pub bullish_fvg: bool,
    pub bearish_fvg: bool,
    pub order_block: bool,
    pub swing_high: bool,
    pub swing_low: bool,
    pub higher_high: bool,
    pub lower_low: bool,
    pub consolidation: bool,
    pub absorption: bool,
    pub volume_climax: bool,
    pub upper_rejection: bool,
    pub lower_rejection: bool,
    pub volatility_breakout: bool,
    pub volatility_regime: Option<VolatilityRegime>,
}

/// Run all detectors, in parallel.
pub fn detect_all(bars: &[Bar], config: &DetectorConfig) -> DetectorFlags {
    let ((fair_value_gaps, order_block), (swings, consolidation)) = rayon::join(
        || {
            rayon::join(
                || detect_fair_value_gaps(bars),
                || detect_order_blocks(bars, config.block_size, config.block_threshold),
            )
        },
        || {
            rayon::join(
                || detect_swings(bars, config.swing_radius),
                || {
                    detect_consolidation(
                        bars,
                        config.consolidation_window,
                        config.consolidation_baseline,
                    )
                },
            )
        },
    );

    let (order_flow, (volume_price, volatility)) = rayon::join(
        || {
            analyze_order_flow(
                bars,
                config.volume_window,
                config.high_volume_ratio,
                config.absorption_max_range,
            )
        },
        || {
            rayon::join(
                || analyze_volume_price(bars, config.volume_window, config.high_volume_ratio),
                || {
                    analyze_volatility(
                        bars,
                        config.volatility_window,
                        config.regime_window,
                        config.periods_per_year,
                    )
                },
            )
        },
    );

    DetectorFlags {
        fair_value_gaps,
        order_block,
        swings,
        consolidation,
        order_flow,
        volume_price,
        volatility,
    }
}

impl DetectorFlags {
    pub fn len(&self) -> usize {
        self.order_block.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order_block.is_empty()
    }

    /// Snapshot at bar `i`, or `None` past the end.
    pub fn at(&self, i: usize) -> Option<BarFlags> {
        if i >= self.len() {
            return None;
        }
        Some(BarFlags {
            bullish_fvg: self.fair_value_gaps.bullish[i],
            bearish_fvg: self.fair_value_gaps.bearish[i],
            order_block: self.order_block[i],
            swing_high: self.swings.swing_high[i],
            swing_low: self.swings.swing_low[i],
            higher_high: self.swings.higher_high[i],
            lower_low: self.swings.lower_low[i],
            consolidation: self.consolidation[i],
            absorption: self.order_flow.absorption[i],
            volume_climax: self.volume_price.volume_climax[i],
            upper_rejection: self.volume_price.upper_rejection[i],
            lower_rejection: self.volume_price.lower_rejection[i],
            volatility_breakout: self.volatility.breakout[i],
            volatility_regime: self.volatility.regime[i],
        })
    }

    pub fn last(&self) -> Option<BarFlags> {
        self.len().checked_sub(1).and_then(|i| self.at(i))
    }
}
