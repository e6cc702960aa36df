//! `IndicatorSet`: every indicator series of one analysis, aligned with the bars.

use super::zones::{RangeBand, ZoneBands};
use super::{Atr, Indicator, Sma};
use crate::config::IndicatorConfig;
use crate::domain::Bar;
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Parallel series aligned 1:1 with the bar series.
///
/// Undefined positions (rolling window not yet full) hold `f64::NAN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub ma_fast: Vec<f64>,
    pub ma_slow: Vec<f64>,
    pub atr: Vec<f64>,
    pub range_high: Vec<f64>,
    pub range_low: Vec<f64>,
    pub premium_zone: Vec<f64>,
    pub discount_zone: Vec<f64>,
    pub equilibrium: Vec<f64>,
    pub volume: Vec<f64>,
}

impl IndicatorSet {
    /// Compute all indicators.
    ///
    /// Fails with `ZeroWindow` on a zero period and with `InsufficientData`
    /// when the series is shorter than the slow moving average window.
    pub fn compute(bars: &[Bar], config: &IndicatorConfig) -> Result<Self, AnalysisError> {
        let windows = [
            ("fast_ma", config.fast_ma),
            ("slow_ma", config.slow_ma),
            ("atr_period", config.atr_period),
            ("zone_lookback", config.zone_lookback),
        ];
        if let Some(&(name, _)) = windows.iter().find(|(_, w)| *w == 0) {
            return Err(AnalysisError::ZeroWindow { name });
        }
        if bars.len() < config.slow_ma {
            return Err(AnalysisError::insufficient(
                "indicators",
                config.slow_ma,
                bars.len(),
            ));
        }

        let atr = Atr::new(config.atr_period).compute(bars);
        let range_high = RangeBand::high(config.zone_lookback).compute(bars);
        let range_low = RangeBand::low(config.zone_lookback).compute(bars);
        let zones = ZoneBands::compute(&range_high, &range_low, &atr);

        Ok(Self {
            ma_fast: Sma::new(config.fast_ma).compute(bars),
            ma_slow: Sma::new(config.slow_ma).compute(bars),
            atr,
            range_high,
            range_low,
            premium_zone: zones.premium,
            discount_zone: zones.discount,
            equilibrium: zones.equilibrium,
            volume: bars.iter().map(|b| b.volume).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.volume.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volume.is_empty()
    }

    /// `(ma_fast - ma_slow) / ma_slow` at `i`; undefined when `ma_slow` is zero
    /// or either average is undefined.
    pub fn ma_diff(&self, i: usize) -> f64 {
        let fast = self.ma_fast[i];
        let slow = self.ma_slow[i];
        if slow == 0.0 {
            return f64::NAN;
        }
        (fast - slow) / slow
    }
}
