//! Premium / discount bands around the rolling trading range.
//!
//! - `premium_zone  = rolling_max(high, lookback) - atr`
//! - `discount_zone = rolling_min(low,  lookback) + atr`
//! - `equilibrium   = (premium_zone + discount_zone) / 2`
//!
//! When ATR exceeds half the rolling range the premium band sits *below* the
//! discount band. That inversion is kept as-is; nothing is clamped.

use super::rolling::{rolling_max, rolling_min};
use super::Indicator;
use crate::domain::Bar;

/// Which edge of the rolling range to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEdge {
    High,
    Low,
}

/// Rolling highest high or lowest low over a lookback window.
#[derive(Debug, Clone)]
pub struct RangeBand {
    period: usize,
    edge: RangeEdge,
    name: String,
}

impl RangeBand {
    pub fn high(period: usize) -> Self {
        assert!(period >= 1, "range period must be >= 1");
        Self {
            period,
            edge: RangeEdge::High,
            name: format!("range_high_{period}"),
        }
    }

    pub fn low(period: usize) -> Self {
        assert!(period >= 1, "range period must be >= 1");
        Self {
            period,
            edge: RangeEdge::Low,
            name: format!("range_low_{period}"),
        }
    }
}

impl Indicator for RangeBand {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        match self.edge {
            RangeEdge::High => {
                let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
                rolling_max(&highs, self.period)
            }
            RangeEdge::Low => {
                let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
                rolling_min(&lows, self.period)
            }
        }
    }
}

/// The three zone series, aligned with the bar series.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneBands {
    pub premium: Vec<f64>,
    pub discount: Vec<f64>,
    pub equilibrium: Vec<f64>,
}

impl ZoneBands {
    pub fn compute(range_high: &[f64], range_low: &[f64], atr: &[f64]) -> Self {
        debug_assert_eq!(range_high.len(), atr.len());
        debug_assert_eq!(range_low.len(), atr.len());

        let premium: Vec<f64> = range_high.iter().zip(atr).map(|(h, a)| h - a).collect();
        let discount: Vec<f64> = range_low.iter().zip(atr).map(|(l, a)| l + a).collect();
        let equilibrium = premium
            .iter()
            .zip(&discount)
            .map(|(p, d)| (p + d) / 2.0)
            .collect();

        Self {
            premium,
            discount,
            equilibrium,
        }
    }
}
