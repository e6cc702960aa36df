//! Order-flow approximations from OHLCV bars.
//!
//! - `buying_pressure = (close - low) / (high - low)`, undefined on zero-range bars
//! - `selling_pressure = 1 - buying_pressure`
//! - `volume_delta = +volume` on up-closes, `-volume` otherwise
//! - `cumulative_delta` = running sum of `volume_delta` from the first bar
//! - `absorption` = heavy relative volume on a near-zero range

use super::vpa::relative_volume;
use crate::domain::Bar;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderFlow {
    pub buying_pressure: Vec<f64>,
    pub selling_pressure: Vec<f64>,
    pub volume_delta: Vec<f64>,
    pub cumulative_delta: Vec<f64>,
    pub absorption: Vec<bool>,
}

pub fn analyze_order_flow(
    bars: &[Bar],
    volume_window: usize,
    high_volume_ratio: f64,
    absorption_max_range: f64,
) -> OrderFlow {
    let n = bars.len();
    let rel_volume = relative_volume(bars, volume_window);
    let mut flow = OrderFlow {
        buying_pressure: Vec::with_capacity(n),
        selling_pressure: Vec::with_capacity(n),
        volume_delta: Vec::with_capacity(n),
        cumulative_delta: Vec::with_capacity(n),
        absorption: Vec::with_capacity(n),
    };

    let mut running = 0.0;
    for (bar, rv) in bars.iter().zip(&rel_volume) {
        let range = bar.range();
        let buying = if range == 0.0 {
            f64::NAN
        } else {
            (bar.close - bar.low) / range
        };
        let delta = if bar.close > bar.open {
            bar.volume
        } else {
            -bar.volume
        };
        running += delta;

        flow.buying_pressure.push(buying);
        flow.selling_pressure.push(1.0 - buying);
        flow.volume_delta.push(delta);
        flow.cumulative_delta.push(running);
        flow.absorption
            .push(*rv > high_volume_ratio && range / bar.low < absorption_max_range);
    }

    flow
}
