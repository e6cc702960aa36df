//! Volume-price analysis.
//!
//! Relative volume is the bar's volume over the trailing `volume_window` mean
//! (the window includes the bar itself). A bar has wide range when its
//! `range / low` exceeds that ratio's own rolling mean plus one sample
//! standard deviation.

use crate::domain::Bar;
use crate::indicators::rolling::{rolling_mean, rolling_std};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumePriceAnalysis {
    pub relative_volume: Vec<f64>,
    pub high_volume: Vec<bool>,
    pub wide_range: Vec<bool>,
    pub volume_climax: Vec<bool>,
    pub upper_rejection: Vec<bool>,
    pub lower_rejection: Vec<bool>,
}

/// `volume / rolling_mean(volume, window)`; undefined during warmup.
pub fn relative_volume(bars: &[Bar], window: usize) -> Vec<f64> {
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    let mean = rolling_mean(&volumes, window);
    volumes.iter().zip(&mean).map(|(v, m)| v / m).collect()
}

pub fn analyze_volume_price(
    bars: &[Bar],
    volume_window: usize,
    high_volume_ratio: f64,
) -> VolumePriceAnalysis {
    let rel_volume = relative_volume(bars, volume_window);
    let range_pct: Vec<f64> = bars.iter().map(|b| b.range() / b.low).collect();
    let range_mean = rolling_mean(&range_pct, volume_window);
    let range_std = rolling_std(&range_pct, volume_window);

    let n = bars.len();
    let mut vpa = VolumePriceAnalysis {
        relative_volume: Vec::with_capacity(n),
        high_volume: Vec::with_capacity(n),
        wide_range: Vec::with_capacity(n),
        volume_climax: Vec::with_capacity(n),
        upper_rejection: Vec::with_capacity(n),
        lower_rejection: Vec::with_capacity(n),
    };

    for (i, bar) in bars.iter().enumerate() {
        let high_volume = rel_volume[i] > high_volume_ratio;
        let wide_range = range_pct[i] > range_mean[i] + range_std[i];
        // Only the close-at-high branch is gated on volume and range; a close
        // at the low counts on its own.
        let climax = (high_volume && wide_range && bar.close == bar.high) || bar.close == bar.low;
        let body = bar.body();

        vpa.relative_volume.push(rel_volume[i]);
        vpa.high_volume.push(high_volume);
        vpa.wide_range.push(wide_range);
        vpa.volume_climax.push(climax);
        vpa.upper_rejection.push(high_volume && bar.upper_wick() > body);
        vpa.lower_rejection.push(high_volume && bar.lower_wick() > body);
    }

    vpa
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlcv, DEFAULT_EPSILON};

    fn baseline() -> Vec<(f64, f64, f64, f64, f64)> {
        vec![(100.0, 101.0, 99.0, 100.5, 100.0); 20]
    }

    #[test]
    fn relative_volume_includes_current_bar() {
        let mut data = baseline();
        data.push((100.0, 101.0, 99.0, 100.5, 300.0));
        let rv = relative_volume(&make_ohlcv(&data), 20);
        assert!(rv[18].is_nan());
        assert_approx(rv[19], 1.0, DEFAULT_EPSILON);
        // mean = (19 * 100 + 300) / 20 = 110
        assert_approx(rv[20], 300.0 / 110.0, DEFAULT_EPSILON);
    }

    #[test]
    fn heavy_wide_bar_closing_at_high_is_climax() {
        let mut data = baseline();
        data.push((100.0, 104.0, 96.0, 104.0, 300.0));
        let vpa = analyze_volume_price(&make_ohlcv(&data), 20, 1.5);
        assert!(vpa.high_volume[20]);
        assert!(vpa.wide_range[20]);
        assert!(vpa.volume_climax[20]);
    }

    #[test]
    fn close_at_high_without_volume_is_not_climax() {
        let mut data = baseline();
        data.push((100.0, 104.0, 96.0, 104.0, 100.0));
        let vpa = analyze_volume_price(&make_ohlcv(&data), 20, 1.5);
        assert!(vpa.wide_range[20]);
        assert!(!vpa.high_volume[20]);
        assert!(!vpa.volume_climax[20]);
    }

    #[test]
    fn close_at_low_is_climax_without_any_gate() {
        let mut data = baseline();
        data.push((100.0, 100.2, 99.9, 99.9, 10.0));
        let vpa = analyze_volume_price(&make_ohlcv(&data), 20, 1.5);
        assert!(!vpa.high_volume[20]);
        assert!(!vpa.wide_range[20]);
        assert!(vpa.volume_climax[20]);
    }

    #[test]
    fn rejection_needs_long_wick_and_high_volume() {
        let mut data = baseline();
        // upper wick 2.8, body 0.2, lower wick 0.1
        data.push((100.0, 103.0, 99.9, 100.2, 300.0));
        data.push((100.0, 103.0, 99.9, 100.2, 100.0));
        let vpa = analyze_volume_price(&make_ohlcv(&data), 20, 1.5);
        assert!(vpa.upper_rejection[20]);
        assert!(!vpa.lower_rejection[20]);
        assert!(!vpa.upper_rejection[21]);
    }

    #[test]
    fn warmup_flags_are_false() {
        let vpa = analyze_volume_price(&make_ohlcv(&baseline()[..10]), 20, 1.5);
        assert!(vpa.high_volume.iter().all(|f| !f));
        assert!(vpa.wide_range.iter().all(|f| !f));
        assert!(vpa.relative_volume.iter().all(|v| v.is_nan()));
    }
}
