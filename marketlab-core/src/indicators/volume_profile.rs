//! Volume profile: traded volume binned across the recent price range.
//!
//! The range `[min(low), max(high)]` of the trailing `lookback` bars is split
//! into `bins` equal-width buckets and each bar's volume is added to the
//! bucket containing its close. A close exactly on the upper edge falls in
//! the last bucket.
//!
//! A zero-width range carries no price information to partition, so the
//! window's volume is spread evenly across all buckets.

use crate::domain::Bar;
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeProfile {
    pub price_low: f64,
    pub price_high: f64,
    /// Traded volume per bucket, lowest price first.
    pub volumes: Vec<f64>,
}

impl VolumeProfile {
    pub fn bin_width(&self) -> f64 {
        (self.price_high - self.price_low) / self.volumes.len() as f64
    }

    /// Lower and upper price edge of bucket `i`.
    pub fn bin_edges(&self, i: usize) -> (f64, f64) {
        let w = self.bin_width();
        let lo = self.price_low + w * i as f64;
        (lo, lo + w)
    }

    pub fn total_volume(&self) -> f64 {
        self.volumes.iter().sum()
    }

    pub fn max_volume(&self) -> f64 {
        self.volumes.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Bucket with the most volume (point of control); first wins on ties.
    pub fn point_of_control(&self) -> Option<usize> {
        let max = self.max_volume();
        self.volumes.iter().position(|&v| v == max)
    }

    /// Percentile `q` (0..=1) of the bucket volumes.
    pub fn volume_percentile(&self, q: f64) -> f64 {
        percentile(&self.volumes, q)
    }
}

/// Build the profile over the trailing `lookback` bars.
pub fn volume_profile(
    bars: &[Bar],
    lookback: usize,
    bins: usize,
) -> Result<VolumeProfile, AnalysisError> {
    if bars.len() < lookback {
        return Err(AnalysisError::insufficient(
            "volume profile",
            lookback,
            bars.len(),
        ));
    }
    let bins = bins.max(1);
    let window = &bars[bars.len() - lookback..];

    let price_low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let price_high = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let mut volumes = vec![0.0; bins];

    let span = price_high - price_low;
    if span > 0.0 {
        let width = span / bins as f64;
        for bar in window {
            let raw = ((bar.close - price_low) / width).floor();
            if raw.is_nan() {
                continue;
            }
            let idx = (raw.max(0.0) as usize).min(bins - 1);
            volumes[idx] += bar.volume;
        }
    } else {
        let share = window.iter().map(|b| b.volume).sum::<f64>() / bins as f64;
        volumes.iter_mut().for_each(|v| *v = share);
    }

    Ok(VolumeProfile {
        price_low,
        price_high,
        volumes,
    })
}

/// Linear-interpolation percentile of `values` at `q` in `[0, 1]`.
///
/// Returns `NaN` for empty input or when any value is `NaN`.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
