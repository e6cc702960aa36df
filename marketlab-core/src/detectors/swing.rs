//! Swing points and market structure.
//!
//! A swing high is a bar whose high equals the maximum high of the centred
//! window `[i - radius, i + radius]`; swing lows mirror this on lows. The
//! window reaches `radius` bars into the future, so the last `radius` bars
//! can never be swing points.
//!
//! `higher_high` / `lower_low` compare a swing point only with the previous
//! swing point of the same kind.

use crate::domain::Bar;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwingStructure {
    pub swing_high: Vec<bool>,
    pub swing_low: Vec<bool>,
    pub higher_high: Vec<bool>,
    pub lower_low: Vec<bool>,
}

pub fn detect_swings(bars: &[Bar], radius: usize) -> SwingStructure {
    let n = bars.len();
    let mut s = SwingStructure {
        swing_high: vec![false; n],
        swing_low: vec![false; n],
        higher_high: vec![false; n],
        lower_low: vec![false; n],
    };
    if n < 2 * radius + 1 {
        return s;
    }

    let mut prev_high: Option<f64> = None;
    let mut prev_low: Option<f64> = None;

    for i in radius..n - radius {
        let window = &bars[i - radius..=i + radius];
        let max_high = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let min_low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let bar = &bars[i];

        if bar.high == max_high {
            s.swing_high[i] = true;
            s.higher_high[i] = prev_high.is_some_and(|p| bar.high > p);
            prev_high = Some(bar.high);
        }
        if bar.low == min_low {
            s.swing_low[i] = true;
            s.lower_low[i] = prev_low.is_some_and(|p| bar.low < p);
            prev_low = Some(bar.low);
        }
    }

    s
}

impl SwingStructure {
    /// Positions of all swing highs, oldest first.
    pub fn swing_high_positions(&self) -> Vec<usize> {
        positions(&self.swing_high)
    }

    /// Positions of all swing lows, oldest first.
    pub fn swing_low_positions(&self) -> Vec<usize> {
        positions(&self.swing_low)
    }
}

fn positions(flags: &[bool]) -> Vec<usize> {
    flags
        .iter()
        .enumerate()
        .filter_map(|(i, &f)| f.then_some(i))
        .collect()
}
