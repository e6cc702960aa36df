//! Consolidation: short-term return volatility well below its own baseline.
//!
//! `std_w = rolling_std(returns, window)`; a bar is consolidating when
//! `std_w < 0.5 * rolling_mean(std_w, baseline)`.

use crate::domain::Bar;
use crate::indicators::rolling::{returns, rolling_mean, rolling_std};

pub fn detect_consolidation(bars: &[Bar], window: usize, baseline: usize) -> Vec<bool> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let std = rolling_std(&returns(&closes), window);
    let base = rolling_mean(&std, baseline);
    std.iter().zip(&base).map(|(s, b)| *s < 0.5 * b).collect()
}
