//! Order blocks: small-range bars inside an expansion.
//!
//! Scanned forward from position `block_size`. Bar `i` is an order block when
//! it printed a higher high and a higher low than bar `i-1`, and its height is
//! below `threshold` times the average height of the `block_size` bars before it.

use crate::domain::Bar;

pub fn detect_order_blocks(bars: &[Bar], block_size: usize, threshold: f64) -> Vec<bool> {
    let n = bars.len();
    let mut blocks = vec![false; n];
    if block_size == 0 || n <= block_size {
        return blocks;
    }

    let heights: Vec<f64> = bars.iter().map(Bar::range).collect();
    // Running sum of the `block_size` heights preceding `i`.
    let mut window_sum: f64 = heights[..block_size].iter().sum();

    for i in block_size..n {
        let avg_height = window_sum / block_size as f64;
        let (prev, cur) = (&bars[i - 1], &bars[i]);
        blocks[i] = cur.high > prev.high
            && cur.low > prev.low
            && heights[i] < threshold * avg_height;
        window_sum += heights[i] - heights[i - block_size];
    }

    blocks
}
