//! Rolling-window primitives shared by indicators and detectors.
//!
//! Every function returns a series of the same length as its input. Position
//! `i` is defined only when the window ending at `i` is full and contains no
//! undefined (`NaN`) value; otherwise it holds `NaN`.

/// Trailing mean over `window` values.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| w.iter().sum::<f64>() / w.len() as f64)
}

/// Trailing sample standard deviation (n - 1 denominator).
///
/// A window of one value has no sample deviation and yields `NaN`.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, sample_std)
}

/// Trailing maximum over `window` values.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| {
        w.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}

/// Trailing minimum over `window` values.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| w.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Simple returns `x[i] / x[i-1] - 1`; the first position is undefined.
pub fn returns(values: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    for i in 1..values.len() {
        out[i] = values[i] / values[i - 1] - 1.0;
    }
    out
}

/// Sample standard deviation of a slice (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    var.sqrt()
}

/// Apply `f` to every full, fully-defined trailing window.
fn rolling_apply<F>(values: &[f64], window: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if window == 0 || n < window {
        return out;
    }

    // Index of the most recent NaN seen so far, to skip contaminated windows
    // without rescanning them.
    let mut last_nan: Option<usize> = None;
    for (i, v) in values.iter().enumerate() {
        if v.is_nan() {
            last_nan = Some(i);
        }
        if i + 1 < window {
            continue;
        }
        let start = i + 1 - window;
        if matches!(last_nan, Some(j) if j >= start) {
            continue;
        }
        out[i] = f(&values[start..=i]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn mean_warmup_then_values() {
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_approx(out[2], 2.0, DEFAULT_EPSILON);
        assert_approx(out[3], 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn std_is_sample_deviation() {
        let out = rolling_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8);
        // population std = 2.0; sample std = sqrt(32/7)
        assert_approx(out[7], (32.0_f64 / 7.0).sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn max_min_track_window() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0];
        let max = rolling_max(&values, 3);
        let min = rolling_min(&values, 3);
        assert_eq!(max[2], 4.0);
        assert_eq!(max[6], 9.0);
        assert_eq!(min[4], 1.0);
        assert_eq!(min[6], 2.0);
    }

    #[test]
    fn nan_contaminates_only_covering_windows() {
        let values = [1.0, f64::NAN, 3.0, 4.0, 5.0];
        let out = rolling_mean(&values, 2);
        assert!(out[1].is_nan());
        assert!(out[2].is_nan());
        assert_approx(out[3], 3.5, DEFAULT_EPSILON);
        assert_approx(out[4], 4.5, DEFAULT_EPSILON);
    }

    #[test]
    fn window_longer_than_input_is_all_nan() {
        assert!(rolling_mean(&[1.0, 2.0], 5).iter().all(|v| v.is_nan()));
        assert!(rolling_max(&[1.0], 0).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn returns_first_is_undefined() {
        let r = returns(&[100.0, 110.0, 99.0]);
        assert!(r[0].is_nan());
        assert_approx(r[1], 0.1, DEFAULT_EPSILON);
        assert_approx(r[2], -0.1, DEFAULT_EPSILON);
    }
}
