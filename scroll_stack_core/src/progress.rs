// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trigger-window progress.

/// Maps scroll offset `s` through the trigger window `[start, end]` to a
/// progress value in `[0, 1]`.
///
/// - `0` when `s < start`
/// - `1` when `s > end`
/// - linear in between
///
/// A window with `end <= start` has no width to interpolate over and acts as
/// a step at `start`: `0` before it, `1` at or after it.
#[inline]
#[must_use]
pub fn progress(s: f64, start: f64, end: f64) -> f64 {
    if s < start {
        return 0.0;
    }
    if end <= start {
        return 1.0;
    }
    if s > end {
        return 1.0;
    }
    ((s - start) / (end - start)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outside_window() {
        assert_eq!(progress(-10.0, 0.0, 100.0), 0.0);
        assert_eq!(progress(839.9, 840.0, 900.0), 0.0);
        assert_eq!(progress(900.1, 840.0, 900.0), 1.0);
        assert_eq!(progress(1e9, 840.0, 900.0), 1.0);
    }

    #[test]
    fn linear_inside_window() {
        assert_eq!(progress(840.0, 840.0, 920.0), 0.0);
        assert_eq!(progress(880.0, 840.0, 920.0), 0.5);
        assert_eq!(progress(920.0, 840.0, 920.0), 1.0);
    }

    #[test]
    fn monotonic_in_offset() {
        let mut last = 0.0;
        let mut s = 800.0;
        while s < 1000.0 {
            let p = progress(s, 840.0, 920.0);
            assert!(p >= last, "progress decreased at {s}");
            assert!((0.0..=1.0).contains(&p), "progress {p} out of range");
            last = p;
            s += 0.7;
        }
    }

    #[test]
    fn zero_width_window_is_a_step() {
        assert_eq!(progress(99.999, 100.0, 100.0), 0.0);
        assert_eq!(progress(100.0, 100.0, 100.0), 1.0);
        assert_eq!(progress(250.0, 100.0, 100.0), 1.0);
        assert!(!progress(100.0, 100.0, 100.0).is_nan(), "no division by zero");
    }

    #[test]
    fn inverted_window_is_a_step_at_start() {
        assert_eq!(progress(50.0, 100.0, 20.0), 0.0);
        assert_eq!(progress(100.0, 100.0, 20.0), 1.0);
    }
}
