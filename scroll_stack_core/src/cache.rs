// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Last-written transform cache.
//!
//! Writing a style to the host is far more expensive than solving it, and
//! rewriting an unchanged value still invalidates layout on some hosts.
//! [`TransformCache`] remembers what was last written for each card and
//! only lets a new transform through when some component moved by more
//! than its tolerance.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::solve::CardTransform;

/// Per-component change thresholds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    /// Translation, in pixels.
    pub translate_y: f64,
    /// Scale factor.
    pub scale: f64,
    /// Rotation, in degrees.
    pub rotation_deg: f64,
    /// Blur radius, in pixels.
    pub blur_px: f64,
}

impl Tolerance {
    /// A tenth of a pixel or degree, a thousandth of scale.
    pub const DEFAULT: Self = Self {
        translate_y: 0.1,
        scale: 0.001,
        rotation_deg: 0.1,
        blur_px: 0.1,
    };

    /// Returns `true` if `a` and `b` differ beyond tolerance in any
    /// component.
    #[must_use]
    pub fn exceeded(&self, a: &CardTransform, b: &CardTransform) -> bool {
        (a.translate_y - b.translate_y).abs() > self.translate_y
            || (a.scale - b.scale).abs() > self.scale
            || (a.rotation_deg - b.rotation_deg).abs() > self.rotation_deg
            || (a.blur_px - b.blur_px).abs() > self.blur_px
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Transforms last written per card index.
#[derive(Clone, Debug, Default)]
pub struct TransformCache {
    last: Vec<Option<CardTransform>>,
    tolerance: Tolerance,
}

impl TransformCache {
    /// Creates an empty cache with the default tolerance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache with a custom tolerance.
    #[must_use]
    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            last: Vec::new(),
            tolerance,
        }
    }

    /// Returns `true` if `next` should be written for card `index`.
    ///
    /// A card that has never been written always needs a write.
    #[must_use]
    pub fn needs_write(&self, index: usize, next: &CardTransform) -> bool {
        match self.get(index) {
            Some(prev) => self.tolerance.exceeded(prev, next),
            None => true,
        }
    }

    /// Records that `written` was applied to card `index`.
    pub fn record(&mut self, index: usize, written: CardTransform) {
        if self.last.len() <= index {
            self.last.resize(index + 1, None);
        }
        self.last[index] = Some(written);
    }

    /// Returns the transform last written for card `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CardTransform> {
        self.last.get(index)?.as_ref()
    }

    /// Forgets every entry.
    pub fn clear(&mut self) {
        self.last.clear();
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(translate_y: f64, scale: f64) -> CardTransform {
        CardTransform {
            translate_y,
            scale,
            ..CardTransform::REST
        }
    }

    #[test]
    fn first_write_always_passes() {
        let cache = TransformCache::new();
        assert!(cache.needs_write(0, &CardTransform::REST));
        assert!(cache.needs_write(7, &CardTransform::REST));
    }

    #[test]
    fn sub_tolerance_changes_are_suppressed() {
        let mut cache = TransformCache::new();
        cache.record(2, t(100.0, 0.9));
        assert!(!cache.needs_write(2, &t(100.05, 0.9005)));
        assert!(!cache.needs_write(2, &t(100.09, 0.9009)), "just under tolerance");
        assert!(cache.needs_write(2, &t(100.2, 0.9)));
        assert!(cache.needs_write(2, &t(100.0, 0.902)));
        assert!(cache.needs_write(2, &CardTransform {
            blur_px: 0.5,
            ..t(100.0, 0.9)
        }));
        assert!(cache.needs_write(2, &CardTransform {
            rotation_deg: -0.25,
            ..t(100.0, 0.9)
        }));
    }

    #[test]
    fn entries_are_per_index() {
        let mut cache = TransformCache::new();
        cache.record(1, t(5.0, 1.0));
        assert!(cache.get(0).is_none());
        assert_eq!(cache.get(1), Some(&t(5.0, 1.0)));
        assert!(cache.needs_write(0, &t(5.0, 1.0)));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut cache = TransformCache::new();
        cache.record(0, CardTransform::REST);
        cache.record(3, CardTransform::REST);
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.needs_write(0, &CardTransform::REST));
    }

    #[test]
    fn custom_tolerance() {
        let mut cache = TransformCache::with_tolerance(Tolerance {
            translate_y: 5.0,
            ..Tolerance::DEFAULT
        });
        cache.record(0, t(0.0, 1.0));
        assert!(!cache.needs_write(0, &t(4.0, 1.0)));
        assert!(cache.needs_write(0, &t(6.0, 1.0)));
    }
}
