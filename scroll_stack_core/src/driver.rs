// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll notifier contract.
//!
//! The engine does not care how scrolling happens. Anything that can report
//! the scroll position once per animation frame and be torn down satisfies
//! [`ScrollDriver`]: a smooth-scrolling wheel handler, native scrolling, or a
//! scripted test double.

use crate::time::HostTime;

/// Scroll position and viewport size at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollState {
    /// Scroll offset from the top of the content, in pixels. Never negative.
    pub offset: f64,
    /// Visible height of the scroll container, in pixels.
    pub container_height: f64,
}

impl ScrollState {
    /// Creates a scroll state, clamping negative or non-finite inputs to
    /// zero.
    #[inline]
    #[must_use]
    pub fn new(offset: f64, container_height: f64) -> Self {
        let nonneg = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            offset: nonneg(offset),
            container_height: nonneg(container_height),
        }
    }
}

/// Reports scroll-position changes on every animation frame.
pub trait ScrollDriver {
    /// Advances the driver to `now` and returns the current scroll state.
    ///
    /// Called once per frame. Implementations that animate scrolling step
    /// their animation here.
    fn poll(&mut self, now: HostTime) -> ScrollState;

    /// Releases every resource the driver holds (event listeners and the
    /// like). After this, `poll` must not touch the host.
    fn destroy(&mut self);
}
