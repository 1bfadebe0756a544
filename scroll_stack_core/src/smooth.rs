// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Smooth-scroll model.
//!
//! [`SmoothScroll`] turns discrete scroll input (wheel deltas, touch drags,
//! programmatic jumps) into a position that glides toward its target over
//! several frames. It is platform-free: a backend feeds it input, calls
//! [`step`](SmoothScroll::step) once per animation frame with the elapsed
//! time, and writes [`current`](SmoothScroll::current) to the host.
//!
//! Two motion modes are supported:
//!
//! - **Damped** (`lerp` set): every frame moves a fixed fraction of the
//!   remaining distance, corrected for frame time so 30 Hz and 120 Hz
//!   displays glide identically.
//! - **Timed**: a tween from the position at input time to the target over
//!   `duration` seconds, shaped by an easing function.
//!
//! Wheel and touch input use the damped mode when `lerp` is set;
//! [`scroll_to`](SmoothScroll::scroll_to) always uses the timed mode.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// An easing curve mapping linear time in `[0, 1]` to progress.
pub type Easing = fn(f64) -> f64;

/// Exponential ease-out: fast start, long gentle tail.
#[must_use]
pub fn ease_out_expo(t: f64) -> f64 {
    (1.001 - 2.0_f64.powf(-10.0 * t)).min(1.0)
}

/// Where a scroll delta came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// Mouse wheel or trackpad.
    Wheel,
    /// Touch drag.
    Touch,
}

/// Tuning for [`SmoothScroll`].
#[derive(Clone, Copy, Debug)]
pub struct SmoothScrollConfig {
    /// Fraction of the remaining distance covered per 60 Hz frame. `None`
    /// selects timed motion for all input.
    pub lerp: Option<f64>,
    /// Length of timed motion, in seconds.
    pub duration: f64,
    /// Shape of timed motion.
    pub easing: Easing,
    /// Multiplier applied to wheel deltas.
    pub wheel_multiplier: f64,
    /// Multiplier applied to touch deltas.
    pub touch_multiplier: f64,
}

impl SmoothScrollConfig {
    /// Damped wheel motion, 1.2 s exponential ease for jumps, doubled touch
    /// sensitivity.
    pub const DEFAULT: Self = Self {
        lerp: Some(0.1),
        duration: 1.2,
        easing: ease_out_expo,
        wheel_multiplier: 1.0,
        touch_multiplier: 2.0,
    };
}

impl Default for SmoothScrollConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Debug)]
enum Motion {
    Idle,
    Damped,
    Timed { from: f64, elapsed: f64 },
}

/// A scroll position that eases toward a target.
#[derive(Clone, Debug)]
pub struct SmoothScroll {
    config: SmoothScrollConfig,
    current: f64,
    target: f64,
    limit: f64,
    motion: Motion,
}

/// Distance under which damped motion snaps to its target.
const SNAP_DISTANCE: f64 = 0.5;

impl SmoothScroll {
    /// Creates an idle model at offset zero with no scrollable range.
    #[must_use]
    pub fn new(config: SmoothScrollConfig) -> Self {
        Self {
            config,
            current: 0.0,
            target: 0.0,
            limit: 0.0,
            motion: Motion::Idle,
        }
    }

    /// Returns the animated position.
    #[inline]
    #[must_use]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Returns the position the model is heading to.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Returns `true` while the position is still moving.
    #[inline]
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !matches!(self.motion, Motion::Idle)
    }

    /// Sets the maximum scroll offset (content height minus viewport
    /// height), clamping the current and target positions into range.
    pub fn set_limit(&mut self, limit: f64) {
        self.limit = if limit.is_finite() { limit.max(0.0) } else { 0.0 };
        self.target = self.clamp(self.target);
        self.current = self.clamp(self.current);
    }

    /// Adds a user scroll delta.
    pub fn scroll_by(&mut self, delta: f64, kind: InputKind) {
        if !delta.is_finite() {
            return;
        }
        let multiplier = match kind {
            InputKind::Wheel => self.config.wheel_multiplier,
            InputKind::Touch => self.config.touch_multiplier,
        };
        self.target = self.clamp(self.target + delta * multiplier);
        self.motion = match self.config.lerp {
            Some(_) => Motion::Damped,
            None => Motion::Timed {
                from: self.current,
                elapsed: 0.0,
            },
        };
    }

    /// Heads to an absolute offset with timed motion, or jumps there when
    /// `immediate` is set.
    pub fn scroll_to(&mut self, offset: f64, immediate: bool) {
        if !offset.is_finite() {
            return;
        }
        self.target = self.clamp(offset);
        if immediate {
            self.current = self.target;
            self.motion = Motion::Idle;
        } else {
            self.motion = Motion::Timed {
                from: self.current,
                elapsed: 0.0,
            };
        }
    }

    /// Adopts a position the host reached on its own (scrollbar drag,
    /// keyboard, find-in-page). Ignored while animating.
    pub fn sync(&mut self, actual: f64) {
        if self.is_animating() || !actual.is_finite() {
            return;
        }
        self.current = self.clamp(actual);
        self.target = self.current;
    }

    /// Advances the animation by `dt` seconds and returns the new position.
    pub fn step(&mut self, dt: f64) -> f64 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        match self.motion {
            Motion::Idle => {}
            Motion::Damped => {
                let lerp = self.config.lerp.unwrap_or(1.0).clamp(0.0, 1.0);
                let lambda = lerp * 60.0;
                let t = 1.0 - core::f64::consts::E.powf(-lambda * dt);
                self.current += (self.target - self.current) * t;
                if (self.target - self.current).abs() < SNAP_DISTANCE {
                    self.finish();
                }
            }
            Motion::Timed { from, elapsed } => {
                let elapsed = elapsed + dt;
                let duration = self.config.duration.max(0.0);
                let linear = if duration > 0.0 {
                    (elapsed / duration).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                if linear >= 1.0 {
                    self.finish();
                } else {
                    let eased = (self.config.easing)(linear);
                    self.current = from + (self.target - from) * eased;
                    self.motion = Motion::Timed { from, elapsed };
                }
            }
        }
        self.current
    }

    fn finish(&mut self) {
        self.current = self.target;
        self.motion = Motion::Idle;
    }

    fn clamp(&self, v: f64) -> f64 {
        v.clamp(0.0, self.limit)
    }
}
