// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-instance stack configuration.
//!
//! A [`StackConfig`] is fixed at construction and never mutated during the
//! life of a [`ScrollStack`](crate::stack::ScrollStack). Positions that may be
//! given relative to the container use [`Length`], which is resolved against
//! the container height on every solve pass.
//!
//! Malformed values are caught in two ways. [`StackConfig::validate`] reports
//! them to the caller. [`StackConfig::sanitized`] clamps them to usable
//! values, and the engine always applies it, so the per-frame path never sees
//! NaN, negative distances, or a zero base scale.

use core::fmt;
use core::str::FromStr;

/// A position given either in pixels or as a percentage of the container
/// height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    /// Absolute pixels.
    Px(f64),
    /// Percentage of the container height (`20.0` means 20 %).
    Percent(f64),
}

impl Length {
    /// Resolves this length to pixels against `container_height`.
    #[inline]
    #[must_use]
    pub fn resolve(self, container_height: f64) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Percent(pct) => pct / 100.0 * container_height,
        }
    }

    /// Returns the raw numeric value regardless of unit.
    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Px(v) | Self::Percent(v) => v,
        }
    }

    const fn with_value(self, v: f64) -> Self {
        match self {
            Self::Px(_) => Self::Px(v),
            Self::Percent(_) => Self::Percent(v),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Percent(v) => write!(f, "{v}%"),
        }
    }
}

/// Error returned when a string is not a valid [`Length`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseLengthError;

impl fmt::Display for ParseLengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected a length such as \"20%\", \"160px\" or \"160\"")
    }
}

impl core::error::Error for ParseLengthError {}

impl FromStr for Length {
    type Err = ParseLengthError;

    /// Parses `"20%"`, `"160px"` or a bare number (pixels).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (number, percent) = if let Some(n) = s.strip_suffix('%') {
            (n, true)
        } else if let Some(n) = s.strip_suffix("px") {
            (n, false)
        } else {
            (s, false)
        };
        let v: f64 = number.trim().parse().map_err(|_| ParseLengthError)?;
        if !v.is_finite() {
            return Err(ParseLengthError);
        }
        Ok(if percent { Self::Percent(v) } else { Self::Px(v) })
    }
}

/// Immutable per-instance settings for a card stack.
///
/// Field defaults are listed on [`StackConfig::DEFAULT`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackConfig {
    /// Gap between consecutive cards in the document flow, in pixels.
    ///
    /// Backends apply this as static spacing when cards are prepared; the
    /// solver itself reads positions from sampled geometry.
    pub item_distance: f64,
    /// Extra resting scale added per card index.
    pub scale_step: f64,
    /// Vertical offset between stacked cards, in pixels.
    pub stack_offset: f64,
    /// Distance from the container top at which a card pins.
    pub pin_start: Length,
    /// Distance from the container top at which a card's scale completes.
    pub scale_end: Length,
    /// Resting scale of the first card once fully stacked.
    pub base_scale: f64,
    /// Rotation in degrees added per card index at full progress.
    pub rotation_step: f64,
    /// Blur in pixels added per level of stack depth.
    pub blur_step: f64,
}

impl StackConfig {
    /// The default configuration.
    ///
    /// | Field | Default |
    /// |---|---|
    /// | `item_distance` | 100 px |
    /// | `scale_step` | 0.03 |
    /// | `stack_offset` | 30 px |
    /// | `pin_start` | 20 % |
    /// | `scale_end` | 10 % |
    /// | `base_scale` | 0.85 |
    /// | `rotation_step` | 0 (disabled) |
    /// | `blur_step` | 0 (disabled) |
    pub const DEFAULT: Self = Self {
        item_distance: 100.0,
        scale_step: 0.03,
        stack_offset: 30.0,
        pin_start: Length::Percent(20.0),
        scale_end: Length::Percent(10.0),
        base_scale: 0.85,
        rotation_step: 0.0,
        blur_step: 0.0,
    };

    /// Checks the configuration for caller errors.
    ///
    /// Returns the first problem found. The engine does not require a valid
    /// configuration; it [sanitizes](Self::sanitized) whatever it is given.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            ("item_distance", self.item_distance),
            ("scale_step", self.scale_step),
            ("stack_offset", self.stack_offset),
            ("pin_start", self.pin_start.value()),
            ("scale_end", self.scale_end.value()),
            ("base_scale", self.base_scale),
            ("rotation_step", self.rotation_step),
            ("blur_step", self.blur_step),
        ];
        for (field, v) in scalars {
            if !v.is_finite() {
                return Err(ConfigError::NonFinite(field));
            }
        }
        let distances = [
            ("item_distance", self.item_distance),
            ("stack_offset", self.stack_offset),
            ("blur_step", self.blur_step),
        ];
        for (field, v) in distances {
            if v < 0.0 {
                return Err(ConfigError::Negative(field));
            }
        }
        if !(self.base_scale > 0.0 && self.base_scale <= 1.0) {
            return Err(ConfigError::BaseScaleOutOfRange(self.base_scale));
        }
        // Mixed units can only be compared once the container height is known.
        let same_unit = matches!(
            (self.pin_start, self.scale_end),
            (Length::Px(_), Length::Px(_)) | (Length::Percent(_), Length::Percent(_))
        );
        if same_unit && self.scale_end.value() > self.pin_start.value() {
            return Err(ConfigError::ScaleEndPastPin {
                pin_start: self.pin_start,
                scale_end: self.scale_end,
            });
        }
        Ok(())
    }

    /// Returns a copy with every field clamped to a usable value.
    ///
    /// Non-finite fields fall back to their defaults, negative distances
    /// become zero, and `base_scale` is clamped into `(0, 1]`.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let d = Self::DEFAULT;
        let finite_or = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
        let length_or = |l: Length, fallback: Length| {
            if l.value().is_finite() {
                l.with_value(l.value().max(0.0))
            } else {
                fallback
            }
        };
        let base_scale = finite_or(self.base_scale, d.base_scale);
        Self {
            item_distance: finite_or(self.item_distance, d.item_distance).max(0.0),
            scale_step: finite_or(self.scale_step, d.scale_step),
            stack_offset: finite_or(self.stack_offset, d.stack_offset).max(0.0),
            pin_start: length_or(self.pin_start, d.pin_start),
            scale_end: length_or(self.scale_end, d.scale_end),
            base_scale: if base_scale > 0.0 {
                base_scale.min(1.0)
            } else {
                d.base_scale
            },
            rotation_step: finite_or(self.rotation_step, d.rotation_step),
            blur_step: finite_or(self.blur_step, d.blur_step).max(0.0),
        }
    }
}

impl Default for StackConfig {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A caller error reported by [`StackConfig::validate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    /// A field is NaN or infinite.
    NonFinite(&'static str),
    /// A distance field is negative.
    Negative(&'static str),
    /// `base_scale` is not in `(0, 1]`.
    BaseScaleOutOfRange(f64),
    /// The scale would complete after the card has already pinned, which
    /// collapses the scale window to a step.
    ScaleEndPastPin {
        /// The configured pin position.
        pin_start: Length,
        /// The configured scale completion position.
        scale_end: Length,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite(field) => write!(f, "`{field}` must be finite"),
            Self::Negative(field) => write!(f, "`{field}` must not be negative"),
            Self::BaseScaleOutOfRange(v) => {
                write!(f, "`base_scale` must be in (0, 1], got {v}")
            }
            Self::ScaleEndPastPin {
                pin_start,
                scale_end,
            } => write!(
                f,
                "`scale_end` ({scale_end}) lies past `pin_start` ({pin_start})"
            ),
        }
    }
}

impl core::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lengths() {
        assert_eq!("20%".parse(), Ok(Length::Percent(20.0)));
        assert_eq!(" 160px ".parse(), Ok(Length::Px(160.0)));
        assert_eq!("160".parse(), Ok(Length::Px(160.0)));
        assert_eq!("12.5 %".parse(), Ok(Length::Percent(12.5)));
        assert_eq!("abc".parse::<Length>(), Err(ParseLengthError));
        assert_eq!("%".parse::<Length>(), Err(ParseLengthError));
        assert_eq!("inf".parse::<Length>(), Err(ParseLengthError));
    }

    #[test]
    fn resolve_against_container() {
        assert_eq!(Length::Percent(20.0).resolve(800.0), 160.0);
        assert_eq!(Length::Px(42.0).resolve(800.0), 42.0);
    }

    #[test]
    fn defaults_are_valid() {
        assert_eq!(StackConfig::default().validate(), Ok(()));
        assert_eq!(StackConfig::DEFAULT.sanitized(), StackConfig::DEFAULT);
    }

    #[test]
    fn validate_reports_caller_errors() {
        let nan = StackConfig {
            scale_step: f64::NAN,
            ..StackConfig::DEFAULT
        };
        assert_eq!(nan.validate(), Err(ConfigError::NonFinite("scale_step")));

        let negative = StackConfig {
            stack_offset: -1.0,
            ..StackConfig::DEFAULT
        };
        assert_eq!(
            negative.validate(),
            Err(ConfigError::Negative("stack_offset"))
        );

        let zero_scale = StackConfig {
            base_scale: 0.0,
            ..StackConfig::DEFAULT
        };
        assert_eq!(
            zero_scale.validate(),
            Err(ConfigError::BaseScaleOutOfRange(0.0))
        );

        let inverted = StackConfig {
            pin_start: Length::Percent(10.0),
            scale_end: Length::Percent(30.0),
            ..StackConfig::DEFAULT
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::ScaleEndPastPin { .. })
        ));

        // Mixed units are not comparable up front.
        let mixed = StackConfig {
            pin_start: Length::Px(10.0),
            scale_end: Length::Percent(30.0),
            ..StackConfig::DEFAULT
        };
        assert_eq!(mixed.validate(), Ok(()));
    }

    #[test]
    fn sanitize_clamps() {
        let bad = StackConfig {
            item_distance: -5.0,
            scale_step: f64::INFINITY,
            stack_offset: -30.0,
            pin_start: Length::Percent(f64::NAN),
            scale_end: Length::Px(-4.0),
            base_scale: 3.0,
            rotation_step: f64::NAN,
            blur_step: -1.0,
        };
        let s = bad.sanitized();
        assert_eq!(s.item_distance, 0.0);
        assert_eq!(s.scale_step, StackConfig::DEFAULT.scale_step);
        assert_eq!(s.stack_offset, 0.0);
        assert_eq!(s.pin_start, StackConfig::DEFAULT.pin_start);
        assert_eq!(s.scale_end, Length::Px(0.0));
        assert_eq!(s.base_scale, 1.0);
        assert_eq!(s.rotation_step, 0.0);
        assert_eq!(s.blur_step, 0.0);

        let zero_scale = StackConfig {
            base_scale: -0.5,
            ..StackConfig::DEFAULT
        };
        assert_eq!(zero_scale.sanitized().base_scale, 0.85);
    }

    #[test]
    fn error_messages() {
        use alloc::string::ToString;
        assert_eq!(
            ConfigError::Negative("blur_step").to_string(),
            "`blur_step` must not be negative"
        );
        assert_eq!(Length::Percent(20.0).to_string(), "20%");
    }
}
