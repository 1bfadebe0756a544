// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The transform solver.
//!
//! A solve pass turns (scroll state, static geometry, configuration) into one
//! [`CardTransform`] per card. It is a pure function: the same inputs always
//! give the same outputs, and nothing from the previous frame is consulted.
//!
//! # Per-card model
//!
//! For card `i` with static top offset `top`:
//!
//! ```text
//!   pin_start_px   = config.pin_start resolved against container height
//!   scale_end_px   = config.scale_end resolved against container height
//!   trigger_start  = top - pin_start_px - i * stack_offset
//!   trigger_end    = top - scale_end_px
//!   pin_end        = end_marker_top - container_height / 2
//!
//!   progress       = progress(scroll, trigger_start, trigger_end)
//!   scale          = 1 - progress * (1 - (base_scale + i * scale_step))
//!   rotation       = i * rotation_step * progress
//! ```
//!
//! Each card moves through three phases, decided by comparing the scroll
//! offset alone:
//!
//! ```text
//!   Unstacked ──(scroll ≥ trigger_start)──► Pinned ──(scroll > pin_end)──► Settled
//! ```
//!
//! While pinned the card is translated down by exactly the distance scrolled
//! past its pin point, so it appears fixed at `pin_start_px + i * stack_offset`
//! from the container top. Once settled, the translation freezes at its
//! `pin_end` value and the card scrolls away with the rest of the stack.
//!
//! Blur models depth: the topmost stacked card is the highest index whose
//! trigger start has been passed, and each card below it is blurred by
//! `blur_step` per level.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::config::StackConfig;
use crate::driver::ScrollState;
use crate::geometry::StackGeometry;
use crate::progress::progress;

/// Visual transform for one card.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CardTransform {
    /// Vertical translation in pixels.
    pub translate_y: f64,
    /// Uniform scale factor.
    pub scale: f64,
    /// Rotation in degrees.
    pub rotation_deg: f64,
    /// Gaussian blur radius in pixels.
    pub blur_px: f64,
}

impl CardTransform {
    /// The transform of a card sitting at its natural position.
    pub const REST: Self = Self {
        translate_y: 0.0,
        scale: 1.0,
        rotation_deg: 0.0,
        blur_px: 0.0,
    };

    /// Rounds each component to the precision presenters can meaningfully
    /// show: hundredths of a pixel or degree, thousandths of scale.
    #[must_use]
    pub fn quantized(self) -> Self {
        Self {
            translate_y: round_to(self.translate_y, 100.0),
            scale: round_to(self.scale, 1000.0),
            rotation_deg: round_to(self.rotation_deg, 100.0),
            blur_px: round_to(self.blur_px, 100.0),
        }
    }
}

fn round_to(v: f64, factor: f64) -> f64 {
    let r = (v * factor).round() / factor;
    // Normalize -0.0 so equality and formatting stay stable.
    if r == 0.0 { 0.0 } else { r }
}

/// Where a card is in its stacking lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardPhase {
    /// Scroll has not reached the card's pin point; it sits in the flow.
    Unstacked,
    /// The card is held at its stack position.
    Pinned,
    /// Scroll has passed the release point; the card stays stacked and
    /// moves with the content.
    Settled,
}

/// Container-relative metrics shared by every card in one pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassMetrics {
    /// Resolved pin position, in pixels from the container top.
    pub pin_start_px: f64,
    /// Resolved scale completion position, in pixels from the container top.
    pub scale_end_px: f64,
    /// Scroll offset past which every card is released.
    pub pin_end: f64,
}

impl PassMetrics {
    /// Resolves the configuration against the scroll state and geometry.
    #[must_use]
    pub fn resolve(config: &StackConfig, geometry: &StackGeometry, scroll: ScrollState) -> Self {
        let h = scroll.container_height;
        Self {
            pin_start_px: config.pin_start.resolve(h),
            scale_end_px: config.scale_end.resolve(h),
            pin_end: geometry.end_marker_top - h / 2.0,
        }
    }

    /// Scroll offset at which card `index` pins and starts scaling.
    #[inline]
    #[must_use]
    pub fn trigger_start(&self, config: &StackConfig, index: usize, top: f64) -> f64 {
        top - self.pin_start_px - index as f64 * config.stack_offset
    }

    /// Scroll offset at which card `index` reaches its resting scale.
    #[inline]
    #[must_use]
    pub fn trigger_end(&self, top: f64) -> f64 {
        top - self.scale_end_px
    }
}

/// One card's solved state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolvedCard {
    /// The transform to present (already quantized).
    pub transform: CardTransform,
    /// The card's phase at this scroll offset.
    pub phase: CardPhase,
    /// Unrounded scale progress in `[0, 1]`.
    pub progress: f64,
}

/// The result of one solve pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SolvedPass {
    /// Per-card results, in index order.
    pub cards: Vec<SolvedCard>,
    /// Highest index whose trigger start has been passed (0 if none).
    pub top_card_index: usize,
    /// Whether the last card is inside its pinned range.
    pub last_card_pinned: bool,
}

/// Finds the topmost stacked card: the highest index whose trigger start
/// has been scrolled past, or 0 if none has.
#[must_use]
pub fn top_card_index(
    config: &StackConfig,
    geometry: &StackGeometry,
    metrics: &PassMetrics,
    scroll_offset: f64,
) -> usize {
    geometry
        .cards()
        .iter()
        .rev()
        .find(|c| scroll_offset >= metrics.trigger_start(config, c.index, c.top))
        .map_or(0, |c| c.index)
}

/// Solves a single card.
///
/// `top_card` is the pass-wide [`top_card_index`].
#[must_use]
pub fn solve_card(
    config: &StackConfig,
    metrics: &PassMetrics,
    scroll_offset: f64,
    index: usize,
    top: f64,
    top_card: usize,
) -> SolvedCard {
    let i = index as f64;
    let s = scroll_offset;

    let trigger_start = metrics.trigger_start(config, index, top);
    let trigger_end = metrics.trigger_end(top);
    let p = progress(s, trigger_start, trigger_end);

    let target_scale = config.base_scale + i * config.scale_step;
    let scale = 1.0 - p * (1.0 - target_scale);

    let rotation_deg = if config.rotation_step == 0.0 {
        0.0
    } else {
        i * config.rotation_step * p
    };

    let blur_px = if config.blur_step > 0.0 && index < top_card {
        ((top_card - index) as f64 * config.blur_step).max(0.0)
    } else {
        0.0
    };

    // A release point above the pin point would settle the card before it
    // ever pinned; hold it at its pin point instead.
    let pin_start = trigger_start;
    let pin_end = metrics.pin_end.max(pin_start);
    let stacked_at = metrics.pin_start_px + i * config.stack_offset;
    let (phase, translate_y) = if s < pin_start {
        (CardPhase::Unstacked, 0.0)
    } else if s <= pin_end {
        (CardPhase::Pinned, s - top + stacked_at)
    } else {
        (CardPhase::Settled, pin_end - top + stacked_at)
    };

    SolvedCard {
        transform: CardTransform {
            translate_y,
            scale,
            rotation_deg,
            blur_px,
        }
        .quantized(),
        phase,
        progress: p,
    }
}

/// Runs one solve pass over every card.
#[must_use]
pub fn solve_pass(config: &StackConfig, geometry: &StackGeometry, scroll: ScrollState) -> SolvedPass {
    let metrics = PassMetrics::resolve(config, geometry, scroll);
    let s = scroll.offset;
    let top_card = top_card_index(config, geometry, &metrics, s);

    let cards: Vec<SolvedCard> = geometry
        .cards()
        .iter()
        .map(|c| solve_card(config, &metrics, s, c.index, c.top, top_card))
        .collect();

    // The clamped release point pins a card at a single offset; that does
    // not count as the stack being in view.
    let last_card_pinned = cards
        .last()
        .is_some_and(|c| c.phase == CardPhase::Pinned && s <= metrics.pin_end);

    SolvedPass {
        cards,
        top_card_index: top_card,
        last_card_pinned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Length;

    const EPS: f64 = 1e-9;

    fn three_cards() -> StackGeometry {
        StackGeometry::new([1000.0, 1500.0, 2000.0], 3000.0)
    }

    fn at(offset: f64) -> ScrollState {
        ScrollState::new(offset, 800.0)
    }

    #[test]
    fn example_trigger_window() {
        // 800px container, pin at 20% => 160px, card 0 at 1000px.
        let config = StackConfig::DEFAULT;
        let g = StackGeometry::new([1000.0], 3000.0);
        let m = PassMetrics::resolve(&config, &g, at(0.0));
        assert_eq!(m.pin_start_px, 160.0);
        assert_eq!(m.trigger_start(&config, 0, 1000.0), 840.0);
        // scale_end 10% => 80px, window is [840, 920].
        assert_eq!(m.trigger_end(1000.0), 920.0);

        let start = solve_pass(&config, &g, at(840.0));
        assert_eq!(start.cards[0].progress, 0.0);
        assert_eq!(start.cards[0].transform.scale, 1.0);

        let end = solve_pass(&config, &g, at(920.0));
        assert_eq!(end.cards[0].progress, 1.0);
        assert!((end.cards[0].transform.scale - 0.85).abs() < EPS, "base scale");
    }

    #[test]
    fn resting_and_full_scale() {
        let config = StackConfig {
            scale_step: 0.05,
            base_scale: 0.9,
            ..StackConfig::DEFAULT
        };
        let g = three_cards();

        let rest = solve_pass(&config, &g, at(0.0));
        for c in &rest.cards {
            assert_eq!(c.transform.scale, 1.0, "resting scale is exactly 1");
            assert_eq!(c.phase, CardPhase::Unstacked);
        }

        let full = solve_pass(&config, &g, at(2900.0));
        for (i, c) in full.cards.iter().enumerate() {
            let expected = 0.9 + i as f64 * 0.05;
            assert!(
                (c.transform.scale - expected).abs() < 1e-3,
                "card {i} scale {} != {expected}",
                c.transform.scale
            );
            assert!(c.transform.scale >= config.base_scale);
        }
        assert_eq!(full.cards[2].transform.scale, 1.0);
    }

    #[test]
    fn scale_never_below_base() {
        let config = StackConfig::DEFAULT;
        let g = three_cards();
        let mut s = 0.0;
        while s < 4000.0 {
            for c in solve_pass(&config, &g, at(s)).cards {
                assert!(c.transform.scale >= config.base_scale - EPS);
                assert!(c.transform.scale <= 1.0 + 3.0 * config.scale_step);
            }
            s += 13.0;
        }
    }

    #[test]
    fn phases_and_translation() {
        let config = StackConfig::DEFAULT;
        let g = three_cards();
        // Card 1: trigger start = 1500 - 160 - 30 = 1310.
        // pin_end = 3000 - 400 = 2600.
        let before = solve_pass(&config, &g, at(1309.0));
        assert_eq!(before.cards[1].phase, CardPhase::Unstacked);
        assert_eq!(before.cards[1].transform.translate_y, 0.0);

        let pinned_start = solve_pass(&config, &g, at(1310.0));
        assert_eq!(pinned_start.cards[1].phase, CardPhase::Pinned);
        assert_eq!(pinned_start.cards[1].transform.translate_y, 0.0);

        let pinned = solve_pass(&config, &g, at(1510.0));
        assert_eq!(pinned.cards[1].phase, CardPhase::Pinned);
        // 1510 - 1500 + 160 + 30
        assert_eq!(pinned.cards[1].transform.translate_y, 200.0);

        let at_release = solve_pass(&config, &g, at(2600.0));
        assert_eq!(at_release.cards[1].phase, CardPhase::Pinned);
        assert_eq!(at_release.cards[1].transform.translate_y, 1290.0);

        let settled = solve_pass(&config, &g, at(3500.0));
        assert_eq!(settled.cards[1].phase, CardPhase::Settled);
        assert_eq!(settled.cards[1].transform.translate_y, 1290.0);
    }

    #[test]
    fn release_above_pin_point_holds_card() {
        let config = StackConfig::DEFAULT;
        // End marker so close that pin_end (600 - 400 = 200) precedes every
        // trigger start.
        let g = StackGeometry::new([1000.0], 600.0);
        let pass = solve_pass(&config, &g, at(900.0));
        assert_eq!(pass.cards[0].phase, CardPhase::Settled);
        assert_eq!(pass.cards[0].transform.translate_y, 0.0);
    }

    #[test]
    fn rotation_scales_with_progress() {
        let config = StackConfig {
            rotation_step: 2.0,
            ..StackConfig::DEFAULT
        };
        let g = three_cards();
        // Card 2 window: [2000 - 160 - 60, 2000 - 80] = [1780, 1920].
        let half = solve_pass(&config, &g, at(1850.0));
        assert_eq!(half.cards[2].transform.rotation_deg, 2.0);
        let full = solve_pass(&config, &g, at(1920.0));
        assert_eq!(full.cards[2].transform.rotation_deg, 4.0);
        assert_eq!(full.cards[0].transform.rotation_deg, 0.0);

        let disabled = solve_pass(&StackConfig::DEFAULT, &g, at(1920.0));
        assert_eq!(disabled.cards[2].transform.rotation_deg, 0.0);
    }

    #[test]
    fn blur_follows_depth() {
        let config = StackConfig {
            blur_step: 1.5,
            ..StackConfig::DEFAULT
        };
        let g = StackGeometry::new([1000.0, 1500.0, 2000.0, 2500.0], 4000.0);
        // Card 3 trigger start: 2500 - 160 - 90 = 2250.
        let pass = solve_pass(&config, &g, at(2250.0));
        assert_eq!(pass.top_card_index, 3);
        let blurs: Vec<f64> = pass.cards.iter().map(|c| c.transform.blur_px).collect();
        assert_eq!(blurs, [4.5, 3.0, 1.5, 0.0]);

        let none_stacked = solve_pass(&config, &g, at(0.0));
        assert_eq!(none_stacked.top_card_index, 0);
        assert!(none_stacked.cards.iter().all(|c| c.transform.blur_px == 0.0));
    }

    #[test]
    fn top_card_matches_per_card_rescan() {
        let config = StackConfig {
            blur_step: 0.75,
            rotation_step: 1.0,
            ..StackConfig::DEFAULT
        };
        let g = StackGeometry::new([700.0, 1300.0, 1800.0, 2600.0, 3100.0], 4200.0);

        let mut s = 0.0;
        while s < 5000.0 {
            let state = at(s);
            let fast = solve_pass(&config, &g, state);
            let m = PassMetrics::resolve(&config, &g, state);
            for c in g.cards() {
                // Rescan every card for each card, as a naive solver would.
                let mut top = 0;
                for j in g.cards() {
                    if s >= m.trigger_start(&config, j.index, j.top) {
                        top = j.index;
                    }
                }
                let slow = solve_card(&config, &m, s, c.index, c.top, top);
                assert_eq!(fast.cards[c.index], slow, "card {} at {s}", c.index);
            }
            s += 37.0;
        }
    }

    #[test]
    fn solve_is_idempotent() {
        let config = StackConfig {
            blur_step: 1.0,
            rotation_step: 0.5,
            pin_start: Length::Px(123.4),
            ..StackConfig::DEFAULT
        };
        let g = three_cards();
        let a = solve_pass(&config, &g, at(1777.7));
        let b = solve_pass(&config, &g, at(1777.7));
        assert_eq!(a, b);
    }

    #[test]
    fn last_card_pinned_flag() {
        let config = StackConfig::DEFAULT;
        let g = three_cards();
        // Last card trigger start: 2000 - 160 - 60 = 1780; pin_end = 2600.
        assert!(!solve_pass(&config, &g, at(1700.0)).last_card_pinned);
        assert!(solve_pass(&config, &g, at(2000.0)).last_card_pinned);
        assert!(!solve_pass(&config, &g, at(2700.0)).last_card_pinned);
    }

    #[test]
    fn clamped_release_never_completes_stack() {
        let config = StackConfig::DEFAULT;
        // Trigger start 840, pin_end 200: the card is held exactly at 840.
        let g = StackGeometry::new([1000.0], 600.0);
        let pass = solve_pass(&config, &g, at(840.0));
        assert_eq!(pass.cards[0].phase, CardPhase::Pinned);
        assert!(!pass.last_card_pinned);
    }

    #[test]
    fn empty_stack() {
        let pass = solve_pass(&StackConfig::DEFAULT, &StackGeometry::default(), at(500.0));
        assert!(pass.cards.is_empty());
        assert_eq!(pass.top_card_index, 0);
        assert!(!pass.last_card_pinned);
    }

    #[test]
    fn quantize_normalizes_negative_zero() {
        let t = CardTransform {
            translate_y: -0.001,
            scale: 0.99949,
            rotation_deg: 1.234_5,
            blur_px: 0.0,
        }
        .quantized();
        assert_eq!(t.translate_y.to_bits(), 0.0_f64.to_bits());
        assert_eq!(t.scale, 0.999);
        assert_eq!(t.rotation_deg, 1.23);
    }
}
