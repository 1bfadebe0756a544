// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static card geometry.
//!
//! Card offsets are read once per layout pass (on attach, on relayout, and
//! after a pass was skipped as not ready) rather than every frame. The
//! solver applies its own transforms on top of these offsets, so the values
//! must be the untransformed layout positions (`offsetTop` on the web).

use alloc::vec::Vec;

/// One card's static position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardGeometry {
    /// Position in the stack, 0-based, in document order.
    pub index: usize,
    /// Offset of the card's top edge from the top of the scrollable content,
    /// in pixels.
    pub top: f64,
}

/// Static geometry for a whole stack, captured in one layout pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StackGeometry {
    cards: Vec<CardGeometry>,
    /// Offset of the end marker placed after the last card.
    pub end_marker_top: f64,
}

impl StackGeometry {
    /// Builds geometry from card top offsets in document order.
    ///
    /// Indices are assigned contiguously from zero.
    #[must_use]
    pub fn new(card_tops: impl IntoIterator<Item = f64>, end_marker_top: f64) -> Self {
        let cards = card_tops
            .into_iter()
            .enumerate()
            .map(|(index, top)| CardGeometry { index, top })
            .collect();
        Self {
            cards,
            end_marker_top,
        }
    }

    /// Returns the cards in index order.
    #[inline]
    #[must_use]
    pub fn cards(&self) -> &[CardGeometry] {
        &self.cards
    }

    /// Returns the number of cards.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns `true` if the stack has no cards.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Reads static stack geometry from the host layout.
///
/// Returns `None` when the container, a card, or the end marker cannot be
/// found. The caller treats that as "not ready yet" and tries again on the
/// next frame.
pub trait GeometrySource {
    /// Samples the current layout.
    fn sample(&mut self) -> Option<StackGeometry>;
}
