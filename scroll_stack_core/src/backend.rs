// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for platform integrations.
//!
//! Platform-specific work lives in *backend* crates. Each backend provides:
//!
//! - **Scroll driver**: implements [`ScrollDriver`] over the host's scroll
//!   container, usually on top of [`SmoothScroll`].
//!
//! - **Geometry**: implements [`GeometrySource`] by reading untransformed
//!   card offsets from the host layout.
//!
//! - **Presenter**: implements [`CardPresenter`] to apply transforms to the
//!   host's card elements.
//!
//! - **Frame source**: calls [`ScrollStack::frame`] once per animation
//!   frame. This is backend-specific and not abstracted by a trait because
//!   the setup and lifecycle differ across platforms.
//!
//! [`ScrollDriver`]: crate::driver::ScrollDriver
//! [`SmoothScroll`]: crate::smooth::SmoothScroll
//! [`GeometrySource`]: crate::geometry::GeometrySource
//! [`ScrollStack::frame`]: crate::stack::ScrollStack::frame

use core::fmt;

use crate::config::StackConfig;
use crate::solve::CardTransform;

/// A card the presenter could not find.
///
/// Returned when the host removed a card between layout and presentation.
/// The engine treats the whole pass as not ready and re-samples geometry on
/// the next frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MissingCard(pub usize);

impl fmt::Display for MissingCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card {} is no longer present", self.0)
    }
}

impl core::error::Error for MissingCard {}

/// Applies solved card transforms to a platform-native presentation.
///
/// Both DOM presenters and in-memory test doubles implement this trait.
///
/// # Frame loop pseudocode
///
/// ```rust,ignore
/// fn on_frame(now: HostTime) {
///     let scroll = driver.poll(now);
///     let pass = solve_pass(&config, &geometry, scroll);
///     for (i, card) in pass.cards.iter().enumerate() {
///         if cache.needs_write(i, &card.transform) {
///             presenter.write(i, &card.transform)?;
///             cache.record(i, card.transform);
///         }
///     }
/// }
/// ```
pub trait CardPresenter {
    /// Returns the number of cards currently present.
    fn card_count(&self) -> usize;

    /// Returns a counter that changes whenever the card set is replaced by
    /// different elements, even if the count stays the same.
    ///
    /// A change makes the next geometry sample re-prepare every card and
    /// drop cached transforms. Presenters whose cards never change identity
    /// can keep the default.
    fn generation(&self) -> u64 {
        0
    }

    /// Applies one-time static styling to card `index`: transform origin,
    /// compositing hints, and the `item_distance` spacing.
    ///
    /// Called on attach and again for every card after a structural
    /// relayout.
    fn prepare(&mut self, index: usize, config: &StackConfig) -> Result<(), MissingCard>;

    /// Writes `transform` to card `index`.
    fn write(&mut self, index: usize, transform: &CardTransform) -> Result<(), MissingCard>;
}
