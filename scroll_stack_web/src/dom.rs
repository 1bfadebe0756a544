// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM geometry sampling and card presentation.
//!
//! Cards are the elements with class [`CARD_CLASS`] inside the container, in
//! document order; the end marker is the first element with class
//! [`END_CLASS`]. [`DomGeometry`] and [`DomCardPresenter`] share one
//! [`CardList`] so that the presenter always writes to the same elements the
//! geometry was read from.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use scroll_stack_core::backend::{CardPresenter, MissingCard};
use scroll_stack_core::config::StackConfig;
use scroll_stack_core::geometry::{GeometrySource, StackGeometry};
use scroll_stack_core::solve::CardTransform;
use wasm_bindgen::JsCast as _;
use web_sys::HtmlElement;

use crate::css;

/// Class carried by every card element.
pub const CARD_CLASS: &str = "scroll-stack-card";
/// Class carried by the end marker element.
pub const END_CLASS: &str = "scroll-stack-end";

/// The card elements found by the last geometry sample.
///
/// The generation advances whenever a sample finds different elements, so
/// a re-rendered card set is re-prepared even if its size is unchanged.
#[derive(Clone, Debug, Default)]
pub struct CardList {
    cards: Rc<RefCell<Vec<HtmlElement>>>,
    generation: Rc<Cell<u64>>,
}

impl CardList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn replace(&self, cards: Vec<HtmlElement>) {
        let mut current = self.cards.borrow_mut();
        if *current != cards {
            self.generation.set(self.generation.get().wrapping_add(1));
            *current = cards;
        }
    }

    fn len(&self) -> usize {
        self.cards.borrow().len()
    }

    fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Returns card `index` if it is still in the document.
    fn live(&self, index: usize) -> Option<HtmlElement> {
        self.cards
            .borrow()
            .get(index)
            .filter(|el| el.is_connected())
            .cloned()
    }
}

/// Reads untransformed card offsets from the DOM.
///
/// `offsetTop` ignores CSS transforms, so the values stay static while cards
/// are pinned and scaled.
pub struct DomGeometry {
    container: HtmlElement,
    cards: CardList,
}

impl core::fmt::Debug for DomGeometry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomGeometry")
            .field("container", &"HtmlElement")
            .field("cards", &self.cards.len())
            .finish()
    }
}

impl DomGeometry {
    /// Creates a sampler over the cards inside `container`.
    #[must_use]
    pub fn new(container: HtmlElement, cards: CardList) -> Self {
        Self { container, cards }
    }

    fn query_cards(&self) -> Option<Vec<HtmlElement>> {
        let nodes = self
            .container
            .query_selector_all(&alloc::format!(".{CARD_CLASS}"))
            .ok()?;
        let mut cards = Vec::with_capacity(nodes.length() as usize);
        for i in 0..nodes.length() {
            cards.push(nodes.item(i)?.dyn_into::<HtmlElement>().ok()?);
        }
        Some(cards)
    }
}

impl GeometrySource for DomGeometry {
    fn sample(&mut self) -> Option<StackGeometry> {
        let cards = self.query_cards()?;
        let end = self
            .container
            .query_selector(&alloc::format!(".{END_CLASS}"))
            .ok()??
            .dyn_into::<HtmlElement>()
            .ok()?;

        let geometry = StackGeometry::new(
            cards.iter().map(|el| f64::from(el.offset_top())),
            f64::from(end.offset_top()),
        );
        self.cards.replace(cards);
        Some(geometry)
    }
}

/// Writes card transforms as inline CSS.
pub struct DomCardPresenter {
    cards: CardList,
}

impl core::fmt::Debug for DomCardPresenter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomCardPresenter")
            .field("cards", &self.cards.len())
            .finish()
    }
}

impl DomCardPresenter {
    /// Creates a presenter over the cards found by the paired
    /// [`DomGeometry`].
    #[must_use]
    pub fn new(cards: CardList) -> Self {
        Self { cards }
    }
}

impl CardPresenter for DomCardPresenter {
    fn card_count(&self) -> usize {
        self.cards.len()
    }

    fn generation(&self) -> u64 {
        self.cards.generation()
    }

    fn prepare(&mut self, index: usize, config: &StackConfig) -> Result<(), MissingCard> {
        let el = self.cards.live(index).ok_or(MissingCard(index))?;
        let s = el.style();
        // The last card has no following card to keep apart from.
        if index + 1 < self.cards.len() {
            let _ = s.set_property(
                "margin-bottom",
                &alloc::format!("{}px", config.item_distance),
            );
        }
        for (property, value) in css::CARD_BASE_STYLE {
            let _ = s.set_property(property, value);
        }
        Ok(())
    }

    fn write(&mut self, index: usize, transform: &CardTransform) -> Result<(), MissingCard> {
        let el = self.cards.live(index).ok_or(MissingCard(index))?;
        let s = el.style();
        let _ = s.set_property("transform", &css::transform_value(transform));
        let _ = s.set_property("filter", &css::filter_value(transform));
        Ok(())
    }
}
