// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Smooth wheel and touch scrolling over a container element.
//!
//! [`ElementScroller`] intercepts `wheel` and `touchmove` on the container,
//! feeds the deltas to a [`SmoothScroll`] model, and writes the animated
//! position back to `scrollTop` each time it is polled. While the model is
//! idle it follows the element's native position instead, so scrollbar drags
//! and keyboard scrolling still reach the engine.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use scroll_stack_core::driver::{ScrollDriver, ScrollState};
use scroll_stack_core::smooth::{InputKind, SmoothScroll, SmoothScrollConfig};
use scroll_stack_core::time::{HostTime, Timebase};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, HtmlElement, TouchEvent, WheelEvent};

/// Pixels per wheel "line" for `DOM_DELTA_LINE` events.
const LINE_HEIGHT: f64 = 100.0 / 6.0;

type Listener = Closure<dyn FnMut(web_sys::Event)>;

/// A [`ScrollDriver`] that smooth-scrolls an element.
pub struct ElementScroller {
    element: HtmlElement,
    model: Rc<RefCell<SmoothScroll>>,
    last_poll: Option<HostTime>,
    listeners: alloc::vec::Vec<(&'static str, Listener)>,
}

impl core::fmt::Debug for ElementScroller {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ElementScroller")
            .field("element", &"HtmlElement")
            .field("model", &self.model)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ElementScroller {
    /// Starts intercepting wheel and touch input on `element`.
    #[must_use]
    pub fn new(element: HtmlElement, config: SmoothScrollConfig) -> Self {
        let mut model = SmoothScroll::new(config);
        model.set_limit(max_scroll(&element));
        model.sync(f64::from(element.scroll_top()));

        let mut scroller = Self {
            element,
            model: Rc::new(RefCell::new(model)),
            last_poll: None,
            listeners: alloc::vec::Vec::new(),
        };
        scroller.listen_wheel();
        scroller.listen_touch();
        scroller
    }

    /// Starts a programmatic scroll to `offset`; see
    /// [`SmoothScroll::scroll_to`].
    pub fn scroll_to(&self, offset: f64, immediate: bool) {
        let mut model = self.model.borrow_mut();
        model.set_limit(max_scroll(&self.element));
        model.scroll_to(offset, immediate);
        if immediate {
            self.element.scroll_to_with_x_and_y(0.0, model.current());
        }
    }

    fn listen_wheel(&mut self) {
        let model = Rc::clone(&self.model);
        let element = self.element.clone();
        self.add_listener("wheel", move |event| {
            let Some(event) = event.dyn_ref::<WheelEvent>() else {
                return;
            };
            event.prevent_default();
            let unit = match event.delta_mode() {
                WheelEvent::DOM_DELTA_LINE => LINE_HEIGHT,
                WheelEvent::DOM_DELTA_PAGE => f64::from(element.client_height()),
                _ => 1.0,
            };
            model
                .borrow_mut()
                .scroll_by(event.delta_y() * unit, InputKind::Wheel);
        });
    }

    fn listen_touch(&mut self) {
        let last_y = Rc::new(Cell::new(None::<f64>));

        let start_y = Rc::clone(&last_y);
        self.add_listener("touchstart", move |event| {
            start_y.set(event.dyn_ref::<TouchEvent>().and_then(first_touch_y));
        });

        let model = Rc::clone(&self.model);
        let move_y = Rc::clone(&last_y);
        self.add_listener("touchmove", move |event| {
            let Some(event) = event.dyn_ref::<TouchEvent>() else {
                return;
            };
            let Some(y) = first_touch_y(event) else {
                return;
            };
            event.prevent_default();
            if let Some(prev) = move_y.replace(Some(y)) {
                model.borrow_mut().scroll_by(prev - y, InputKind::Touch);
            }
        });

        self.add_listener("touchend", move |_| last_y.set(None));
    }

    fn add_listener(&mut self, kind: &'static str, handler: impl FnMut(web_sys::Event) + 'static) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        // Non-passive, so `preventDefault` suppresses native scrolling.
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        let _ = self
            .element
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &options,
            );
        self.listeners.push((kind, closure));
    }
}

impl ScrollDriver for ElementScroller {
    fn poll(&mut self, now: HostTime) -> ScrollState {
        let dt = self.last_poll.map_or(0.0, |prev| {
            now.saturating_duration_since(prev).as_secs(Timebase::MICROS)
        });
        self.last_poll = Some(now);

        let mut model = self.model.borrow_mut();
        model.set_limit(max_scroll(&self.element));
        if model.is_animating() {
            let y = model.step(dt);
            self.element.scroll_to_with_x_and_y(0.0, y);
        } else {
            model.sync(f64::from(self.element.scroll_top()));
        }
        ScrollState::new(model.current(), f64::from(self.element.client_height()))
    }

    fn destroy(&mut self) {
        for (kind, closure) in self.listeners.drain(..) {
            let _ = self
                .element
                .remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        }
    }
}

impl Drop for ElementScroller {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn max_scroll(element: &HtmlElement) -> f64 {
    f64::from(element.scroll_height() - element.client_height())
}

fn first_touch_y(event: &TouchEvent) -> Option<f64> {
    event.touches().get(0).map(|t| f64::from(t.client_y()))
}
