// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for scroll stacks.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`RafLoop`]: `requestAnimationFrame` frame source
//! - [`ElementScroller`]: smooth wheel and touch scrolling over a container
//! - [`DomGeometry`] and [`DomCardPresenter`]: card offsets in, inline CSS out
//! - [`ScrollStackHandle`]: the `attach`/`detach` surface exported to
//!   JavaScript
//!
//! ```js
//! import init, { ScrollStackHandle } from "./pkg/scroll_stack_web.js";
//! await init();
//! const stack = ScrollStackHandle.attach(document.querySelector(".scroller"), {
//!   itemDistance: 100,
//!   stackPosition: "20%",
//!   onStackComplete: () => console.log("stacked"),
//! });
//! stack.scrollTo(0, false);
//! // later
//! stack.detach();
//! ```

#![no_std]

extern crate alloc;

mod css;
mod dom;
mod options;
mod raf;
mod scroller;

pub use dom::{CARD_CLASS, CardList, DomCardPresenter, DomGeometry, END_CLASS};
pub use raf::RafLoop;
pub use scroller::ElementScroller;

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use scroll_stack_core::smooth::SmoothScrollConfig;
use scroll_stack_core::stack::ScrollStack;
use scroll_stack_core::time::{HostTime, Timebase};
use scroll_stack_core::trace::Tracer;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

/// Returns the current host time from `performance.now()`.
///
/// The returned [`HostTime`] is in microsecond ticks. Use [`timebase`] to
/// convert to nanoseconds.
#[must_use]
pub fn now() -> HostTime {
    raf::millis_to_host_time(raf::performance_now())
}

/// Returns the web [`Timebase`]: 1 tick = 1 µs = 1000 ns.
#[must_use]
pub fn timebase() -> Timebase {
    Timebase::MICROS
}

/// A [`ScrollStack`] wired to DOM collaborators.
pub type WebStack = ScrollStack<ElementScroller, DomGeometry, DomCardPresenter>;

/// A scroll stack attached to a container element.
///
/// The handle owns the animation loop. Call [`detach`](Self::detach) (or let
/// JavaScript free the handle) to remove listeners and stop all writes.
#[wasm_bindgen]
pub struct ScrollStackHandle {
    stack: Rc<RefCell<WebStack>>,
    /// Set when `detach` arrives while a frame holds the stack, e.g. from
    /// inside `onStackComplete`. The frame finishes the teardown.
    detach_requested: Rc<Cell<bool>>,
    raf: Option<RafLoop>,
    resize: Option<Closure<dyn FnMut()>>,
}

impl core::fmt::Debug for ScrollStackHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollStackHandle")
            .field("stack", &self.stack)
            .field("raf", &self.raf)
            .finish_non_exhaustive()
    }
}

#[wasm_bindgen]
impl ScrollStackHandle {
    /// Attaches a scroll stack to `container`.
    ///
    /// `options` is an object with any of `itemDistance`, `itemScale`,
    /// `itemStackDistance`, `stackPosition`, `scaleEndPosition`, `baseScale`,
    /// `rotationAmount`, `blurAmount` and `onStackComplete`.
    ///
    /// # Errors
    ///
    /// Fails if `container` is not an `HTMLElement` or an option has the
    /// wrong type or an invalid value.
    pub fn attach(container: JsValue, options: JsValue) -> Result<Self, JsValue> {
        let container: HtmlElement = container
            .dyn_into()
            .map_err(|_| JsValue::from_str("container must be an HTMLElement"))?;
        let options = options::parse(&options)?;

        let cards = CardList::new();
        let mut stack = ScrollStack::new(
            options.config,
            ElementScroller::new(container.clone(), SmoothScrollConfig::DEFAULT),
            DomGeometry::new(container, cards.clone()),
            DomCardPresenter::new(cards),
        )
        .with_clock(now);
        if let Some(callback) = options.on_stack_complete {
            stack.on_stack_complete(move || {
                let _ = callback.call0(&JsValue::NULL);
            });
        }
        stack.attach(now(), &mut Tracer::none());

        let stack = Rc::new(RefCell::new(stack));
        let detach_requested = Rc::new(Cell::new(false));

        let raf = {
            let stack = Rc::clone(&stack);
            let detach_requested = Rc::clone(&detach_requested);
            RafLoop::new(move |t| {
                // Busy: a pass is already running further up the stack.
                let Ok(mut stack) = stack.try_borrow_mut() else {
                    return;
                };
                if !detach_requested.get() {
                    stack.frame(t, &mut Tracer::none());
                }
                if detach_requested.get() {
                    stack.detach(t, &mut Tracer::none());
                }
            })
        };
        raf.start();

        let resize = {
            let stack = Rc::clone(&stack);
            Closure::wrap(Box::new(move || {
                if let Ok(mut stack) = stack.try_borrow_mut() {
                    stack.relayout(now(), &mut Tracer::none());
                }
            }) as Box<dyn FnMut()>)
        };
        if let Some(window) = web_sys::window() {
            let _ = window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());
        }

        Ok(Self {
            stack,
            detach_requested,
            raf: Some(raf),
            resize: Some(resize),
        })
    }

    /// Re-reads card offsets, e.g. after cards were added or removed.
    pub fn relayout(&self) {
        if let Ok(mut stack) = self.stack.try_borrow_mut() {
            stack.relayout(now(), &mut Tracer::none());
        }
    }

    /// Scrolls the container to `offset` pixels, gliding there over the
    /// smooth-scroll duration or jumping when `immediate` is set.
    ///
    /// Ignored while a frame is running or after detach.
    #[wasm_bindgen(js_name = scrollTo)]
    pub fn scroll_to(&self, offset: f64, immediate: bool) {
        if self.detach_requested.get() {
            return;
        }
        if let Ok(mut stack) = self.stack.try_borrow_mut() {
            stack.driver_mut().scroll_to(offset, immediate);
        }
    }

    /// Returns `true` until the stack is detached.
    #[wasm_bindgen(getter, js_name = isAttached)]
    pub fn is_attached(&self) -> bool {
        !self.detach_requested.get() && self.stack.try_borrow().is_ok_and(|s| s.is_attached())
    }

    /// Detaches the stack: stops the animation loop, removes every listener,
    /// and stops all style writes. Idempotent.
    pub fn detach(&mut self) {
        self.detach_requested.set(true);
        if let Some(raf) = self.raf.take() {
            raf.stop();
        }
        if let Some(resize) = self.resize.take()
            && let Some(window) = web_sys::window()
        {
            let _ = window
                .remove_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());
        }
        // If a frame holds the stack, it sees the flag and detaches itself.
        if let Ok(mut stack) = self.stack.try_borrow_mut() {
            stack.detach(now(), &mut Tracer::none());
        }
    }
}

impl Drop for ScrollStackHandle {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timebase_is_microsecond() {
        let tb = timebase();
        // 1 tick = 1 µs = 1000 ns
        assert_eq!(tb.ticks_to_nanos(1), 1000);
        assert_eq!(tb.ticks_to_nanos(1_000_000), 1_000_000_000);
    }
}
