// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` frame source.
//!
//! [`RafLoop`] calls its callback once per browser animation frame with the
//! frame's [`DOMHighResTimeStamp`][mdn] (milliseconds from
//! `performance.now()`) converted to microsecond [`HostTime`] ticks.
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/DOMHighResTimeStamp

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use scroll_stack_core::time::HostTime;

// Direct global bindings instead of `web_sys::Window` methods; avoids
// fetching (and unwrapping) the Window/Performance objects on every frame.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

/// Converts a millisecond `DOMHighResTimeStamp` to microsecond ticks.
pub(crate) fn millis_to_host_time(ms: f64) -> HostTime {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "rAF timestamps are small positive f64; µs fits in u64 and negatives saturate to 0"
    )]
    let us = (ms * 1000.0) as u64;
    HostTime(us)
}

/// A `requestAnimationFrame` loop.
///
/// Create with [`RafLoop::new`], then call [`start`](Self::start). The loop
/// re-registers itself each frame until [`stop`](Self::stop) is called or the
/// `RafLoop` is dropped.
pub struct RafLoop {
    inner: Rc<RafInner>,
}

type RafClosure = Closure<dyn FnMut(f64)>;

struct RafInner {
    /// The JS closure registered with `requestAnimationFrame`.
    ///
    /// Kept apart from `callback` so the closure can re-register itself
    /// while the callback is borrowed.
    closure: RefCell<Option<RafClosure>>,

    callback: RefCell<Box<dyn FnMut(HostTime)>>,

    running: Cell<bool>,

    /// ID of the pending `requestAnimationFrame` request.
    raf_id: Cell<i32>,
}

impl RafLoop {
    /// Creates a loop that is **not yet running**.
    pub fn new(callback: impl FnMut(HostTime) + 'static) -> Self {
        Self {
            inner: Rc::new(RafInner {
                closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                running: Cell::new(false),
                raf_id: Cell::new(0),
            }),
        }
    }

    /// Starts the loop. No-op if already running.
    pub fn start(&self) {
        if self.inner.running.get() {
            return;
        }
        self.inner.running.set(true);

        let inner = Rc::clone(&self.inner);
        let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            if !inner.running.get() {
                return;
            }

            // A callback that stops the loop from inside itself must not
            // re-enter here; `try_borrow_mut` drops that frame.
            if let Ok(mut callback) = inner.callback.try_borrow_mut() {
                callback(millis_to_host_time(timestamp_ms));
            }

            if inner.running.get()
                && let Some(ref closure) = *inner.closure.borrow()
            {
                let id = request_animation_frame(closure.as_ref().unchecked_ref());
                inner.raf_id.set(id);
            }
        }) as Box<dyn FnMut(f64)>);

        let id = request_animation_frame(closure.as_ref().unchecked_ref());
        self.inner.raf_id.set(id);
        *self.inner.closure.borrow_mut() = Some(closure);
    }

    /// Stops the loop and cancels the pending frame request.
    ///
    /// Can be restarted by calling [`start`](Self::start) again.
    pub fn stop(&self) {
        if !self.inner.running.get() {
            return;
        }
        self.inner.running.set(false);
        cancel_animation_frame(self.inner.raf_id.get());
    }

    /// Returns `true` if the loop is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.stop();
        // Drop the JS closure so it doesn't leak.
        if let Ok(mut closure) = self.inner.closure.try_borrow_mut() {
            closure.take();
        }
    }
}

impl core::fmt::Debug for RafLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafLoop")
            .field("running", &self.inner.running.get())
            .finish_non_exhaustive()
    }
}
