// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web demo: a stack of DOM cards driven by `scroll_stack_web`.
//!
//! Builds a full-height scroll container holding five colored cards and an
//! end marker, then attaches a [`ScrollStackHandle`] with blur and a slight
//! rotation enabled. A status line reports when the stack completes.
//!
//! Build with: `wasm-pack build --target web demos/web_stack`
//!
//! Then serve `demos/web_stack/` and open `index.html` in a browser.
//!
//! [`ScrollStackHandle`]: scroll_stack_web::ScrollStackHandle

// This crate only runs in the browser; suppress dead-code warnings when
// cargo-checking on a native host target.
#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use alloc::boxed::Box;
use alloc::format;

use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

use scroll_stack_web::{CARD_CLASS, END_CLASS, ScrollStackHandle};

const CARD_COLORS: [&str; 5] = [
    "rgb(242, 67, 54)",  // red
    "rgb(77, 176, 80)",  // green
    "rgb(33, 150, 243)", // blue
    "rgb(255, 194, 8)",  // amber
    "rgb(156, 39, 176)", // purple
];

fn div(document: &Document, class: &str) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = document.create_element("div")?.unchecked_into();
    if !class.is_empty() {
        el.set_class_name(class);
    }
    Ok(el)
}

fn create_scroller(document: &Document) -> Result<HtmlElement, JsValue> {
    let scroller = div(document, "scroll-stack-scroller")?;
    let s = scroller.style();
    s.set_property("position", "relative")?;
    s.set_property("height", "100vh")?;
    s.set_property("overflow-y", "auto")?;
    s.set_property("overscroll-behavior", "contain")?;

    let inner = div(document, "scroll-stack-inner")?;
    let s = inner.style();
    s.set_property("padding", "20vh 5rem 50rem")?;
    s.set_property("min-height", "100vh")?;

    for (i, color) in CARD_COLORS.iter().enumerate() {
        let card = div(document, CARD_CLASS)?;
        let s = card.style();
        s.set_property("position", "relative")?;
        s.set_property("height", "20rem")?;
        s.set_property("margin", "30px 0")?;
        s.set_property("padding", "3rem")?;
        s.set_property("border-radius", "40px")?;
        s.set_property("box-sizing", "border-box")?;
        s.set_property("background", color)?;
        s.set_property("box-shadow", "0 0 30px rgba(0, 0, 0, 0.1)")?;
        card.set_text_content(Some(&format!("Card {}", i + 1)));
        inner.append_child(&card)?;
    }

    let end = div(document, END_CLASS)?;
    end.style().set_property("height", "1px")?;
    end.style().set_property("width", "100%")?;
    inner.append_child(&end)?;

    scroller.append_child(&inner)?;
    Ok(scroller)
}

fn create_status(document: &Document) -> Result<HtmlElement, JsValue> {
    let status = div(document, "")?;
    let s = status.style();
    s.set_property("position", "fixed")?;
    s.set_property("top", "1rem")?;
    s.set_property("left", "1rem")?;
    s.set_property("z-index", "10")?;
    status.set_text_content(Some("scroll down"));
    Ok(status)
}

/// Entry point, called automatically by `wasm_bindgen(start)`.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;

    let status = create_status(&document)?;
    body.append_child(&status)?;
    let scroller = create_scroller(&document)?;
    body.append_child(&scroller)?;

    let on_complete = Closure::wrap(Box::new(move || {
        status.set_text_content(Some("stack complete"));
    }) as Box<dyn FnMut()>);

    let options = Object::new();
    Reflect::set(&options, &"blurAmount".into(), &1.0.into())?;
    Reflect::set(&options, &"rotationAmount".into(), &0.5.into())?;
    Reflect::set(&options, &"stackPosition".into(), &"20%".into())?;
    Reflect::set(&options, &"onStackComplete".into(), on_complete.as_ref())?;

    let handle = ScrollStackHandle::attach(scroller.into(), options.into())?;

    // Keep the stack and callback alive; the demo never tears down.
    core::mem::forget(handle);
    on_complete.forget();

    Ok(())
}
