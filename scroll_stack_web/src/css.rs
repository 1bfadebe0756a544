// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CSS value formatting for card transforms.

use alloc::format;
use alloc::string::String;

use scroll_stack_core::solve::CardTransform;

/// Formats the `transform` property for a card.
pub(crate) fn transform_value(t: &CardTransform) -> String {
    format!(
        "translate3d(0, {}px, 0) scale({}) rotate({}deg)",
        t.translate_y, t.scale, t.rotation_deg
    )
}

/// Formats the `filter` property for a card. Empty when the card is sharp.
pub(crate) fn filter_value(t: &CardTransform) -> String {
    if t.blur_px > 0.0 {
        format!("blur({}px)", t.blur_px)
    } else {
        String::new()
    }
}

/// Static styling applied once per card: `(property, value)` pairs.
pub(crate) const CARD_BASE_STYLE: [(&str, &str); 7] = [
    ("will-change", "transform, filter"),
    ("transform-origin", "top center"),
    ("backface-visibility", "hidden"),
    ("transform", "translateZ(0)"),
    ("-webkit-transform", "translateZ(0)"),
    ("perspective", "1000px"),
    ("-webkit-perspective", "1000px"),
];
