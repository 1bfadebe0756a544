// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JavaScript option objects.
//!
//! [`parse`] classifies each property of the JS object into an
//! [`OptionValue`]; [`build`] turns those into a [`StackConfig`] without
//! touching JavaScript, so the rules are testable on a native host.

use alloc::string::String;
use core::fmt;
use core::str::FromStr as _;

use js_sys::{Function, Reflect};
use scroll_stack_core::config::{ConfigError, Length, ParseLengthError, StackConfig};
use wasm_bindgen::{JsCast as _, JsValue};

/// Key of the completion callback.
const ON_STACK_COMPLETE: &str = "onStackComplete";

/// Options parsed from the object passed to `ScrollStackHandle.attach`.
#[derive(Debug)]
pub(crate) struct StackOptions {
    pub(crate) config: StackConfig,
    pub(crate) on_stack_complete: Option<Function>,
}

/// A present (not `undefined` or `null`) option property.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum OptionValue {
    Number(f64),
    Text(String),
    Function,
    Other,
}

/// A malformed option.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum OptionError {
    NotAnObject,
    NotANumber(&'static str),
    NotALength(&'static str),
    BadLength(&'static str, ParseLengthError),
    NotAFunction,
    Invalid(ConfigError),
}

impl fmt::Display for OptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => f.write_str("options must be an object"),
            Self::NotANumber(key) => write!(f, "{key} must be a number"),
            Self::NotALength(key) => write!(f, "{key} must be a number or a string"),
            Self::BadLength(key, e) => write!(f, "{key}: {e}"),
            Self::NotAFunction => write!(f, "{ON_STACK_COMPLETE} must be a function"),
            Self::Invalid(e) => write!(f, "{e}"),
        }
    }
}

impl From<OptionError> for JsValue {
    fn from(e: OptionError) -> Self {
        Self::from_str(&alloc::format!("{e}"))
    }
}

/// Builds a validated configuration from looked-up option values.
///
/// Missing keys keep their defaults. Returns whether a completion callback
/// was supplied.
pub(crate) fn build(
    mut get: impl FnMut(&'static str) -> Option<OptionValue>,
) -> Result<(StackConfig, bool), OptionError> {
    let mut config = StackConfig::DEFAULT;
    let mut number = |key: &'static str, out: &mut f64| match get(key) {
        None => Ok(()),
        Some(OptionValue::Number(v)) => {
            *out = v;
            Ok(())
        }
        Some(_) => Err(OptionError::NotANumber(key)),
    };
    number("itemDistance", &mut config.item_distance)?;
    number("itemScale", &mut config.scale_step)?;
    number("itemStackDistance", &mut config.stack_offset)?;
    number("baseScale", &mut config.base_scale)?;
    number("rotationAmount", &mut config.rotation_step)?;
    number("blurAmount", &mut config.blur_step)?;

    if let Some(v) = get("stackPosition") {
        config.pin_start = length("stackPosition", v)?;
    }
    if let Some(v) = get("scaleEndPosition") {
        config.scale_end = length("scaleEndPosition", v)?;
    }
    config.validate().map_err(OptionError::Invalid)?;

    let has_callback = match get(ON_STACK_COMPLETE) {
        None => false,
        Some(OptionValue::Function) => true,
        Some(_) => return Err(OptionError::NotAFunction),
    };
    Ok((config, has_callback))
}

/// Numbers are pixels; strings parse as `"20%"`, `"160px"` or `"160"`.
fn length(key: &'static str, v: OptionValue) -> Result<Length, OptionError> {
    match v {
        OptionValue::Number(px) => Ok(Length::Px(px)),
        OptionValue::Text(s) => Length::from_str(&s).map_err(|e| OptionError::BadLength(key, e)),
        _ => Err(OptionError::NotALength(key)),
    }
}

/// Reads a camelCase options object. `undefined` or `null` selects every
/// default.
pub(crate) fn parse(options: &JsValue) -> Result<StackOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(StackOptions {
            config: StackConfig::DEFAULT,
            on_stack_complete: None,
        });
    }
    if !options.is_object() {
        return Err(OptionError::NotAnObject.into());
    }

    let mut lookup_error = None;
    let result = build(|key| match Reflect::get(options, &JsValue::from_str(key)) {
        Ok(v) => classify(&v),
        Err(e) => {
            if lookup_error.is_none() {
                lookup_error = Some(e);
            }
            None
        }
    });
    // A throwing getter takes precedence over what the lookup reported.
    if let Some(e) = lookup_error {
        return Err(e);
    }
    let (config, has_callback) = result?;

    let on_stack_complete = if has_callback {
        Reflect::get(options, &JsValue::from_str(ON_STACK_COMPLETE))?
            .dyn_into::<Function>()
            .ok()
    } else {
        None
    };
    Ok(StackOptions {
        config,
        on_stack_complete,
    })
}

fn classify(v: &JsValue) -> Option<OptionValue> {
    if v.is_undefined() || v.is_null() {
        None
    } else if let Some(n) = v.as_f64() {
        Some(OptionValue::Number(n))
    } else if let Some(s) = v.as_string() {
        Some(OptionValue::Text(s))
    } else if v.is_function() {
        Some(OptionValue::Function)
    } else {
        Some(OptionValue::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_from(pairs: &[(&str, OptionValue)]) -> Result<(StackConfig, bool), OptionError> {
        build(|key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
        })
    }

    fn text(s: &str) -> OptionValue {
        OptionValue::Text(s.into())
    }

    #[test]
    fn empty_object_keeps_defaults() {
        assert_eq!(build_from(&[]), Ok((StackConfig::DEFAULT, false)));
    }

    #[test]
    fn camel_case_keys_map_to_fields() {
        let (config, _) = build_from(&[
            ("itemDistance", OptionValue::Number(40.0)),
            ("itemScale", OptionValue::Number(0.05)),
            ("itemStackDistance", OptionValue::Number(20.0)),
            ("baseScale", OptionValue::Number(0.9)),
            ("rotationAmount", OptionValue::Number(0.5)),
            ("blurAmount", OptionValue::Number(1.0)),
        ])
        .unwrap();
        assert_eq!(config.item_distance, 40.0);
        assert_eq!(config.scale_step, 0.05);
        assert_eq!(config.stack_offset, 20.0);
        assert_eq!(config.base_scale, 0.9);
        assert_eq!(config.rotation_step, 0.5);
        assert_eq!(config.blur_step, 1.0);
    }

    #[test]
    fn stack_position_number_or_string() {
        let (config, _) = build_from(&[("stackPosition", OptionValue::Number(160.0))]).unwrap();
        assert_eq!(config.pin_start, Length::Px(160.0));

        let (config, _) = build_from(&[
            ("stackPosition", text("30%")),
            ("scaleEndPosition", text("120px")),
        ])
        .unwrap();
        assert_eq!(config.pin_start, Length::Percent(30.0));
        assert_eq!(config.scale_end, Length::Px(120.0));
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert_eq!(
            build_from(&[("itemDistance", text("100"))]),
            Err(OptionError::NotANumber("itemDistance"))
        );
        assert_eq!(
            build_from(&[("stackPosition", text("far"))]),
            Err(OptionError::BadLength("stackPosition", ParseLengthError))
        );
        assert_eq!(
            build_from(&[("scaleEndPosition", OptionValue::Other)]),
            Err(OptionError::NotALength("scaleEndPosition"))
        );
        assert!(matches!(
            build_from(&[("baseScale", OptionValue::Number(1.5))]),
            Err(OptionError::Invalid(ConfigError::BaseScaleOutOfRange(_)))
        ));
    }

    #[test]
    fn callback_must_be_a_function() {
        assert_eq!(
            build_from(&[("onStackComplete", OptionValue::Function)]),
            Ok((StackConfig::DEFAULT, true))
        );
        let err = build_from(&[("onStackComplete", text("done"))]).unwrap_err();
        assert_eq!(err, OptionError::NotAFunction);
        assert_eq!(
            alloc::format!("{err}"),
            "onStackComplete must be a function"
        );
    }
}
