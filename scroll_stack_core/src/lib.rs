// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-synchronized card stacking.
//!
//! `scroll_stack_core` computes per-card visual transforms (translation,
//! scale, rotation, blur) as a pure function of a scroll offset, producing a
//! "cards stack as you scroll past them" effect with pinning regions. It is
//! `no_std` compatible (with `alloc`) and knows nothing about any particular
//! platform; backends supply scroll positions, card geometry, and a place to
//! write the results.
//!
//! # Architecture
//!
//! Every frame runs the same pipeline:
//!
//! ```text
//!   ScrollDriver::poll() ──► ScrollState
//!                               │
//!   GeometrySource::sample() ───┤  (on attach, relayout, after not-ready)
//!                               ▼
//!                     solve::solve_pass()   ◄── StackConfig
//!                               │
//!                               ▼
//!                     TransformCache::needs_write()
//!                               │
//!                               ▼
//!                     CardPresenter::write()
//! ```
//!
//! **[`config`]**: Immutable per-instance settings, percentage-or-pixel
//! [`Length`](config::Length) values, validation and sanitizing.
//!
//! **[`progress`]**: Maps a scroll offset and a trigger window to `[0, 1]`.
//!
//! **[`geometry`]**: Static card offsets sampled once per layout pass.
//!
//! **[`solve`]**: The transform solver. A solve pass is a pure function of
//! (scroll state, geometry, configuration); nothing is carried between
//! frames except the output cache.
//!
//! **[`cache`]**: Suppresses redundant presenter writes by comparing each
//! new transform against the last one written, within per-component
//! tolerances.
//!
//! **[`driver`]** and **[`smooth`]**: The pluggable scroll-notifier contract
//! and a platform-free smooth-scroll model backends can build on.
//!
//! **[`backend`]**: The [`CardPresenter`](backend::CardPresenter) trait that
//! platform backends implement to apply transforms.
//!
//! **[`stack`]**: The lifecycle manager that wires everything together.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! instrumentation, with the zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-card
//!   write events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod backend;
pub mod cache;
pub mod config;
pub mod driver;
pub mod geometry;
pub mod progress;
pub mod smooth;
pub mod solve;
pub mod stack;
pub mod time;
pub mod trace;
