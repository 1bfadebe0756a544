// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`ScrollStack`](crate::stack::ScrollStack) calls at each stage. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`PassSummaryBuilder`] collects phase timestamps during a frame and
//! produces a [`PassSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`CardWrite`] events and the
//!   corresponding `TraceSink` method.

use crate::driver::ScrollState;
use crate::time::HostTime;

#[cfg(feature = "trace-rich")]
use crate::solve::CardTransform;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of a frame is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Reading geometry from the host.
    Sample,
    /// Running the transform solver.
    Solve,
    /// Diffing against the cache and writing to the presenter.
    Present,
}

/// Why a frame produced no writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Geometry could not be sampled (container, card, or end marker absent).
    NotReady,
    /// A card vanished between sampling and presenting.
    MissingCard,
    /// The stack has been detached.
    Detached,
}

/// A lifecycle transition of a stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleKind {
    /// The stack was mounted.
    Attached,
    /// Geometry was re-sampled and the card set changed.
    Relayout,
    /// The stack was unmounted.
    Detached,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a frame starts, after the driver has been polled.
#[derive(Clone, Copy, Debug)]
pub struct FrameEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Host time of the frame.
    pub now: HostTime,
    /// Scroll offset reported by the driver.
    pub scroll_offset: f64,
    /// Container height reported by the driver.
    pub container_height: f64,
}

impl FrameEvent {
    /// Creates a frame event from a polled scroll state.
    #[must_use]
    pub fn new(frame_index: u64, now: HostTime, scroll: ScrollState) -> Self {
        Self {
            frame_index,
            now,
            scroll_offset: scroll.offset,
            container_height: scroll.container_height,
        }
    }
}

/// Marks the beginning of a frame phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
    /// Host time at the start of the phase.
    pub timestamp: HostTime,
}

/// Marks the end of a frame phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
    /// Host time at the end of the phase.
    pub timestamp: HostTime,
}

/// Emitted when a frame is dropped without writing anything.
#[derive(Clone, Copy, Debug)]
pub struct PassSkippedEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Why the pass was skipped.
    pub reason: SkipReason,
}

/// Emitted on attach, structural relayout, and detach.
#[derive(Clone, Copy, Debug)]
pub struct LifecycleEvent {
    /// What happened.
    pub kind: LifecycleKind,
    /// Number of cards after the transition.
    pub card_count: u32,
    /// Host time of the transition.
    pub timestamp: HostTime,
}

/// Emitted when the last card enters or leaves its pinned range.
#[derive(Clone, Copy, Debug)]
pub struct StackCompletionEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// `true` on entry, `false` on exit.
    pub completed: bool,
}

/// Per-frame summary produced by [`PassSummaryBuilder`].
#[derive(Clone, Copy, Debug)]
pub struct PassSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Host time of the frame.
    pub now: HostTime,
    /// Scroll offset the pass was solved at.
    pub scroll_offset: f64,
    /// Cards solved.
    pub card_count: u32,
    /// Topmost stacked card.
    pub top_card_index: u32,
    /// Presenter writes issued.
    pub writes: u32,
    /// Writes suppressed by the transform cache.
    pub suppressed: u32,
    /// Sample phase duration in ticks (0 if not measured).
    pub sample_ticks: u64,
    /// Solve phase duration in ticks (0 if not measured).
    pub solve_ticks: u64,
    /// Present phase duration in ticks (0 if not measured).
    pub present_ticks: u64,
}

/// A single presenter write.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct CardWrite {
    /// Card index.
    pub index: u32,
    /// The transform written.
    pub transform: CardTransform,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the frame loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a frame starts.
    fn on_frame(&mut self, e: &FrameEvent) {
        _ = e;
    }

    /// Called at the beginning of a frame phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a frame phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called when a frame is skipped.
    fn on_pass_skipped(&mut self, e: &PassSkippedEvent) {
        _ = e;
    }

    /// Called on lifecycle transitions.
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        _ = e;
    }

    /// Called when the stack completes or is released.
    fn on_stack_completion(&mut self, e: &StackCompletionEvent) {
        _ = e;
    }

    /// Called with a per-frame summary.
    fn on_pass_summary(&mut self, s: &PassSummary) {
        _ = s;
    }

    /// Called with per-frame card writes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_card_writes(&mut self, frame_index: u64, writes: &[CardWrite]) {
        _ = (frame_index, writes);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

/// Generates a `Tracer` method that forwards one event to the sink.
macro_rules! forward {
    ($(#[$doc:meta])* $name:ident, $method:ident, $ty:ty) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(&mut self, e: &$ty) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$method(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    forward!(
        /// Emits a [`FrameEvent`].
        frame, on_frame, FrameEvent
    );
    forward!(
        /// Emits a [`PhaseBeginEvent`].
        phase_begin, on_phase_begin, PhaseBeginEvent
    );
    forward!(
        /// Emits a [`PhaseEndEvent`].
        phase_end, on_phase_end, PhaseEndEvent
    );
    forward!(
        /// Emits a [`PassSkippedEvent`].
        pass_skipped, on_pass_skipped, PassSkippedEvent
    );
    forward!(
        /// Emits a [`LifecycleEvent`].
        lifecycle, on_lifecycle, LifecycleEvent
    );
    forward!(
        /// Emits a [`StackCompletionEvent`].
        stack_completion, on_stack_completion, StackCompletionEvent
    );
    forward!(
        /// Emits a [`PassSummary`].
        pass_summary, on_pass_summary, PassSummary
    );

    /// Emits card writes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn card_writes(&mut self, frame_index: u64, writes: &[CardWrite]) {
        if let Some(s) = &mut self.sink {
            s.on_card_writes(frame_index, writes);
        }
    }
}

// ---------------------------------------------------------------------------
// PassSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects phase timestamps and counters during a frame and produces a
/// [`PassSummary`].
#[derive(Debug)]
pub struct PassSummaryBuilder {
    frame: FrameEvent,
    card_count: u32,
    top_card_index: u32,
    writes: u32,
    suppressed: u32,
    phase_starts: [Option<HostTime>; 3],
    phase_ends: [Option<HostTime>; 3],
}

impl PassSummaryBuilder {
    /// Starts building a summary for the given frame.
    #[must_use]
    pub fn new(frame: &FrameEvent) -> Self {
        Self {
            frame: *frame,
            card_count: 0,
            top_card_index: 0,
            writes: 0,
            suppressed: 0,
            phase_starts: [None; 3],
            phase_ends: [None; 3],
        }
    }

    /// Records the start of a phase.
    pub fn phase_begin(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_starts[phase_index(phase)] = Some(t);
    }

    /// Records the end of a phase.
    pub fn phase_end(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_ends[phase_index(phase)] = Some(t);
    }

    /// Records the solved card count and topmost stacked card.
    pub fn set_solved(&mut self, card_count: usize, top_card_index: usize) {
        self.card_count = saturate_u32(card_count);
        self.top_card_index = saturate_u32(top_card_index);
    }

    /// Counts one presenter write.
    pub fn count_write(&mut self) {
        self.writes = self.writes.saturating_add(1);
    }

    /// Counts one write suppressed by the cache.
    pub fn count_suppressed(&mut self) {
        self.suppressed = self.suppressed.saturating_add(1);
    }

    /// Consumes the builder and produces the final [`PassSummary`].
    #[must_use]
    pub fn finish(self) -> PassSummary {
        PassSummary {
            frame_index: self.frame.frame_index,
            now: self.frame.now,
            scroll_offset: self.frame.scroll_offset,
            card_count: self.card_count,
            top_card_index: self.top_card_index,
            writes: self.writes,
            suppressed: self.suppressed,
            sample_ticks: self.phase_duration(PhaseKind::Sample),
            solve_ticks: self.phase_duration(PhaseKind::Solve),
            present_ticks: self.phase_duration(PhaseKind::Present),
        }
    }

    fn phase_duration(&self, phase: PhaseKind) -> u64 {
        let idx = phase_index(phase);
        match (self.phase_starts[idx], self.phase_ends[idx]) {
            (Some(start), Some(end)) => end.saturating_duration_since(start).ticks(),
            _ => 0,
        }
    }
}

/// Maps a [`PhaseKind`] to an array index.
const fn phase_index(phase: PhaseKind) -> usize {
    match phase {
        PhaseKind::Sample => 0,
        PhaseKind::Solve => 1,
        PhaseKind::Present => 2,
    }
}

/// Narrows a count for event payloads.
#[must_use]
pub fn saturate_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> FrameEvent {
        FrameEvent::new(42, HostTime(1_000_000), ScrollState::new(840.0, 800.0))
    }

    #[test]
    fn frame_event_from_scroll_state() {
        let e = sample_frame();
        assert_eq!(e.frame_index, 42);
        assert_eq!(e.scroll_offset, 840.0);
        assert_eq!(e.container_height, 800.0);
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_frame(&sample_frame());
        sink.on_pass_skipped(&PassSkippedEvent {
            frame_index: 0,
            reason: SkipReason::NotReady,
        });
        sink.on_pass_summary(&PassSummaryBuilder::new(&sample_frame()).finish());
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.frame(&sample_frame());
        tracer.lifecycle(&LifecycleEvent {
            kind: LifecycleKind::Attached,
            card_count: 3,
            timestamp: HostTime(0),
        });
    }

    #[test]
    fn summary_builder_computes_durations() {
        let mut builder = PassSummaryBuilder::new(&sample_frame());
        builder.phase_begin(PhaseKind::Solve, HostTime(1_000_000));
        builder.phase_end(PhaseKind::Solve, HostTime(1_000_040));
        builder.phase_begin(PhaseKind::Present, HostTime(1_000_040));
        builder.phase_end(PhaseKind::Present, HostTime(1_000_300));
        builder.set_solved(5, 2);
        builder.count_write();
        builder.count_write();
        builder.count_suppressed();

        let summary = builder.finish();
        assert_eq!(summary.sample_ticks, 0, "sample phase not measured");
        assert_eq!(summary.solve_ticks, 40);
        assert_eq!(summary.present_ticks, 260);
        assert_eq!(summary.card_count, 5);
        assert_eq!(summary.top_card_index, 2);
        assert_eq!(summary.writes, 2);
        assert_eq!(summary.suppressed, 1);
        assert_eq!(summary.frame_index, 42);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            skipped: Vec<SkipReason>,
        }
        impl TraceSink for RecordingSink {
            fn on_pass_skipped(&mut self, e: &PassSkippedEvent) {
                self.skipped.push(e.reason);
            }
        }

        let mut sink = RecordingSink {
            skipped: Vec::new(),
        };
        let mut tracer = Tracer::new(&mut sink);
        tracer.pass_skipped(&PassSkippedEvent {
            frame_index: 1,
            reason: SkipReason::MissingCard,
        });
        drop(tracer);
        assert_eq!(sink.skipped, &[SkipReason::MissingCard]);
    }
}
