// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to microseconds using a [`Timebase`].

use std::io::Write;

use scroll_stack_core::time::{HostTime, Timebase};
use scroll_stack_core::trace::{
    CardWrite, FrameEvent, LifecycleEvent, LifecycleKind, PassSkippedEvent, PassSummary,
    PhaseBeginEvent, PhaseEndEvent, PhaseKind, SkipReason, StackCompletionEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn ticks_to_us(&self, ticks: u64) -> f64 {
        self.timebase.ticks_to_nanos(ticks) as f64 / 1000.0
    }

    fn host_us(&self, t: HostTime) -> f64 {
        self.ticks_to_us(t.ticks())
    }
}

fn phase_name(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::Sample => "sample",
        PhaseKind::Solve => "solve",
        PhaseKind::Present => "present",
    }
}

fn skip_name(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::NotReady => "not-ready",
        SkipReason::MissingCard => "missing-card",
        SkipReason::Detached => "detached",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame(&mut self, e: &FrameEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] frame={} now={:.1}µs scroll={:.2}px height={:.0}px",
            e.frame_index,
            self.host_us(e.now),
            e.scroll_offset,
            e.container_height,
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {} at {:.1}µs",
            e.frame_index,
            phase_name(e.phase),
            self.host_us(e.timestamp),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {} at {:.1}µs",
            e.frame_index,
            phase_name(e.phase),
            self.host_us(e.timestamp),
        );
    }

    fn on_pass_skipped(&mut self, e: &PassSkippedEvent) {
        let _ = writeln!(
            self.writer,
            "[skip] frame={} reason={}",
            e.frame_index,
            skip_name(e.reason),
        );
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        let kind = match e.kind {
            LifecycleKind::Attached => "attached",
            LifecycleKind::Relayout => "relayout",
            LifecycleKind::Detached => "detached",
        };
        let _ = writeln!(
            self.writer,
            "[{kind}] cards={} at {:.1}µs",
            e.card_count,
            self.host_us(e.timestamp),
        );
    }

    fn on_stack_completion(&mut self, e: &StackCompletionEvent) {
        let state = if e.completed { "complete" } else { "released" };
        let _ = writeln!(self.writer, "[stack] frame={} {state}", e.frame_index);
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] frame={} cards={} top={} writes={} suppressed={} \
             sample={:.1}µs solve={:.1}µs present={:.1}µs",
            s.frame_index,
            s.card_count,
            s.top_card_index,
            s.writes,
            s.suppressed,
            self.ticks_to_us(s.sample_ticks),
            self.ticks_to_us(s.solve_ticks),
            self.ticks_to_us(s.present_ticks),
        );
    }

    fn on_card_writes(&mut self, frame_index: u64, writes: &[CardWrite]) {
        for w in writes {
            let t = &w.transform;
            let _ = writeln!(
                self.writer,
                "[write] frame={frame_index} card={} y={} scale={} rotate={} blur={}",
                w.index, t.translate_y, t.scale, t.rotation_deg, t.blur_px,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scroll_stack_core::driver::ScrollState;
    use scroll_stack_core::solve::CardTransform;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_writer()).unwrap()
    }

    #[test]
    fn pretty_print_frame() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::MICROS);
        sink.on_frame(&FrameEvent::new(
            3,
            HostTime(16_000),
            ScrollState::new(1234.5, 800.0),
        ));
        let out = output(sink);
        assert!(out.contains("[frame]"), "got: {out}");
        assert!(out.contains("frame=3"), "got: {out}");
        assert!(out.contains("now=16000.0µs"), "got: {out}");
        assert!(out.contains("scroll=1234.50px"), "got: {out}");
    }

    #[test]
    fn pretty_print_skip_and_lifecycle() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS);
        sink.on_lifecycle(&LifecycleEvent {
            kind: LifecycleKind::Attached,
            card_count: 4,
            timestamp: HostTime(0),
        });
        sink.on_pass_skipped(&PassSkippedEvent {
            frame_index: 9,
            reason: SkipReason::MissingCard,
        });
        let out = output(sink);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[attached] cards=4"), "got: {out}");
        assert_eq!(lines[1], "[skip] frame=9 reason=missing-card");
    }

    #[test]
    fn one_line_per_card_write() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS);
        let writes = [
            CardWrite {
                index: 0,
                transform: CardTransform::REST,
            },
            CardWrite {
                index: 1,
                transform: CardTransform {
                    translate_y: 190.0,
                    scale: 0.88,
                    ..CardTransform::REST
                },
            },
        ];
        sink.on_card_writes(2, &writes);
        let out = output(sink);
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("card=1 y=190 scale=0.88"), "got: {out}");
    }
}
