// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use scroll_stack_core::time::Timebase;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Phases become duration slices; everything else is an instant event.
/// Scroll offset is additionally emitted as a counter track.
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
/// Events that carry no timestamp of their own reuse the last frame's.
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut last_ts = 0.0;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Frame(e) => {
                last_ts = ticks_to_us(e.now.ticks(), timebase);
                events.push(json!({
                    "ph": "i",
                    "name": "Frame",
                    "cat": "Frame",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "container_height": e.container_height,
                    }
                }));
                events.push(json!({
                    "ph": "C",
                    "name": "scroll",
                    "ts": last_ts,
                    "pid": 0,
                    "args": { "offset": e.scroll_offset }
                }));
            }
            RecordedEvent::PhaseBegin(e) => {
                events.push(json!({
                    "ph": "B",
                    "name": format!("{:?}", e.phase),
                    "cat": "Frame",
                    "ts": ticks_to_us(e.timestamp.ticks(), timebase),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::PhaseEnd(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": format!("{:?}", e.phase),
                    "cat": "Frame",
                    "ts": ticks_to_us(e.timestamp.ticks(), timebase),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::PassSkipped(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "PassSkipped",
                    "cat": "Frame",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "reason": format!("{:?}", e.reason),
                    }
                }));
            }
            RecordedEvent::Lifecycle(e) => {
                last_ts = ticks_to_us(e.timestamp.ticks(), timebase);
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.kind),
                    "cat": "Lifecycle",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "card_count": e.card_count,
                    }
                }));
            }
            RecordedEvent::StackCompletion(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": if e.completed { "StackComplete" } else { "StackReleased" },
                    "cat": "Lifecycle",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::PassSummary(s) => {
                events.push(json!({
                    "ph": "i",
                    "name": "PassSummary",
                    "cat": "Summary",
                    "ts": ticks_to_us(s.now.ticks(), timebase),
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": s.frame_index,
                        "scroll_offset": s.scroll_offset,
                        "card_count": s.card_count,
                        "top_card_index": s.top_card_index,
                        "writes": s.writes,
                        "suppressed": s.suppressed,
                        "sample_us": ticks_to_us(s.sample_ticks, timebase),
                        "solve_us": ticks_to_us(s.solve_ticks, timebase),
                        "present_us": ticks_to_us(s.present_ticks, timebase),
                    }
                }));
            }
            RecordedEvent::CardWritesCount { frame_index, count } => {
                events.push(json!({
                    "ph": "i",
                    "name": "CardWrites",
                    "cat": "Rich",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": frame_index,
                        "count": count,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use scroll_stack_core::backend::{CardPresenter, MissingCard};
    use scroll_stack_core::config::StackConfig;
    use scroll_stack_core::driver::{ScrollDriver, ScrollState};
    use scroll_stack_core::geometry::{GeometrySource, StackGeometry};
    use scroll_stack_core::solve::CardTransform;
    use scroll_stack_core::stack::ScrollStack;
    use scroll_stack_core::time::HostTime;
    use scroll_stack_core::trace::Tracer;

    /// Scrolls 100px per poll.
    struct Steady(f64);

    impl ScrollDriver for Steady {
        fn poll(&mut self, _now: HostTime) -> ScrollState {
            self.0 += 100.0;
            ScrollState::new(self.0, 800.0)
        }

        fn destroy(&mut self) {}
    }

    struct Fixed;

    impl GeometrySource for Fixed {
        fn sample(&mut self) -> Option<StackGeometry> {
            Some(StackGeometry::new([1000.0, 1500.0, 2000.0], 3000.0))
        }
    }

    struct Sink;

    impl CardPresenter for Sink {
        fn card_count(&self) -> usize {
            3
        }

        fn prepare(&mut self, _: usize, _: &StackConfig) -> Result<(), MissingCard> {
            Ok(())
        }

        fn write(&mut self, _: usize, _: &CardTransform) -> Result<(), MissingCard> {
            Ok(())
        }
    }

    fn export_json(bytes: &[u8]) -> Vec<Value> {
        let mut out = Vec::new();
        export(bytes, Timebase::MICROS, &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn recorded_session_exports() {
        let mut rec = RecorderSink::new();
        let mut stack = ScrollStack::new(StackConfig::DEFAULT, Steady(1500.0), Fixed, Sink);
        stack.attach(HostTime(0), &mut Tracer::new(&mut rec));
        stack.frame(HostTime(16_667), &mut Tracer::new(&mut rec));
        stack.detach(HostTime(33_333), &mut Tracer::new(&mut rec));

        let parsed = export_json(rec.as_bytes());
        let names: Vec<&str> = parsed.iter().filter_map(|e| e["name"].as_str()).collect();
        assert_eq!(names.first(), Some(&"Attached"));
        assert_eq!(names.last(), Some(&"Detached"));
        assert_eq!(names.iter().filter(|n| **n == "PassSummary").count(), 2);

        // Attach samples geometry up front, so each pass has Solve and
        // Present slices only.
        let begins = parsed.iter().filter(|e| e["ph"] == "B").count();
        let ends = parsed.iter().filter(|e| e["ph"] == "E").count();
        assert_eq!(begins, 4);
        assert_eq!(begins, ends);

        let offsets: Vec<f64> = parsed
            .iter()
            .filter(|e| e["ph"] == "C")
            .filter_map(|e| e["args"]["offset"].as_f64())
            .collect();
        assert_eq!(offsets, [1600.0, 1700.0]);

        let second = parsed
            .iter()
            .filter(|e| e["name"] == "Frame")
            .nth(1)
            .unwrap();
        assert_eq!(second["ts"], 16_667.0);
    }

    #[test]
    fn export_empty_recording() {
        assert!(export_json(&[]).is_empty());
    }
}
