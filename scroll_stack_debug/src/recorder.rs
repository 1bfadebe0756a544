// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Per-card writes ([`on_card_writes`](TraceSink::on_card_writes)) store only
//! the count.

use scroll_stack_core::time::HostTime;
use scroll_stack_core::trace::{
    CardWrite, FrameEvent, LifecycleEvent, LifecycleKind, PassSkippedEvent, PassSummary,
    PhaseBeginEvent, PhaseEndEvent, PhaseKind, SkipReason, StackCompletionEvent, TraceSink,
    saturate_u32,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FRAME: u8 = 1;
const TAG_PHASE_BEGIN: u8 = 2;
const TAG_PHASE_END: u8 = 3;
const TAG_PASS_SKIPPED: u8 = 4;
const TAG_LIFECYCLE: u8 = 5;
const TAG_STACK_COMPLETION: u8 = 6;
const TAG_PASS_SUMMARY: u8 = 7;
const TAG_CARD_WRITES_COUNT: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::Sample => 0,
            PhaseKind::Solve => 1,
            PhaseKind::Present => 2,
        });
    }

    fn write_skip(&mut self, r: SkipReason) {
        self.write_u8(match r {
            SkipReason::NotReady => 0,
            SkipReason::MissingCard => 1,
            SkipReason::Detached => 2,
        });
    }

    fn write_lifecycle(&mut self, k: LifecycleKind) {
        self.write_u8(match k {
            LifecycleKind::Attached => 0,
            LifecycleKind::Relayout => 1,
            LifecycleKind::Detached => 2,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_frame(&mut self, e: &FrameEvent) {
        self.write_u8(TAG_FRAME);
        self.write_u64(e.frame_index);
        self.write_u64(e.now.ticks());
        self.write_f64(e.scroll_offset);
        self.write_f64(e.container_height);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.write_u8(TAG_PHASE_BEGIN);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.write_u8(TAG_PHASE_END);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_pass_skipped(&mut self, e: &PassSkippedEvent) {
        self.write_u8(TAG_PASS_SKIPPED);
        self.write_u64(e.frame_index);
        self.write_skip(e.reason);
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.write_u8(TAG_LIFECYCLE);
        self.write_lifecycle(e.kind);
        self.write_u32(e.card_count);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_stack_completion(&mut self, e: &StackCompletionEvent) {
        self.write_u8(TAG_STACK_COMPLETION);
        self.write_u64(e.frame_index);
        self.write_u8(u8::from(e.completed));
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        self.write_u8(TAG_PASS_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_u64(s.now.ticks());
        self.write_f64(s.scroll_offset);
        self.write_u32(s.card_count);
        self.write_u32(s.top_card_index);
        self.write_u32(s.writes);
        self.write_u32(s.suppressed);
        self.write_u64(s.sample_ticks);
        self.write_u64(s.solve_ticks);
        self.write_u64(s.present_ticks);
    }

    fn on_card_writes(&mut self, frame_index: u64, writes: &[CardWrite]) {
        self.write_u8(TAG_CARD_WRITES_COUNT);
        self.write_u64(frame_index);
        self.write_u32(saturate_u32(writes.len()));
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`FrameEvent`].
    Frame(FrameEvent),
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`PassSkippedEvent`].
    PassSkipped(PassSkippedEvent),
    /// A [`LifecycleEvent`].
    Lifecycle(LifecycleEvent),
    /// A [`StackCompletionEvent`].
    StackCompletion(StackCompletionEvent),
    /// A [`PassSummary`].
    PassSummary(PassSummary),
    /// Card-write count for a frame.
    CardWritesCount {
        /// Frame counter.
        frame_index: u64,
        /// Number of cards written.
        count: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(f64::from_le_bytes)
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        Some(match self.read_u8()? {
            0 => PhaseKind::Sample,
            1 => PhaseKind::Solve,
            _ => PhaseKind::Present,
        })
    }

    fn read_skip(&mut self) -> Option<SkipReason> {
        Some(match self.read_u8()? {
            0 => SkipReason::NotReady,
            1 => SkipReason::MissingCard,
            _ => SkipReason::Detached,
        })
    }

    fn read_lifecycle(&mut self) -> Option<LifecycleKind> {
        Some(match self.read_u8()? {
            0 => LifecycleKind::Attached,
            1 => LifecycleKind::Relayout,
            _ => LifecycleKind::Detached,
        })
    }

    fn decode_frame(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Frame(FrameEvent {
            frame_index: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            scroll_offset: self.read_f64()?,
            container_height: self.read_f64()?,
        }))
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_pass_skipped(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassSkipped(PassSkippedEvent {
            frame_index: self.read_u64()?,
            reason: self.read_skip()?,
        }))
    }

    fn decode_lifecycle(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Lifecycle(LifecycleEvent {
            kind: self.read_lifecycle()?,
            card_count: self.read_u32()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_stack_completion(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::StackCompletion(StackCompletionEvent {
            frame_index: self.read_u64()?,
            completed: self.read_u8()? != 0,
        }))
    }

    fn decode_pass_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassSummary(PassSummary {
            frame_index: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            scroll_offset: self.read_f64()?,
            card_count: self.read_u32()?,
            top_card_index: self.read_u32()?,
            writes: self.read_u32()?,
            suppressed: self.read_u32()?,
            sample_ticks: self.read_u64()?,
            solve_ticks: self.read_u64()?,
            present_ticks: self.read_u64()?,
        }))
    }

    fn decode_card_writes_count(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let count = self.read_u32()?;
        Some(RecordedEvent::CardWritesCount { frame_index, count })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_FRAME => self.decode_frame(),
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_PASS_SKIPPED => self.decode_pass_skipped(),
            TAG_LIFECYCLE => self.decode_lifecycle(),
            TAG_STACK_COMPLETION => self.decode_stack_completion(),
            TAG_PASS_SUMMARY => self.decode_pass_summary(),
            TAG_CARD_WRITES_COUNT => self.decode_card_writes_count(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use scroll_stack_core::driver::ScrollState;
    use scroll_stack_core::solve::CardTransform;

    fn sample_summary() -> PassSummary {
        PassSummary {
            frame_index: 7,
            now: HostTime(1_000_000),
            scroll_offset: 1480.25,
            card_count: 5,
            top_card_index: 2,
            writes: 3,
            suppressed: 2,
            sample_ticks: 0,
            solve_ticks: 40,
            present_ticks: 310,
        }
    }

    #[test]
    fn round_trip_frame() {
        let mut rec = RecorderSink::new();
        rec.on_frame(&FrameEvent::new(
            7,
            HostTime(1_000_000),
            ScrollState::new(1480.25, 812.0),
        ));

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::Frame(e) => {
                assert_eq!(e.frame_index, 7);
                assert_eq!(e.now, HostTime(1_000_000));
                assert_eq!(e.scroll_offset, 1480.25);
                assert_eq!(e.container_height, 812.0);
            }
            other => panic!("expected Frame, got {other:?}"),
        }
    }

    #[test]
    fn round_trip_pass_summary() {
        let mut rec = RecorderSink::new();
        let orig = sample_summary();
        rec.on_pass_summary(&orig);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::PassSummary(s) => {
                assert_eq!(s.frame_index, orig.frame_index);
                assert_eq!(s.scroll_offset, orig.scroll_offset);
                assert_eq!(s.top_card_index, orig.top_card_index);
                assert_eq!(s.writes, orig.writes);
                assert_eq!(s.suppressed, orig.suppressed);
                assert_eq!(s.present_ticks, orig.present_ticks);
            }
            other => panic!("expected PassSummary, got {other:?}"),
        }
    }

    #[test]
    fn enums_survive_recording() {
        let mut rec = RecorderSink::new();
        for reason in [
            SkipReason::NotReady,
            SkipReason::MissingCard,
            SkipReason::Detached,
        ] {
            rec.on_pass_skipped(&PassSkippedEvent {
                frame_index: 1,
                reason,
            });
        }
        rec.on_lifecycle(&LifecycleEvent {
            kind: LifecycleKind::Relayout,
            card_count: 6,
            timestamp: HostTime(99),
        });
        rec.on_stack_completion(&StackCompletionEvent {
            frame_index: 4,
            completed: true,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        let reasons: Vec<SkipReason> = events
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::PassSkipped(s) => Some(s.reason),
                _ => None,
            })
            .collect();
        assert_eq!(reasons, [
            SkipReason::NotReady,
            SkipReason::MissingCard,
            SkipReason::Detached,
        ]);
        assert!(matches!(
            events[3],
            RecordedEvent::Lifecycle(LifecycleEvent {
                kind: LifecycleKind::Relayout,
                card_count: 6,
                ..
            })
        ));
        assert!(matches!(
            events[4],
            RecordedEvent::StackCompletion(StackCompletionEvent {
                completed: true,
                ..
            })
        ));
    }

    #[test]
    fn card_writes_store_count() {
        let mut rec = RecorderSink::new();
        let writes = [CardWrite {
            index: 0,
            transform: CardTransform::REST,
        }; 3];
        rec.on_card_writes(42, &writes);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::CardWritesCount { frame_index, count } => {
                assert_eq!(*frame_index, 42);
                assert_eq!(*count, 3);
            }
            other => panic!("expected CardWritesCount, got {other:?}"),
        }
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_pass_summary(&sample_summary());
        rec.on_pass_summary(&sample_summary());
        let bytes = rec.into_bytes();
        let cut = &bytes[..bytes.len() - 3];
        assert_eq!(decode(cut).count(), 1);
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }
}
