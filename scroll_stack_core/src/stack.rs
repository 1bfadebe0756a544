// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The lifecycle manager.
//!
//! [`ScrollStack`] owns one stack's configuration, transform cache, and the
//! three backend collaborators, and runs the per-frame pipeline:
//!
//! ```text
//!   frame(now)
//!     ├─ driver.poll(now)            → ScrollState
//!     ├─ (unchanged and clean?)      → FrameOutcome::Idle
//!     ├─ geometry.sample()           only when missing
//!     ├─ solve_pass()                pure
//!     ├─ cache.needs_write() / presenter.write()
//!     └─ stack completion edge       → on_stack_complete callback
//! ```
//!
//! # Lifecycle
//!
//! A stack starts *pending*. [`attach`](ScrollStack::attach) mounts it,
//! prepares every card, and runs the first pass.
//! [`detach`](ScrollStack::detach) destroys the driver and clears the cache;
//! it is terminal, and every later [`frame`](ScrollStack::frame) is ignored
//! without touching the presenter.
//!
//! # Failure semantics
//!
//! Nothing on the per-frame path returns an error. Missing geometry or a
//! vanished card skips the pass and forces a re-sample on the next frame.
//!
//! Re-entrant passes cannot happen here: every entry point takes
//! `&mut self`. Backends that share a stack behind `Rc<RefCell<_>>` drop
//! overlapping frames instead of queueing them.

use alloc::boxed::Box;
use core::fmt;

use crate::backend::CardPresenter;
use crate::cache::TransformCache;
use crate::config::StackConfig;
use crate::driver::{ScrollDriver, ScrollState};
use crate::geometry::{GeometrySource, StackGeometry};
use crate::solve::solve_pass;
use crate::time::HostTime;
use crate::trace::{
    FrameEvent, LifecycleEvent, LifecycleKind, PassSkippedEvent, PassSummaryBuilder,
    PhaseBeginEvent, PhaseEndEvent, PhaseKind, SkipReason, StackCompletionEvent, Tracer,
    saturate_u32,
};

#[cfg(feature = "trace-rich")]
use {crate::trace::CardWrite, alloc::vec::Vec};

/// What a call to [`ScrollStack::frame`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Scroll and geometry were unchanged; no pass ran.
    Idle,
    /// A pass ran.
    Solved {
        /// Presenter writes issued.
        writes: usize,
        /// Writes suppressed by the transform cache.
        suppressed: usize,
    },
    /// The pass was skipped.
    Skipped(SkipReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mount {
    Pending,
    Attached,
    Detached,
}

/// A card stack bound to a scroll driver, a geometry source, and a
/// presenter.
pub struct ScrollStack<D, G, P> {
    config: StackConfig,
    driver: D,
    geometry_source: G,
    presenter: P,
    cache: TransformCache,
    geometry: Option<StackGeometry>,
    /// Number of cards that received static styling.
    prepared: usize,
    /// Presenter generation the prepared cards belong to.
    prepared_generation: u64,
    mount: Mount,
    /// Scroll state of the last completed pass.
    last_solved: Option<ScrollState>,
    stack_completed: bool,
    frame_index: u64,
    clock: Option<fn() -> HostTime>,
    on_stack_complete: Option<Box<dyn FnMut()>>,
}

impl<D, G, P> fmt::Debug for ScrollStack<D, G, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollStack")
            .field("config", &self.config)
            .field("mount", &self.mount)
            .field("prepared", &self.prepared)
            .field("frame_index", &self.frame_index)
            .field("stack_completed", &self.stack_completed)
            .finish_non_exhaustive()
    }
}

impl<D, G, P> ScrollStack<D, G, P>
where
    D: ScrollDriver,
    G: GeometrySource,
    P: CardPresenter,
{
    /// Creates a pending stack. `config` is [sanitized](StackConfig::sanitized).
    #[must_use]
    pub fn new(config: StackConfig, driver: D, geometry_source: G, presenter: P) -> Self {
        Self {
            config: config.sanitized(),
            driver,
            geometry_source,
            presenter,
            cache: TransformCache::new(),
            geometry: None,
            prepared: 0,
            prepared_generation: 0,
            mount: Mount::Pending,
            last_solved: None,
            stack_completed: false,
            frame_index: 0,
            clock: None,
            on_stack_complete: None,
        }
    }

    /// Uses `clock` to timestamp phases, so pass summaries carry durations.
    ///
    /// Without a clock every phase is stamped with the frame time.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> HostTime) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Registers a callback fired each time the last card enters its pinned
    /// range.
    pub fn on_stack_complete(&mut self, callback: impl FnMut() + 'static) {
        self.on_stack_complete = Some(Box::new(callback));
    }

    /// Returns the sanitized configuration.
    #[must_use]
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Returns `true` between [`attach`](Self::attach) and
    /// [`detach`](Self::detach).
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.mount == Mount::Attached
    }

    /// Returns `true` while the last card is pinned.
    #[must_use]
    pub fn is_stack_complete(&self) -> bool {
        self.stack_completed
    }

    /// Returns the transform cache.
    #[must_use]
    pub fn cache(&self) -> &TransformCache {
        &self.cache
    }

    /// Returns the presenter.
    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Returns the scroll driver.
    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Returns the scroll driver mutably, e.g. to start a programmatic
    /// scroll.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Mounts the stack: samples geometry, prepares every card, and runs the
    /// first pass.
    ///
    /// Does nothing if already attached or detached. If geometry is not
    /// available yet, the stack still mounts and keeps retrying each frame.
    pub fn attach(&mut self, now: HostTime, tracer: &mut Tracer<'_>) -> FrameOutcome {
        if self.mount != Mount::Pending {
            return FrameOutcome::Skipped(SkipReason::Detached);
        }
        self.mount = Mount::Attached;
        self.resample();
        tracer.lifecycle(&LifecycleEvent {
            kind: LifecycleKind::Attached,
            card_count: saturate_u32(self.prepared),
            timestamp: now,
        });
        self.frame(now, tracer)
    }

    /// Re-samples geometry, e.g. after a resize or a change to the card set.
    ///
    /// If the card set changed, in count or in identity, the cache is cleared
    /// and every card is prepared again so indices stay contiguous. The next
    /// frame re-solves regardless of scroll movement.
    pub fn relayout(&mut self, now: HostTime, tracer: &mut Tracer<'_>) {
        if !self.is_attached() {
            return;
        }
        let restructured = self.resample();
        self.last_solved = None;
        if restructured {
            tracer.lifecycle(&LifecycleEvent {
                kind: LifecycleKind::Relayout,
                card_count: saturate_u32(self.prepared),
                timestamp: now,
            });
        }
    }

    /// Runs one frame: polls the driver and, if anything changed, solves and
    /// presents every card.
    pub fn frame(&mut self, now: HostTime, tracer: &mut Tracer<'_>) -> FrameOutcome {
        if !self.is_attached() {
            // Stale notifications after teardown must not reach the host.
            return FrameOutcome::Skipped(SkipReason::Detached);
        }

        let scroll = self.driver.poll(now);
        if self.geometry.is_some() && self.last_solved == Some(scroll) {
            return FrameOutcome::Idle;
        }

        self.frame_index += 1;
        let frame = FrameEvent::new(self.frame_index, now, scroll);
        tracer.frame(&frame);
        let mut summary = PassSummaryBuilder::new(&frame);

        if self.geometry.is_none() {
            let t0 = self.stamp(now);
            self.phase(tracer, &mut summary, PhaseKind::Sample, t0, true);
            self.resample();
            let t1 = self.stamp(now);
            self.phase(tracer, &mut summary, PhaseKind::Sample, t1, false);
        }
        let Some(geometry) = self.geometry.as_ref() else {
            return self.skip(tracer, SkipReason::NotReady);
        };

        let t0 = self.stamp(now);
        self.phase(tracer, &mut summary, PhaseKind::Solve, t0, true);
        let pass = solve_pass(&self.config, geometry, scroll);
        let t1 = self.stamp(now);
        self.phase(tracer, &mut summary, PhaseKind::Solve, t1, false);
        summary.set_solved(pass.cards.len(), pass.top_card_index);

        self.phase(tracer, &mut summary, PhaseKind::Present, t1, true);
        #[cfg(feature = "trace-rich")]
        let mut written: Vec<CardWrite> = Vec::new();
        let (mut writes, mut suppressed) = (0, 0);
        for (index, card) in pass.cards.iter().enumerate() {
            if !self.cache.needs_write(index, &card.transform) {
                suppressed += 1;
                summary.count_suppressed();
                continue;
            }
            if self.presenter.write(index, &card.transform).is_err() {
                self.geometry = None;
                return self.skip(tracer, SkipReason::MissingCard);
            }
            self.cache.record(index, card.transform);
            writes += 1;
            summary.count_write();
            #[cfg(feature = "trace-rich")]
            written.push(CardWrite {
                index: saturate_u32(index),
                transform: card.transform,
            });
        }
        let t2 = self.stamp(now);
        self.phase(tracer, &mut summary, PhaseKind::Present, t2, false);
        #[cfg(feature = "trace-rich")]
        tracer.card_writes(self.frame_index, &written);

        self.update_completion(pass.last_card_pinned, tracer);
        self.last_solved = Some(scroll);
        tracer.pass_summary(&summary.finish());
        FrameOutcome::Solved { writes, suppressed }
    }

    /// Unmounts the stack: destroys the driver, clears the cache, and stops
    /// all further presenter writes. Idempotent.
    pub fn detach(&mut self, now: HostTime, tracer: &mut Tracer<'_>) {
        if self.mount == Mount::Detached {
            return;
        }
        self.mount = Mount::Detached;
        self.driver.destroy();
        self.cache.clear();
        self.geometry = None;
        self.prepared = 0;
        self.last_solved = None;
        self.stack_completed = false;
        self.on_stack_complete = None;
        tracer.lifecycle(&LifecycleEvent {
            kind: LifecycleKind::Detached,
            card_count: 0,
            timestamp: now,
        });
    }

    /// Samples geometry and re-prepares cards if the card set changed.
    ///
    /// Returns `true` if the cards were prepared again.
    fn resample(&mut self) -> bool {
        let Some(geometry) = self.geometry_source.sample() else {
            self.geometry = None;
            return false;
        };
        if geometry.len() != self.presenter.card_count() {
            // Layout and presentation disagree; wait for the host to settle.
            self.geometry = None;
            return false;
        }
        let generation = self.presenter.generation();
        let restructured =
            geometry.len() != self.prepared || generation != self.prepared_generation;
        if restructured {
            self.cache.clear();
            for index in 0..geometry.len() {
                if self.presenter.prepare(index, &self.config).is_err() {
                    self.geometry = None;
                    self.prepared = 0;
                    return false;
                }
            }
            self.prepared = geometry.len();
            self.prepared_generation = generation;
        }
        self.geometry = Some(geometry);
        restructured
    }

    fn update_completion(&mut self, last_card_pinned: bool, tracer: &mut Tracer<'_>) {
        if last_card_pinned == self.stack_completed {
            return;
        }
        self.stack_completed = last_card_pinned;
        tracer.stack_completion(&StackCompletionEvent {
            frame_index: self.frame_index,
            completed: last_card_pinned,
        });
        if last_card_pinned && let Some(callback) = self.on_stack_complete.as_mut() {
            callback();
        }
    }

    fn skip(&mut self, tracer: &mut Tracer<'_>, reason: SkipReason) -> FrameOutcome {
        tracer.pass_skipped(&PassSkippedEvent {
            frame_index: self.frame_index,
            reason,
        });
        FrameOutcome::Skipped(reason)
    }

    fn stamp(&self, fallback: HostTime) -> HostTime {
        self.clock.map_or(fallback, |clock| clock())
    }

    fn phase(
        &self,
        tracer: &mut Tracer<'_>,
        summary: &mut PassSummaryBuilder,
        phase: PhaseKind,
        timestamp: HostTime,
        begin: bool,
    ) {
        if begin {
            summary.phase_begin(phase, timestamp);
            tracer.phase_begin(&PhaseBeginEvent {
                frame_index: self.frame_index,
                phase,
                timestamp,
            });
        } else {
            summary.phase_end(phase, timestamp);
            tracer.phase_end(&PhaseEndEvent {
                frame_index: self.frame_index,
                phase,
                timestamp,
            });
        }
    }
}
