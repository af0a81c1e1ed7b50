// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paired playback control.
//!
//! [`PairController`] owns the before and after media elements and keeps
//! them behaving as one:
//!
//! ```text
//!            load()            both Ready
//!   Idle ───────────► Loading ───────────► Ready ──play()──┐
//!                        ▲                                  ▼
//!                        │ load()          pause()   ┌──► Playing ◄──┐
//!                        │                 ┌─────────┘       │       │ loop
//!                        │                 ▼                 │ Ended │ settled
//!   Error(side) ◄─ any failure ─        Paused ──play()──►   ▼       │
//!                                                          Ended ────┘
//! ```
//!
//! - **Paired play**: both sides are seeked to the earlier of their two
//!   positions, then `play` is dispatched to both before either settles. The
//!   operation succeeds once both have started; the first rejection rolls the
//!   pair back to paused at once, without waiting for the other side.
//!
//! - **Loop in lockstep**: when either side ends, both return to zero and
//!   restart as one operation.
//!
//! - **Drift correction**: while playing, the positions are compared every
//!   [`SyncPolicy::correction_interval`]; past the tolerance both snap to the
//!   policy's target. Corrections are rate-limited to one per interval and
//!   never change play/pause state.
//!
//! - **Staleness**: every load starts a new [`Generation`] and every paired
//!   play a new [`PlayTicket`]; notifications for anything else are dropped.

use alloc::boxed::Box;

use crate::error::{ControlError, FaultKind, MediaFault, Rejection};
use crate::load::{LoadTracker, LoadUpdate};
use crate::media::{Generation, MediaElement, MediaEvent, MediaEventKind, PlayTicket, Side};
use crate::policy::{CorrectionTarget, SyncPolicy};
use crate::selection::MediaPaths;
use crate::status::Status;
use crate::time::HostTime;
use crate::trace::{
    DriftAction, DriftEvent, FaultEvent, PlayCancelledEvent, PlayDispatchEvent, PlaySettledEvent,
    StaleEvent, TraceSink, Tracer, TransitionEvent,
};

/// Controller state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PairState {
    /// Nothing loaded.
    Idle,
    /// Sources assigned; waiting for both sides to become ready.
    Loading,
    /// Both sides ready and paused; never played since the load.
    Ready,
    /// Both sides playing.
    Playing,
    /// Both sides paused after having played.
    Paused,
    /// A side reached its end; the pair is restarting from zero.
    Ended,
    /// A side failed. Terminal until the next load.
    Error(Side),
}

/// What requested a paired play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayOrigin {
    /// The play command.
    User,
    /// Automatic start after both sides became ready.
    Autoplay,
    /// The restart command.
    Restart,
    /// Lockstep loop after a side ended.
    Loop,
}

/// Outcome of a drift check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DriftCheck {
    /// The pair is not playing; nothing was measured.
    Skipped,
    /// Drift is within tolerance.
    WithinTolerance {
        /// Absolute position difference, in seconds.
        drift: f64,
    },
    /// Both sides were moved to `target`.
    Corrected {
        /// Absolute position difference before the correction, in seconds.
        drift: f64,
        /// Position both sides snapped to, in seconds.
        target: f64,
    },
    /// Out of tolerance, but the previous correction is too recent.
    Suppressed {
        /// Absolute position difference, in seconds.
        drift: f64,
    },
}

/// Counters describing drift over the current load cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DriftStats {
    /// Corrections applied.
    pub corrections: u64,
    /// Corrections skipped by rate limiting.
    pub suppressed: u64,
    /// Largest drift measured, in seconds.
    pub max_drift: f64,
}

#[derive(Clone, Copy, Debug)]
struct PendingPlay {
    ticket: PlayTicket,
    origin: PlayOrigin,
    /// Sides that reported a successful start.
    started: [bool; 2],
}

/// Keeps two media elements playing as a single timeline.
///
/// The controller is driven entirely from outside: commands from the user,
/// [`handle`](Self::handle) for media notifications and
/// [`tick`](Self::tick) from a periodic timer. Each call receives the current
/// [`HostTime`].
#[derive(Debug)]
pub struct PairController<M> {
    before: M,
    after: M,
    policy: SyncPolicy,
    loads: LoadTracker,
    state: PairState,
    pending: Option<PendingPlay>,
    deferred: Option<PlayOrigin>,
    autoplay_armed: bool,
    autoplay_at: Option<HostTime>,
    next_check_at: Option<HostTime>,
    last_correction: Option<HostTime>,
    has_played: bool,
    serial: u32,
    muted: bool,
    fault: Option<MediaFault>,
    rejection: Option<MediaFault>,
    stats: DriftStats,
    tracer: Tracer,
}

impl<M: MediaElement> PairController<M> {
    /// Creates an idle controller owning both elements.
    pub fn new(policy: SyncPolicy, before: M, after: M) -> Self {
        Self {
            before,
            after,
            policy,
            loads: LoadTracker::new(),
            state: PairState::Idle,
            pending: None,
            deferred: None,
            autoplay_armed: false,
            autoplay_at: None,
            next_check_at: None,
            last_correction: None,
            has_played: false,
            serial: 0,
            muted: policy.start_muted,
            fault: None,
            rejection: None,
            stats: DriftStats::default(),
            tracer: Tracer::none(),
        }
    }

    /// Creates an idle controller that reports to `sink`.
    ///
    /// Events are only delivered when the `trace` feature is enabled.
    pub fn with_sink(policy: SyncPolicy, before: M, after: M, sink: Box<dyn TraceSink>) -> Self {
        let mut controller = Self::new(policy, before, after);
        controller.tracer = Tracer::new(sink);
        controller
    }

    // -- inspection ---------------------------------------------------------

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> PairState {
        self.state
    }

    /// Policy the controller was built with.
    #[must_use]
    pub const fn policy(&self) -> &SyncPolicy {
        &self.policy
    }

    /// Generation of the current load cycle.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.loads.generation()
    }

    /// Returns `true` if audio is muted on both sides.
    #[must_use]
    pub const fn is_muted(&self) -> bool {
        self.muted
    }

    /// Returns `true` while playing or while a paired play is in flight.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == PairState::Playing
            || self.pending.is_some()
            || (self.state == PairState::Loading && self.deferred.is_some())
    }

    /// Current positions `(before, after)`, in seconds.
    #[must_use]
    pub fn positions(&self) -> (f64, f64) {
        (self.before.position(), self.after.position())
    }

    /// Drift counters for the current load cycle.
    #[must_use]
    pub const fn drift_stats(&self) -> DriftStats {
        self.stats
    }

    /// The failure that put the pair in [`PairState::Error`], or else the
    /// last rejected play.
    #[must_use]
    pub fn last_fault(&self) -> Option<MediaFault> {
        self.fault.or(self.rejection)
    }

    /// Status line derived from state and the last fault.
    #[must_use]
    pub fn status(&self) -> Status {
        match self.state {
            PairState::Idle => Status::Idle,
            PairState::Loading => Status::Loading {
                autoplay: self.autoplay_armed,
            },
            PairState::Error(_) => {
                Status::Error(self.fault.map_or(FaultKind::LoadFailure, |f| f.kind))
            }
            PairState::Playing | PairState::Ended => Status::Playing,
            PairState::Ready if self.autoplay_pending() => Status::Loading { autoplay: true },
            PairState::Ready | PairState::Paused => match self.rejection {
                Some(r) if r.kind.is_blocked() => Status::Blocked,
                Some(r) => Status::Error(r.kind),
                None if self.state == PairState::Ready => Status::Ready,
                None => Status::Paused,
            },
        }
    }

    /// Returns the element for `side`.
    pub fn element(&self, side: Side) -> &M {
        match side {
            Side::Before => &self.before,
            Side::After => &self.after,
        }
    }

    /// Returns the element for `side` mutably.
    pub fn element_mut(&mut self, side: Side) -> &mut M {
        match side {
            Side::Before => &mut self.before,
            Side::After => &mut self.after,
        }
    }

    // -- commands -----------------------------------------------------------

    /// Assigns new sources to both sides and starts loading them.
    ///
    /// Everything tied to the previous load is cancelled: an in-flight play,
    /// a deferred or scheduled start, drift bookkeeping and recorded faults.
    pub fn load(&mut self, paths: &MediaPaths, now: HostTime) -> Generation {
        self.cancel_pending(now);
        self.deferred = None;
        self.autoplay_at = None;
        self.next_check_at = None;
        self.last_correction = None;
        self.has_played = false;
        self.fault = None;
        self.rejection = None;
        self.stats = DriftStats::default();
        self.autoplay_armed = self.policy.autoplay;

        let generation = self.loads.begin();
        self.before.load(&paths.before, generation);
        self.after.load(&paths.after, generation);
        self.before.set_muted(self.muted);
        self.after.set_muted(self.muted);
        self.transition(PairState::Loading, now);
        generation
    }

    /// Starts both sides together from the earlier of their two positions.
    ///
    /// While loading, the request is remembered and carried out once both
    /// sides are ready. Does nothing if already playing or starting.
    pub fn play(&mut self, now: HostTime) -> Result<(), ControlError> {
        match self.state {
            PairState::Idle => Err(ControlError::NoSource),
            PairState::Error(side) => Err(self.faulted(side)),
            PairState::Loading => {
                self.deferred = Some(PlayOrigin::User);
                Ok(())
            }
            PairState::Playing => Ok(()),
            _ if self.pending.is_some() => Ok(()),
            PairState::Ready | PairState::Paused | PairState::Ended => {
                self.start(PlayOrigin::User, now);
                Ok(())
            }
        }
    }

    /// Pauses both sides immediately.
    ///
    /// Cancels any in-flight, deferred or scheduled start.
    pub fn pause(&mut self, now: HostTime) {
        self.cancel_pending(now);
        self.deferred = None;
        self.autoplay_at = None;
        self.next_check_at = None;
        match self.state {
            PairState::Idle | PairState::Error(_) => {}
            PairState::Loading => self.autoplay_armed = false,
            PairState::Ready | PairState::Paused => {
                self.before.pause();
                self.after.pause();
            }
            PairState::Playing | PairState::Ended => {
                self.before.pause();
                self.after.pause();
                self.transition(PairState::Paused, now);
            }
        }
    }

    /// Pauses when playing or starting, plays otherwise.
    pub fn toggle_play(&mut self, now: HostTime) -> Result<(), ControlError> {
        if self.is_active() {
            self.pause(now);
            Ok(())
        } else {
            self.play(now)
        }
    }

    /// Moves both sides to zero and starts them together.
    ///
    /// While loading, the restart is carried out once both sides are ready.
    pub fn restart(&mut self, now: HostTime) -> Result<(), ControlError> {
        match self.state {
            PairState::Idle => Err(ControlError::NoSource),
            PairState::Error(side) => Err(self.faulted(side)),
            PairState::Loading => {
                self.deferred = Some(PlayOrigin::Restart);
                Ok(())
            }
            PairState::Ready | PairState::Playing | PairState::Paused | PairState::Ended => {
                self.start(PlayOrigin::Restart, now);
                Ok(())
            }
        }
    }

    /// Flips the mute state of both sides together and returns the new
    /// state. Playback is unaffected.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.before.set_muted(self.muted);
        self.after.set_muted(self.muted);
        self.muted
    }

    // -- notifications ------------------------------------------------------

    /// Feeds a notification from one of the elements.
    pub fn handle(&mut self, event: MediaEvent, now: HostTime) {
        if !self.loads.is_current(event.generation) {
            self.stale(event.side, event.generation, now);
            return;
        }
        match event.kind {
            MediaEventKind::Ready => {
                if self.loads.mark_ready(event.side, event.generation) == LoadUpdate::BothReady {
                    self.on_both_ready(now);
                }
            }
            MediaEventKind::Failed(kind) => {
                if let LoadUpdate::Failed(fault) =
                    self.loads.mark_failed(event.side, event.generation, kind)
                {
                    self.on_fault(fault, now);
                }
            }
            MediaEventKind::Ended => self.on_ended(now),
            MediaEventKind::TimeUpdate => {
                self.check_drift(now, Some(event.side));
            }
            MediaEventKind::PlaySettled { ticket, result } => {
                self.on_play_settled(event.side, ticket, result, now);
            }
        }
    }

    /// Drives timer work: a scheduled autoplay and the periodic drift check.
    ///
    /// Call at least as often as the finer of the autoplay delay and the
    /// correction interval; every animation frame is fine.
    pub fn tick(&mut self, now: HostTime) {
        if let Some(at) = self.autoplay_at
            && now >= at
        {
            self.autoplay_at = None;
            if self.state == PairState::Ready && self.pending.is_none() {
                self.start(PlayOrigin::Autoplay, now);
            }
        }

        if self.state != PairState::Playing || self.pending.is_some() {
            return;
        }
        match self.next_check_at {
            None => self.next_check_at = Some(now + self.policy.correction_interval),
            Some(at) if now >= at => {
                self.next_check_at = Some(now + self.policy.correction_interval);
                self.check_drift(now, None);
            }
            Some(_) => {}
        }
    }

    /// Measures drift and corrects it if it exceeds the tolerance.
    ///
    /// `trigger` is the side whose time update prompted the check, if any.
    /// Only runs while playing with no paired play in flight.
    pub fn check_drift(&mut self, now: HostTime, trigger: Option<Side>) -> DriftCheck {
        if self.state != PairState::Playing || self.pending.is_some() {
            return DriftCheck::Skipped;
        }
        let (before, after) = self.positions();
        let drift = (before - after).abs();
        if drift > self.stats.max_drift {
            self.stats.max_drift = drift;
        }
        if drift <= self.policy.drift_tolerance {
            return DriftCheck::WithinTolerance { drift };
        }

        if let Some(last) = self.last_correction
            && now - last < self.policy.correction_interval
        {
            self.stats.suppressed += 1;
            self.tracer.drift(&DriftEvent {
                at: now,
                before,
                after,
                trigger,
                action: DriftAction::Suppressed,
            });
            return DriftCheck::Suppressed { drift };
        }

        let target = match (self.policy.correction_target, trigger) {
            (CorrectionTarget::Max | CorrectionTarget::Triggering, None) => before.max(after),
            (CorrectionTarget::Max, Some(_)) => before.max(after),
            (CorrectionTarget::Min, _) => before.min(after),
            (CorrectionTarget::Triggering, Some(Side::Before)) => before,
            (CorrectionTarget::Triggering, Some(Side::After)) => after,
        };
        self.before.seek(target);
        self.after.seek(target);
        self.last_correction = Some(now);
        self.stats.corrections += 1;
        self.tracer.drift(&DriftEvent {
            at: now,
            before,
            after,
            trigger,
            action: DriftAction::Corrected { target },
        });
        DriftCheck::Corrected { drift, target }
    }

    // -- internals ----------------------------------------------------------

    fn start(&mut self, origin: PlayOrigin, now: HostTime) {
        self.cancel_pending(now);
        self.autoplay_at = None;
        self.deferred = None;
        let position = match origin {
            PlayOrigin::User | PlayOrigin::Autoplay => {
                self.before.position().min(self.after.position())
            }
            PlayOrigin::Restart | PlayOrigin::Loop => 0.0,
        };
        self.before.seek(position);
        self.after.seek(position);

        self.serial = self.serial.wrapping_add(1);
        let ticket = PlayTicket {
            generation: self.loads.generation(),
            serial: self.serial,
        };
        self.pending = Some(PendingPlay {
            ticket,
            origin,
            started: [false; 2],
        });
        self.tracer.play_dispatch(&PlayDispatchEvent {
            at: now,
            ticket,
            origin,
            position,
        });
        self.before.play(ticket);
        self.after.play(ticket);
    }

    fn on_both_ready(&mut self, now: HostTime) {
        if self.state != PairState::Loading {
            return;
        }
        self.transition(PairState::Ready, now);
        if let Some(origin) = self.deferred.take() {
            self.start(origin, now);
        } else if self.autoplay_armed {
            let at = now + self.policy.autoplay_delay;
            if at <= now {
                self.start(PlayOrigin::Autoplay, now);
            } else {
                self.autoplay_at = Some(at);
            }
        }
    }

    fn on_ended(&mut self, now: HostTime) {
        // The second side ending during the lockstep restart lands here too;
        // only a playing pair loops.
        if self.state != PairState::Playing {
            return;
        }
        self.next_check_at = None;
        self.transition(PairState::Ended, now);
        self.start(PlayOrigin::Loop, now);
    }

    fn on_play_settled(
        &mut self,
        side: Side,
        ticket: PlayTicket,
        result: Result<(), Rejection>,
        now: HostTime,
    ) {
        let Some(pending) = self.pending.as_mut().filter(|p| p.ticket == ticket) else {
            self.stale(side, ticket.generation, now);
            return;
        };
        // The first rejection decides the operation; a late answer from the
        // other side then finds no pending ticket and is dropped as stale.
        let rejection = match result {
            Err(r) => Some(MediaFault::new(side, FaultKind::PlaybackRejected(r))),
            Ok(()) => {
                pending.started[side_slot(side)] = true;
                if pending.started != [true; 2] {
                    return;
                }
                None
            }
        };
        let origin = pending.origin;
        self.pending = None;
        self.tracer.play_settled(&PlaySettledEvent {
            at: now,
            ticket,
            origin,
            rejection,
        });

        match rejection {
            None => {
                self.has_played = true;
                self.rejection = None;
                self.next_check_at = Some(now + self.policy.correction_interval);
                self.transition(PairState::Playing, now);
            }
            Some(fault) => {
                self.before.pause();
                self.after.pause();
                self.rejection = Some(fault);
                let to = if self.has_played {
                    PairState::Paused
                } else {
                    PairState::Ready
                };
                self.transition(to, now);
            }
        }
    }

    fn on_fault(&mut self, fault: MediaFault, now: HostTime) {
        self.cancel_pending(now);
        self.deferred = None;
        self.autoplay_at = None;
        self.next_check_at = None;
        self.fault = Some(fault);
        self.before.pause();
        self.after.pause();
        self.tracer.fault(&FaultEvent {
            at: now,
            generation: self.loads.generation(),
            fault,
        });
        self.transition(PairState::Error(fault.side), now);
    }

    /// An automatic start is scheduled or in flight.
    fn autoplay_pending(&self) -> bool {
        self.autoplay_at.is_some()
            || self
                .pending
                .is_some_and(|p| p.origin == PlayOrigin::Autoplay)
    }

    fn cancel_pending(&mut self, now: HostTime) {
        if let Some(pending) = self.pending.take() {
            self.tracer.play_cancelled(&PlayCancelledEvent {
                at: now,
                ticket: pending.ticket,
                origin: pending.origin,
            });
        }
    }

    fn faulted(&self, side: Side) -> ControlError {
        ControlError::Faulted(
            self.fault
                .unwrap_or(MediaFault::new(side, FaultKind::LoadFailure)),
        )
    }

    fn stale(&mut self, side: Side, received: Generation, now: HostTime) {
        self.tracer.stale(&StaleEvent {
            at: now,
            side,
            current: self.loads.generation(),
            received,
        });
    }

    fn transition(&mut self, to: PairState, now: HostTime) {
        if self.state == to {
            return;
        }
        let from = self.state;
        self.state = to;
        self.tracer.transition(&TransitionEvent {
            at: now,
            generation: self.loads.generation(),
            from,
            to,
        });
    }
}

const fn side_slot(side: Side) -> usize {
    match side {
        Side::Before => 0,
        Side::After => 1,
    }
}
