// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics for the pair controller.
//!
//! [`TraceSink`] receives one call per controller event: state transitions,
//! paired play dispatch, completion and cancellation, drift corrections,
//! faults and dropped stale notifications. All methods default to no-ops, so implementing only
//! the events you care about is fine.
//!
//! [`Tracer`] owns an optional boxed sink. When the `trace` feature is
//! **off**, every `Tracer` method compiles to nothing and installed sinks are
//! dropped. When **on**, each method performs a single `Option` branch before
//! dispatching.
//!
//! A sink shared as `Rc<RefCell<_>>` is itself a sink, so a caller can keep a
//! handle to a recorder it installed on a controller.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;

use crate::error::MediaFault;
use crate::media::{Generation, PlayTicket, Side};
use crate::pair::{PairState, PlayOrigin};
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the controller changes state.
#[derive(Clone, Copy, Debug)]
pub struct TransitionEvent {
    /// Host time of the transition.
    pub at: HostTime,
    /// Load cycle in effect after the transition.
    pub generation: Generation,
    /// Previous state.
    pub from: PairState,
    /// New state.
    pub to: PairState,
}

/// Emitted when a paired play is dispatched to both sides.
#[derive(Clone, Copy, Debug)]
pub struct PlayDispatchEvent {
    /// Host time of dispatch.
    pub at: HostTime,
    /// Ticket shared by both sides.
    pub ticket: PlayTicket,
    /// What requested playback.
    pub origin: PlayOrigin,
    /// Position both sides start from, in seconds.
    pub position: f64,
}

/// Emitted when a paired play completes: on the first rejection, or once
/// both sides have started.
#[derive(Clone, Copy, Debug)]
pub struct PlaySettledEvent {
    /// Host time the outcome was decided.
    pub at: HostTime,
    /// Ticket of the operation.
    pub ticket: PlayTicket,
    /// What requested playback.
    pub origin: PlayOrigin,
    /// First rejection, if either side refused.
    pub rejection: Option<MediaFault>,
}

/// Emitted when a paired play in flight is abandoned by a pause, a new load,
/// a fault or a superseding play.
///
/// Every [`PlayDispatchEvent`] is followed by exactly one
/// [`PlaySettledEvent`] or one `PlayCancelledEvent` for its ticket.
#[derive(Clone, Copy, Debug)]
pub struct PlayCancelledEvent {
    /// Host time of the cancellation.
    pub at: HostTime,
    /// Ticket of the abandoned operation.
    pub ticket: PlayTicket,
    /// What requested playback.
    pub origin: PlayOrigin,
}

/// What a drift check did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DriftAction {
    /// Both sides were moved to `target` seconds.
    Corrected {
        /// Position both sides snapped to.
        target: f64,
    },
    /// Drift exceeded the tolerance but a correction was applied too
    /// recently.
    Suppressed,
}

/// Emitted when a drift check finds the pair out of tolerance.
#[derive(Clone, Copy, Debug)]
pub struct DriftEvent {
    /// Host time of the check.
    pub at: HostTime,
    /// Position of the before side, in seconds.
    pub before: f64,
    /// Position of the after side, in seconds.
    pub after: f64,
    /// Side whose time update triggered the check, if any.
    pub trigger: Option<Side>,
    /// Outcome.
    pub action: DriftAction,
}

/// Emitted when a side reports a failure.
#[derive(Clone, Copy, Debug)]
pub struct FaultEvent {
    /// Host time the failure was handled.
    pub at: HostTime,
    /// Load cycle the failure belongs to.
    pub generation: Generation,
    /// The failure.
    pub fault: MediaFault,
}

/// Emitted when a notification from an old load cycle or a cancelled play is
/// dropped.
#[derive(Clone, Copy, Debug)]
pub struct StaleEvent {
    /// Host time the notification was dropped.
    pub at: HostTime,
    /// Side that reported.
    pub side: Side,
    /// Current load cycle.
    pub current: Generation,
    /// Load cycle carried by the notification.
    pub received: Generation,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives controller events.
///
/// All methods have default no-op implementations.
pub trait TraceSink {
    /// Called on every state change.
    fn on_transition(&mut self, e: &TransitionEvent) {
        _ = e;
    }

    /// Called when a paired play is dispatched.
    fn on_play_dispatch(&mut self, e: &PlayDispatchEvent) {
        _ = e;
    }

    /// Called when a paired play completes, successfully or not.
    fn on_play_settled(&mut self, e: &PlaySettledEvent) {
        _ = e;
    }

    /// Called when a paired play is abandoned before completing.
    fn on_play_cancelled(&mut self, e: &PlayCancelledEvent) {
        _ = e;
    }

    /// Called when drift exceeds the tolerance.
    fn on_drift(&mut self, e: &DriftEvent) {
        _ = e;
    }

    /// Called when a side fails to load or play.
    fn on_fault(&mut self, e: &FaultEvent) {
        _ = e;
    }

    /// Called when a stale notification is dropped.
    fn on_stale(&mut self, e: &StaleEvent) {
        _ = e;
    }
}

impl<T: TraceSink + ?Sized> TraceSink for Rc<RefCell<T>> {
    fn on_transition(&mut self, e: &TransitionEvent) {
        self.borrow_mut().on_transition(e);
    }

    fn on_play_dispatch(&mut self, e: &PlayDispatchEvent) {
        self.borrow_mut().on_play_dispatch(e);
    }

    fn on_play_settled(&mut self, e: &PlaySettledEvent) {
        self.borrow_mut().on_play_settled(e);
    }

    fn on_play_cancelled(&mut self, e: &PlayCancelledEvent) {
        self.borrow_mut().on_play_cancelled(e);
    }

    fn on_drift(&mut self, e: &DriftEvent) {
        self.borrow_mut().on_drift(e);
    }

    fn on_fault(&mut self, e: &FaultEvent) {
        self.borrow_mut().on_fault(e);
    }

    fn on_stale(&mut self, e: &StaleEvent) {
        self.borrow_mut().on_stale(e);
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

/// Owner of an optional boxed [`TraceSink`].
#[derive(Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! dispatch {
    ($self:ident, $method:ident, $e:ident) => {{
        #[cfg(feature = "trace")]
        if let Some(s) = &mut $self.sink {
            s.$method($e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = (&$self, $e);
        }
    }};
}

impl Tracer {
    /// Creates a tracer that dispatches to `sink`.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Emits a [`TransitionEvent`].
    #[inline]
    pub fn transition(&mut self, e: &TransitionEvent) {
        dispatch!(self, on_transition, e);
    }

    /// Emits a [`PlayDispatchEvent`].
    #[inline]
    pub fn play_dispatch(&mut self, e: &PlayDispatchEvent) {
        dispatch!(self, on_play_dispatch, e);
    }

    /// Emits a [`PlaySettledEvent`].
    #[inline]
    pub fn play_settled(&mut self, e: &PlaySettledEvent) {
        dispatch!(self, on_play_settled, e);
    }

    /// Emits a [`PlayCancelledEvent`].
    #[inline]
    pub fn play_cancelled(&mut self, e: &PlayCancelledEvent) {
        dispatch!(self, on_play_cancelled, e);
    }

    /// Emits a [`DriftEvent`].
    #[inline]
    pub fn drift(&mut self, e: &DriftEvent) {
        dispatch!(self, on_drift, e);
    }

    /// Emits a [`FaultEvent`].
    #[inline]
    pub fn fault(&mut self, e: &FaultEvent) {
        dispatch!(self, on_fault, e);
    }

    /// Emits a [`StaleEvent`].
    #[inline]
    pub fn stale(&mut self, e: &StaleEvent) {
        dispatch!(self, on_stale, e);
    }
}

#[cfg(all(test, feature = "trace"))]
mod tests {
    use core::cell::Cell;

    use super::*;

    struct Counting(Rc<Cell<u32>>);

    impl TraceSink for Counting {
        fn on_fault(&mut self, _e: &FaultEvent) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn tracer_dispatches_to_sink() {
        let count = Rc::new(Cell::new(0));
        let mut tracer = Tracer::new(Box::new(Counting(Rc::clone(&count))));
        let e = FaultEvent {
            at: HostTime(0),
            generation: Generation(1),
            fault: MediaFault::new(Side::After, crate::error::FaultKind::LoadFailure),
        };
        tracer.fault(&e);
        tracer.fault(&e);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn none_tracer_is_silent() {
        let mut tracer = Tracer::none();
        tracer.stale(&StaleEvent {
            at: HostTime(0),
            side: Side::Before,
            current: Generation(2),
            received: Generation(1),
        });
    }
}
