// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Positions are stored as raw `f64` bits, so decoded values compare equal
//! to what the controller saw.

use juxta_core::error::{FaultKind, MediaFault, Rejection};
use juxta_core::media::{Generation, PlayTicket, Side};
use juxta_core::pair::{PairState, PlayOrigin};
use juxta_core::time::HostTime;
use juxta_core::trace::{
    DriftAction, DriftEvent, FaultEvent, PlayCancelledEvent, PlayDispatchEvent, PlaySettledEvent,
    StaleEvent, TraceSink, TransitionEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_TRANSITION: u8 = 1;
const TAG_PLAY_DISPATCH: u8 = 2;
const TAG_PLAY_SETTLED: u8 = 3;
const TAG_DRIFT: u8 = 4;
const TAG_FAULT: u8 = 5;
const TAG_STALE: u8 = 6;
const TAG_PLAY_CANCELLED: u8 = 7;

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
        self.write_u64(v.to_bits());
    }

    fn write_time(&mut self, t: HostTime) {
        self.write_u64(t.ticks());
    }

    fn write_ticket(&mut self, t: PlayTicket) {
        self.write_u32(t.generation.0);
        self.write_u32(t.serial);
    }

    fn write_side(&mut self, side: Side) {
        self.write_u8(match side {
            Side::Before => 0,
            Side::After => 1,
        });
    }

    fn write_option_side(&mut self, side: Option<Side>) {
        self.write_u8(match side {
            None => 0,
            Some(Side::Before) => 1,
            Some(Side::After) => 2,
        });
    }

    fn write_state(&mut self, state: PairState) {
        self.write_u8(match state {
            PairState::Idle => 0,
            PairState::Loading => 1,
            PairState::Ready => 2,
            PairState::Playing => 3,
            PairState::Paused => 4,
            PairState::Ended => 5,
            PairState::Error(Side::Before) => 6,
            PairState::Error(Side::After) => 7,
        });
    }

    fn write_origin(&mut self, origin: PlayOrigin) {
        self.write_u8(match origin {
            PlayOrigin::User => 0,
            PlayOrigin::Autoplay => 1,
            PlayOrigin::Restart => 2,
            PlayOrigin::Loop => 3,
        });
    }

    fn write_fault(&mut self, fault: MediaFault) {
        self.write_side(fault.side);
        self.write_u8(match fault.kind {
            FaultKind::LoadFailure => 0,
            FaultKind::PlaybackRejected(Rejection::Blocked) => 1,
            FaultKind::PlaybackRejected(Rejection::Failed) => 2,
        });
    }

    fn write_option_fault(&mut self, fault: Option<MediaFault>) {
        match fault {
            Some(fault) => {
                self.write_u8(1);
                self.write_fault(fault);
            }
            None => {
                self.write_u8(0);
                self.write_u8(0);
                self.write_u8(0);
            }
        }
    }
}

impl TraceSink for RecorderSink {
    fn on_transition(&mut self, e: &TransitionEvent) {
        self.write_u8(TAG_TRANSITION);
        self.write_time(e.at);
        self.write_u32(e.generation.0);
        self.write_state(e.from);
        self.write_state(e.to);
    }

    fn on_play_dispatch(&mut self, e: &PlayDispatchEvent) {
        self.write_u8(TAG_PLAY_DISPATCH);
        self.write_time(e.at);
        self.write_ticket(e.ticket);
        self.write_origin(e.origin);
        self.write_f64(e.position);
    }

    fn on_play_settled(&mut self, e: &PlaySettledEvent) {
        self.write_u8(TAG_PLAY_SETTLED);
        self.write_time(e.at);
        self.write_ticket(e.ticket);
        self.write_origin(e.origin);
        self.write_option_fault(e.rejection);
    }

    fn on_play_cancelled(&mut self, e: &PlayCancelledEvent) {
        self.write_u8(TAG_PLAY_CANCELLED);
        self.write_time(e.at);
        self.write_ticket(e.ticket);
        self.write_origin(e.origin);
    }

    fn on_drift(&mut self, e: &DriftEvent) {
        self.write_u8(TAG_DRIFT);
        self.write_time(e.at);
        self.write_f64(e.before);
        self.write_f64(e.after);
        self.write_option_side(e.trigger);
        match e.action {
            DriftAction::Corrected { target } => {
                self.write_u8(1);
                self.write_f64(target);
            }
            DriftAction::Suppressed => {
                self.write_u8(0);
                self.write_f64(0.0);
            }
        }
    }

    fn on_fault(&mut self, e: &FaultEvent) {
        self.write_u8(TAG_FAULT);
        self.write_time(e.at);
        self.write_u32(e.generation.0);
        self.write_fault(e.fault);
    }

    fn on_stale(&mut self, e: &StaleEvent) {
        self.write_u8(TAG_STALE);
        self.write_time(e.at);
        self.write_side(e.side);
        self.write_u32(e.current.0);
        self.write_u32(e.received.0);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`TransitionEvent`].
    Transition(TransitionEvent),
    /// A [`PlayDispatchEvent`].
    PlayDispatch(PlayDispatchEvent),
    /// A [`PlaySettledEvent`].
    PlaySettled(PlaySettledEvent),
    /// A [`PlayCancelledEvent`].
    PlayCancelled(PlayCancelledEvent),
    /// A [`DriftEvent`].
    Drift(DriftEvent),
    /// A [`FaultEvent`].
    Fault(FaultEvent),
    /// A [`StaleEvent`].
    Stale(StaleEvent),
}

impl RecordedEvent {
    /// Host time the event was emitted at.
    #[must_use]
    pub fn at(&self) -> HostTime {
        match self {
            Self::Transition(e) => e.at,
            Self::PlayDispatch(e) => e.at,
            Self::PlaySettled(e) => e.at,
            Self::PlayCancelled(e) => e.at,
            Self::Drift(e) => e.at,
            Self::Fault(e) => e.at,
            Self::Stale(e) => e.at,
        }
    }
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
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_time(&mut self) -> Option<HostTime> {
        self.read_u64().map(HostTime)
    }

    fn read_generation(&mut self) -> Option<Generation> {
        self.read_u32().map(Generation)
    }

    fn read_ticket(&mut self) -> Option<PlayTicket> {
        Some(PlayTicket {
            generation: self.read_generation()?,
            serial: self.read_u32()?,
        })
    }

    fn read_side(&mut self) -> Option<Side> {
        Some(match self.read_u8()? {
            0 => Side::Before,
            _ => Side::After,
        })
    }

    fn read_option_side(&mut self) -> Option<Option<Side>> {
        Some(match self.read_u8()? {
            0 => None,
            1 => Some(Side::Before),
            _ => Some(Side::After),
        })
    }

    fn read_state(&mut self) -> Option<PairState> {
        Some(match self.read_u8()? {
            0 => PairState::Idle,
            1 => PairState::Loading,
            2 => PairState::Ready,
            3 => PairState::Playing,
            4 => PairState::Paused,
            5 => PairState::Ended,
            6 => PairState::Error(Side::Before),
            7 => PairState::Error(Side::After),
            _ => return None,
        })
    }

    fn read_origin(&mut self) -> Option<PlayOrigin> {
        Some(match self.read_u8()? {
            0 => PlayOrigin::User,
            1 => PlayOrigin::Autoplay,
            2 => PlayOrigin::Restart,
            _ => PlayOrigin::Loop,
        })
    }

    fn read_fault(&mut self) -> Option<MediaFault> {
        let side = self.read_side()?;
        let kind = match self.read_u8()? {
            0 => FaultKind::LoadFailure,
            1 => FaultKind::PlaybackRejected(Rejection::Blocked),
            _ => FaultKind::PlaybackRejected(Rejection::Failed),
        };
        Some(MediaFault::new(side, kind))
    }

    fn read_option_fault(&mut self) -> Option<Option<MediaFault>> {
        let present = self.read_u8()?;
        let fault = self.read_fault()?;
        Some(if present != 0 { Some(fault) } else { None })
    }

    fn decode_transition(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Transition(TransitionEvent {
            at: self.read_time()?,
            generation: self.read_generation()?,
            from: self.read_state()?,
            to: self.read_state()?,
        }))
    }

    fn decode_play_dispatch(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PlayDispatch(PlayDispatchEvent {
            at: self.read_time()?,
            ticket: self.read_ticket()?,
            origin: self.read_origin()?,
            position: self.read_f64()?,
        }))
    }

    fn decode_play_settled(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PlaySettled(PlaySettledEvent {
            at: self.read_time()?,
            ticket: self.read_ticket()?,
            origin: self.read_origin()?,
            rejection: self.read_option_fault()?,
        }))
    }

    fn decode_play_cancelled(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PlayCancelled(PlayCancelledEvent {
            at: self.read_time()?,
            ticket: self.read_ticket()?,
            origin: self.read_origin()?,
        }))
    }

    fn decode_drift(&mut self) -> Option<RecordedEvent> {
        let at = self.read_time()?;
        let before = self.read_f64()?;
        let after = self.read_f64()?;
        let trigger = self.read_option_side()?;
        let corrected = self.read_u8()? != 0;
        let target = self.read_f64()?;
        let action = if corrected {
            DriftAction::Corrected { target }
        } else {
            DriftAction::Suppressed
        };
        Some(RecordedEvent::Drift(DriftEvent {
            at,
            before,
            after,
            trigger,
            action,
        }))
    }

    fn decode_fault(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Fault(FaultEvent {
            at: self.read_time()?,
            generation: self.read_generation()?,
            fault: self.read_fault()?,
        }))
    }

    fn decode_stale(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Stale(StaleEvent {
            at: self.read_time()?,
            side: self.read_side()?,
            current: self.read_generation()?,
            received: self.read_generation()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_TRANSITION => self.decode_transition(),
            TAG_PLAY_DISPATCH => self.decode_play_dispatch(),
            TAG_PLAY_SETTLED => self.decode_play_settled(),
            TAG_DRIFT => self.decode_drift(),
            TAG_FAULT => self.decode_fault(),
            TAG_STALE => self.decode_stale(),
            TAG_PLAY_CANCELLED => self.decode_play_cancelled(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use juxta_core::media::{MediaElement, MediaEvent, MediaEventKind, MediaSource};
    use juxta_core::pair::PairController;
    use juxta_core::policy::SyncPolicy;
    use juxta_core::selection::{MediaKind, Selection};

    use super::*;

    /// Minimal element that only tracks its position.
    #[derive(Debug, Default)]
    struct Stub {
        position: f64,
    }

    impl MediaSource for Stub {
        fn load(&mut self, _src: &str, _generation: Generation) {
            self.position = 0.0;
        }
    }

    impl MediaElement for Stub {
        fn position(&self) -> f64 {
            self.position
        }

        fn seek(&mut self, seconds: f64) {
            self.position = seconds;
        }

        fn play(&mut self, _ticket: PlayTicket) {}

        fn pause(&mut self) {}

        fn set_muted(&mut self, _muted: bool) {}
    }

    fn at(ms: u64) -> HostTime {
        HostTime::from_millis(ms)
    }

    #[test]
    fn records_a_controller_session() {
        let recorder = Rc::new(RefCell::new(RecorderSink::new()));
        let mut pair = PairController::with_sink(
            SyncPolicy::CANONICAL.with_autoplay(false),
            Stub::default(),
            Stub::default(),
            Box::new(Rc::clone(&recorder)),
        );

        let reload = Selection::new(MediaKind::Video).set_asset_index("01");
        let stale = pair.load(&reload.paths, at(0));
        let g = pair.load(&reload.paths, at(1));
        pair.handle(MediaEvent::new(Side::Before, stale, MediaEventKind::Ready), at(2));
        for side in Side::BOTH {
            pair.handle(MediaEvent::new(side, g, MediaEventKind::Ready), at(10));
        }
        pair.play(at(20)).unwrap();
        let ticket = PlayTicket {
            generation: g,
            serial: 1,
        };
        for side in Side::BOTH {
            pair.handle(MediaEvent::play_settled(side, ticket, Ok(())), at(30));
        }
        pair.element_mut(Side::After).position = 1.0;
        pair.check_drift(at(40), None);

        let events: Vec<_> = decode(recorder.borrow().as_bytes()).collect();
        let kinds: Vec<&str> = events
            .iter()
            .map(|e| match e {
                RecordedEvent::Transition(_) => "transition",
                RecordedEvent::PlayDispatch(_) => "dispatch",
                RecordedEvent::PlaySettled(_) => "settled",
                RecordedEvent::PlayCancelled(_) => "cancelled",
                RecordedEvent::Drift(_) => "drift",
                RecordedEvent::Fault(_) => "fault",
                RecordedEvent::Stale(_) => "stale",
            })
            .collect();
        assert_eq!(
            kinds,
            [
                "transition", // Idle -> Loading
                "stale",
                "transition", // Loading -> Ready
                "dispatch",
                "settled",
                "transition", // Ready -> Playing
                "drift",
            ]
        );

        match &events[1] {
            RecordedEvent::Stale(e) => {
                assert_eq!(e.current, g);
                assert_eq!(e.received, stale);
            }
            other => panic!("expected Stale, got {other:?}"),
        }
        match &events[6] {
            RecordedEvent::Drift(e) => {
                assert_eq!(e.before, 0.0);
                assert_eq!(e.after, 1.0);
                assert_eq!(e.action, DriftAction::Corrected { target: 1.0 });
            }
            other => panic!("expected Drift, got {other:?}"),
        }
    }

    #[test]
    fn pause_records_the_cancelled_play() {
        let recorder = Rc::new(RefCell::new(RecorderSink::new()));
        let mut pair = PairController::with_sink(
            SyncPolicy::CANONICAL.with_autoplay(false),
            Stub::default(),
            Stub::default(),
            Box::new(Rc::clone(&recorder)),
        );
        let reload = Selection::new(MediaKind::Video).set_asset_index("02");
        let g = pair.load(&reload.paths, at(0));
        for side in Side::BOTH {
            pair.handle(MediaEvent::new(side, g, MediaEventKind::Ready), at(10));
        }
        pair.play(at(20)).unwrap();
        pair.pause(at(25));
        pair.restart(at(30)).unwrap();
        // Superseded by a new load before either side answered.
        pair.load(&reload.paths, at(40));

        let cancelled: Vec<_> = decode(recorder.borrow().as_bytes())
            .filter_map(|e| match e {
                RecordedEvent::PlayCancelled(c) => Some((c.at, c.ticket.serial, c.origin)),
                _ => None,
            })
            .collect();
        assert_eq!(
            cancelled,
            [
                (at(25), 1, PlayOrigin::User),
                (at(40), 2, PlayOrigin::Restart),
            ]
        );
    }

    #[test]
    fn settled_rejection_survives_recording() {
        let mut rec = RecorderSink::new();
        let fault = MediaFault::new(Side::After, FaultKind::PlaybackRejected(Rejection::Blocked));
        rec.on_play_settled(&PlaySettledEvent {
            at: HostTime(5),
            ticket: PlayTicket {
                generation: Generation(2),
                serial: 9,
            },
            origin: PlayOrigin::Autoplay,
            rejection: Some(fault),
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::PlaySettled(e) => {
                assert_eq!(e.ticket.serial, 9);
                assert_eq!(e.origin, PlayOrigin::Autoplay);
                assert_eq!(e.rejection, Some(fault));
            }
            other => panic!("expected PlaySettled, got {other:?}"),
        }
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_fault(&FaultEvent {
            at: HostTime(1),
            generation: Generation(1),
            fault: MediaFault::new(Side::Before, FaultKind::LoadFailure),
        });
        let bytes = rec.into_bytes();
        assert_eq!(decode(&bytes).count(), 1);
        assert_eq!(decode(&bytes[..bytes.len() - 1]).count(), 0);
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty(), "no bytes, no events");
    }
}
