// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Host times
//! are printed in milliseconds, media positions in seconds.

use std::io::Write;

use juxta_core::pair::PairState;
use juxta_core::time::HostTime;
use juxta_core::trace::{
    DriftAction, DriftEvent, FaultEvent, PlayCancelledEvent, PlayDispatchEvent, PlaySettledEvent,
    StaleEvent, TraceSink, TransitionEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn ms(t: HostTime) -> f64 {
    t.ticks() as f64 / 1000.0
}

fn state_name(state: PairState) -> String {
    match state {
        PairState::Error(side) => format!("Error({side})"),
        other => format!("{other:?}"),
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_transition(&mut self, e: &TransitionEvent) {
        let _ = writeln!(
            self.writer,
            "[state] {:.1}ms gen={} {} -> {}",
            ms(e.at),
            e.generation.0,
            state_name(e.from),
            state_name(e.to),
        );
    }

    fn on_play_dispatch(&mut self, e: &PlayDispatchEvent) {
        let _ = writeln!(
            self.writer,
            "[play] {:.1}ms #{} {:?} from {:.3}s",
            ms(e.at),
            e.ticket.serial,
            e.origin,
            e.position,
        );
    }

    fn on_play_settled(&mut self, e: &PlaySettledEvent) {
        let outcome = e
            .rejection
            .map_or_else(|| "ok".to_owned(), |f| format!("REJECTED {f}"));
        let _ = writeln!(
            self.writer,
            "[settled] {:.1}ms #{} {:?} {outcome}",
            ms(e.at),
            e.ticket.serial,
            e.origin,
        );
    }

    fn on_play_cancelled(&mut self, e: &PlayCancelledEvent) {
        let _ = writeln!(
            self.writer,
            "[cancel] {:.1}ms #{} {:?}",
            ms(e.at),
            e.ticket.serial,
            e.origin,
        );
    }

    fn on_drift(&mut self, e: &DriftEvent) {
        let action = match e.action {
            DriftAction::Corrected { target } => format!("-> {target:.3}s"),
            DriftAction::Suppressed => "suppressed".to_owned(),
        };
        let trigger = e.trigger.map_or("timer", |s| s.as_str());
        let _ = writeln!(
            self.writer,
            "[drift] {:.1}ms before={:.3}s after={:.3}s Δ={:.3}s ({trigger}) {action}",
            ms(e.at),
            e.before,
            e.after,
            (e.before - e.after).abs(),
        );
    }

    fn on_fault(&mut self, e: &FaultEvent) {
        let _ = writeln!(
            self.writer,
            "[fault] {:.1}ms gen={} {}",
            ms(e.at),
            e.generation.0,
            e.fault,
        );
    }

    fn on_stale(&mut self, e: &StaleEvent) {
        let _ = writeln!(
            self.writer,
            "[stale] {:.1}ms {} gen={} (current {})",
            ms(e.at),
            e.side,
            e.received.0,
            e.current.0,
        );
    }
}

#[cfg(test)]
mod tests {
    use juxta_core::error::{FaultKind, MediaFault};
    use juxta_core::media::{Generation, PlayTicket, Side};
    use juxta_core::pair::PlayOrigin;

    use super::*;

    #[test]
    fn pretty_print_transition() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_transition(&TransitionEvent {
            at: HostTime(1_500),
            generation: Generation(3),
            from: PairState::Loading,
            to: PairState::Error(Side::After),
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[state] 1.5ms"), "got: {output}");
        assert!(output.contains("Loading -> Error(after)"), "got: {output}");
    }

    #[test]
    fn pretty_print_drift() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_drift(&DriftEvent {
            at: HostTime(3_000_000),
            before: 5.6,
            after: 5.0,
            trigger: None,
            action: DriftAction::Corrected { target: 5.6 },
        });
        sink.on_fault(&FaultEvent {
            at: HostTime(3_000_000),
            generation: Generation(1),
            fault: MediaFault::new(Side::Before, FaultKind::LoadFailure),
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("(timer) -> 5.600s"), "got: {output}");
        assert!(output.contains("[fault] 3000.0ms gen=1 before media failed to load"), "got: {output}");
    }

    #[test]
    fn pretty_print_cancelled_play() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_play_cancelled(&PlayCancelledEvent {
            at: HostTime(2_000),
            ticket: PlayTicket {
                generation: Generation(1),
                serial: 4,
            },
            origin: PlayOrigin::Loop,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output, "[cancel] 2.0ms #4 Loop\n");
    }
}
