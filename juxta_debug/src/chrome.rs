// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Controller states become duration slices on thread 0 and paired plays
//! become slices on thread 1, from dispatch to settlement or cancellation.
//! Drift is emitted as a counter track.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use juxta_core::pair::PairState;
use juxta_core::time::HostTime;
use juxta_core::trace::DriftAction;

use crate::recorder::{RecordedEvent, decode};

const TID_STATE: u32 = 0;
const TID_PLAY: u32 = 1;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Host times are already microseconds and are written unchanged.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Transition(e) => {
                if e.from != PairState::Idle {
                    events.push(json!({
                        "ph": "E",
                        "name": state_name(e.from),
                        "cat": "State",
                        "ts": us(e.at),
                        "pid": 0,
                        "tid": TID_STATE,
                    }));
                }
                events.push(json!({
                    "ph": "B",
                    "name": state_name(e.to),
                    "cat": "State",
                    "ts": us(e.at),
                    "pid": 0,
                    "tid": TID_STATE,
                    "args": {
                        "generation": e.generation.0,
                    }
                }));
            }
            RecordedEvent::PlayDispatch(e) => {
                events.push(json!({
                    "ph": "B",
                    "name": format!("Play {:?}", e.origin),
                    "cat": "Play",
                    "ts": us(e.at),
                    "pid": 0,
                    "tid": TID_PLAY,
                    "args": {
                        "serial": e.ticket.serial,
                        "generation": e.ticket.generation.0,
                        "position": e.position,
                    }
                }));
            }
            RecordedEvent::PlaySettled(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": format!("Play {:?}", e.origin),
                    "cat": "Play",
                    "ts": us(e.at),
                    "pid": 0,
                    "tid": TID_PLAY,
                    "args": {
                        "serial": e.ticket.serial,
                        "rejection": e.rejection.map(|f| f.to_string()),
                    }
                }));
            }
            RecordedEvent::PlayCancelled(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": format!("Play {:?}", e.origin),
                    "cat": "Play",
                    "ts": us(e.at),
                    "pid": 0,
                    "tid": TID_PLAY,
                    "args": {
                        "serial": e.ticket.serial,
                        "cancelled": true,
                    }
                }));
            }
            RecordedEvent::Drift(e) => {
                events.push(json!({
                    "ph": "C",
                    "name": "drift",
                    "cat": "Sync",
                    "ts": us(e.at),
                    "pid": 0,
                    "args": {
                        "seconds": (e.before - e.after).abs(),
                    }
                }));
                let (name, target) = match e.action {
                    DriftAction::Corrected { target } => ("DriftCorrected", Some(target)),
                    DriftAction::Suppressed => ("DriftSuppressed", None),
                };
                events.push(json!({
                    "ph": "i",
                    "name": name,
                    "cat": "Sync",
                    "ts": us(e.at),
                    "pid": 0,
                    "tid": TID_STATE,
                    "s": "t",
                    "args": {
                        "before": e.before,
                        "after": e.after,
                        "target": target,
                        "trigger": e.trigger.map(|s| s.as_str()),
                    }
                }));
            }
            RecordedEvent::Fault(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Fault",
                    "cat": "Media",
                    "ts": us(e.at),
                    "pid": 0,
                    "tid": TID_STATE,
                    "s": "g",
                    "args": {
                        "generation": e.generation.0,
                        "fault": e.fault.to_string(),
                    }
                }));
            }
            RecordedEvent::Stale(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Stale",
                    "cat": "Media",
                    "ts": us(e.at),
                    "pid": 0,
                    "tid": TID_STATE,
                    "s": "t",
                    "args": {
                        "side": e.side.as_str(),
                        "current": e.current.0,
                        "received": e.received.0,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn us(t: HostTime) -> u64 {
    t.ticks()
}

fn state_name(state: PairState) -> String {
    match state {
        PairState::Error(side) => format!("Error({side})"),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use juxta_core::media::{Generation, PlayTicket};
    use juxta_core::pair::PlayOrigin;
    use juxta_core::trace::{
        DriftEvent, PlayCancelledEvent, PlayDispatchEvent, PlaySettledEvent, TraceSink,
        TransitionEvent,
    };

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        let ticket = PlayTicket {
            generation: Generation(1),
            serial: 1,
        };
        rec.on_transition(&TransitionEvent {
            at: HostTime(1_000),
            generation: Generation(1),
            from: PairState::Idle,
            to: PairState::Loading,
        });
        rec.on_transition(&TransitionEvent {
            at: HostTime(2_000),
            generation: Generation(1),
            from: PairState::Loading,
            to: PairState::Ready,
        });
        rec.on_play_dispatch(&PlayDispatchEvent {
            at: HostTime(3_000),
            ticket,
            origin: PlayOrigin::User,
            position: 0.0,
        });
        rec.on_play_settled(&PlaySettledEvent {
            at: HostTime(3_500),
            ticket,
            origin: PlayOrigin::User,
            rejection: None,
        });
        rec.on_drift(&DriftEvent {
            at: HostTime(4_000),
            before: 1.0,
            after: 0.25,
            trigger: None,
            action: DriftAction::Suppressed,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        let phases: Vec<&str> = parsed.iter().map(|e| e["ph"].as_str().unwrap()).collect();
        assert_eq!(phases, ["B", "E", "B", "B", "E", "C", "i"]);

        // Idle opens no slice; Loading closes when Ready opens.
        assert_eq!(parsed[0]["name"], "Loading");
        assert_eq!(parsed[1]["name"], "Loading");
        assert_eq!(parsed[2]["name"], "Ready");
        assert_eq!(parsed[3]["name"], "Play User");
        assert_eq!(parsed[3]["tid"], TID_PLAY);
        assert_eq!(parsed[5]["args"]["seconds"], 0.75);
        assert_eq!(parsed[6]["name"], "DriftSuppressed");
    }

    #[test]
    fn cancelled_play_closes_its_slice() {
        let mut rec = RecorderSink::new();
        let first = PlayTicket {
            generation: Generation(1),
            serial: 1,
        };
        let second = PlayTicket {
            generation: Generation(1),
            serial: 2,
        };
        rec.on_play_dispatch(&PlayDispatchEvent {
            at: HostTime(1_000),
            ticket: first,
            origin: PlayOrigin::User,
            position: 2.0,
        });
        rec.on_play_cancelled(&PlayCancelledEvent {
            at: HostTime(1_200),
            ticket: first,
            origin: PlayOrigin::User,
        });
        rec.on_play_dispatch(&PlayDispatchEvent {
            at: HostTime(1_200),
            ticket: second,
            origin: PlayOrigin::Restart,
            position: 0.0,
        });
        rec.on_play_settled(&PlaySettledEvent {
            at: HostTime(1_500),
            ticket: second,
            origin: PlayOrigin::Restart,
            rejection: None,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        let play: Vec<(&str, &str)> = parsed
            .iter()
            .filter(|e| e["tid"] == TID_PLAY)
            .map(|e| (e["ph"].as_str().unwrap(), e["name"].as_str().unwrap()))
            .collect();
        assert_eq!(
            play,
            [
                ("B", "Play User"),
                ("E", "Play User"),
                ("B", "Play Restart"),
                ("E", "Play Restart"),
            ]
        );
        assert_eq!(parsed[1]["args"]["cancelled"], true);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty(), "no events recorded");
    }
}
