// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controller trace events on the browser console.

use alloc::format;

use juxta_core::trace::{
    DriftAction, DriftEvent, FaultEvent, PlayCancelledEvent, PlayDispatchEvent, PlaySettledEvent,
    StaleEvent, TraceSink, TransitionEvent,
};
use wasm_bindgen::JsValue;
use web_sys::console;

/// A [`TraceSink`] that logs through `console.log`, `console.warn` and
/// `console.error`.
///
/// Faults and rejected plays are errors or warnings; everything else is
/// logged. Stale notifications go to `console.debug`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink;

fn log(text: &str) {
    console::log_1(&JsValue::from_str(text));
}

impl TraceSink for ConsoleSink {
    fn on_transition(&mut self, e: &TransitionEvent) {
        log(&format!("[juxta] {:?} -> {:?} (gen {})", e.from, e.to, e.generation.0));
    }

    fn on_play_dispatch(&mut self, e: &PlayDispatchEvent) {
        log(&format!(
            "[juxta] play #{} {:?} from {:.3}s",
            e.ticket.serial, e.origin, e.position
        ));
    }

    fn on_play_settled(&mut self, e: &PlaySettledEvent) {
        match e.rejection {
            None => log(&format!("[juxta] play #{} started", e.ticket.serial)),
            Some(fault) if fault.kind.is_blocked() => console::warn_1(&JsValue::from_str(
                &format!("[juxta] play #{} {fault}", e.ticket.serial),
            )),
            Some(fault) => console::error_1(&JsValue::from_str(&format!(
                "[juxta] play #{} {fault}",
                e.ticket.serial
            ))),
        }
    }

    fn on_play_cancelled(&mut self, e: &PlayCancelledEvent) {
        log(&format!("[juxta] play #{} cancelled", e.ticket.serial));
    }

    fn on_drift(&mut self, e: &DriftEvent) {
        let drift = (e.before - e.after).abs();
        match e.action {
            DriftAction::Corrected { target } => log(&format!(
                "[juxta] drift {drift:.3}s, both -> {target:.3}s"
            )),
            DriftAction::Suppressed => log(&format!(
                "[juxta] drift {drift:.3}s, correction rate-limited"
            )),
        }
    }

    fn on_fault(&mut self, e: &FaultEvent) {
        console::error_1(&JsValue::from_str(&format!("[juxta] {}", e.fault)));
    }

    fn on_stale(&mut self, e: &StaleEvent) {
        console::debug_1(&JsValue::from_str(&format!(
            "[juxta] dropped {} notification from gen {} (current {})",
            e.side, e.received.0, e.current.0
        )));
    }
}
