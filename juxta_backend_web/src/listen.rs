// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM listeners scoped to one load.

use alloc::boxed::Box;
use alloc::vec::Vec;

use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use web_sys::{Event, EventTarget};

type Listener = Closure<dyn FnMut(Event)>;

/// Event listeners attached to one target, removed together.
///
/// Media handles keep one set per load and [`clear`](Self::clear) it before
/// assigning a new source, so callbacks from a previous load cannot fire.
pub(crate) struct ListenerSet {
    target: EventTarget,
    entries: Vec<(&'static str, Listener)>,
}

impl ListenerSet {
    pub(crate) fn new(target: EventTarget) -> Self {
        Self {
            target,
            entries: Vec::new(),
        }
    }

    /// Attaches `callback` for events of type `kind`.
    pub(crate) fn add(&mut self, kind: &'static str, callback: impl FnMut(Event) + 'static) {
        let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut(Event)>);
        let _ = self
            .target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        self.entries.push((kind, closure));
    }

    /// Detaches and drops every listener.
    pub(crate) fn clear(&mut self) {
        for (kind, closure) in self.entries.drain(..) {
            let _ = self
                .target
                .remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        }
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        self.clear();
    }
}

impl core::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("kinds", &self.entries.iter().map(|(k, _)| *k).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
