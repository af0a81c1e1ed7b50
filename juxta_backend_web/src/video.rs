// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `<video>` element behind [`MediaElement`].
//!
//! Each load installs fresh `loadeddata`, `error` and `ended` listeners (and
//! `timeupdate` when requested) tagged with the load's [`Generation`]; the
//! previous load's listeners are removed first. `play()` promises are awaited
//! on the microtask queue and reported as
//! [`MediaEventKind::PlaySettled`].

use alloc::string::String;

use juxta_core::error::FaultKind;
use juxta_core::media::{
    Generation, MediaElement, MediaEvent, MediaEventKind, MediaSource, PlayTicket, Side,
};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlVideoElement;

use crate::listen::ListenerSet;
use crate::queue::EventQueue;
use crate::rejection_for;

/// One side of a video pair.
#[derive(Debug)]
pub struct VideoHandle {
    video: HtmlVideoElement,
    side: Side,
    queue: EventQueue,
    listeners: ListenerSet,
    time_updates: bool,
}

impl VideoHandle {
    /// Wraps `video` as the `side` element, posting notifications to
    /// `queue`.
    ///
    /// Native looping and controls are turned off: the pair controller loops
    /// both sides together.
    pub fn new(video: HtmlVideoElement, side: Side, queue: EventQueue) -> Self {
        video.set_loop(false);
        video.set_controls(false);
        video.set_autoplay(false);
        video.set_preload("auto");
        let _ = video.set_attribute("playsinline", "");
        let listeners = ListenerSet::new(video.clone().into());
        Self {
            video,
            side,
            queue,
            listeners,
            time_updates: false,
        }
    }

    /// Also report `timeupdate` notifications, for policies that correct
    /// drift toward the side that triggered the check.
    #[must_use]
    pub fn with_time_updates(mut self, enabled: bool) -> Self {
        self.time_updates = enabled;
        self
    }

    /// The underlying element.
    #[must_use]
    pub fn element(&self) -> &HtmlVideoElement {
        &self.video
    }

    fn listen(&mut self, kind: &'static str, generation: Generation, event: MediaEventKind) {
        let queue = self.queue.clone();
        let side = self.side;
        self.listeners.add(kind, move |_| {
            queue.push(MediaEvent::new(side, generation, event));
        });
    }
}

impl MediaSource for VideoHandle {
    fn load(&mut self, src: &str, generation: Generation) {
        self.listeners.clear();
        self.listen("loadeddata", generation, MediaEventKind::Ready);
        self.listen(
            "error",
            generation,
            MediaEventKind::Failed(FaultKind::LoadFailure),
        );
        self.listen("ended", generation, MediaEventKind::Ended);
        if self.time_updates {
            self.listen("timeupdate", generation, MediaEventKind::TimeUpdate);
        }
        self.video.set_src(src);
        self.video.load();
    }
}

impl MediaElement for VideoHandle {
    fn position(&self) -> f64 {
        self.video.current_time()
    }

    fn seek(&mut self, seconds: f64) {
        self.video.set_current_time(seconds);
    }

    fn play(&mut self, ticket: PlayTicket) {
        let side = self.side;
        let queue = self.queue.clone();
        match self.video.play() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                let result = JsFuture::from(promise)
                    .await
                    .map(|_| ())
                    .map_err(|err| rejection_for(error_name(&err).as_deref()));
                queue.push(MediaEvent::play_settled(side, ticket, result));
            }),
            Err(err) => {
                let rejection = rejection_for(error_name(&err).as_deref());
                queue.push(MediaEvent::play_settled(side, ticket, Err(rejection)));
            }
        }
    }

    fn pause(&mut self) {
        let _ = self.video.pause();
    }

    fn set_muted(&mut self, muted: bool) {
        self.video.set_muted(muted);
    }
}

fn error_name(err: &JsValue) -> Option<String> {
    js_sys::Reflect::get(err, &JsValue::from_str("name"))
        .ok()
        .and_then(|v| v.as_string())
}
