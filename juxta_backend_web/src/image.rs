// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `<img>` element behind [`MediaSource`].

use juxta_core::error::FaultKind;
use juxta_core::media::{Generation, MediaEvent, MediaEventKind, MediaSource, Side};
use web_sys::HtmlImageElement;

use crate::listen::ListenerSet;
use crate::queue::EventQueue;

/// One side of an image pair.
///
/// Reports `load` as [`MediaEventKind::Ready`] and `error` as a load
/// failure. A failed image is not retried.
#[derive(Debug)]
pub struct ImageHandle {
    image: HtmlImageElement,
    side: Side,
    queue: EventQueue,
    listeners: ListenerSet,
}

impl ImageHandle {
    /// Wraps `image` as the `side` element, posting notifications to `queue`.
    pub fn new(image: HtmlImageElement, side: Side, queue: EventQueue) -> Self {
        let listeners = ListenerSet::new(image.clone().into());
        Self {
            image,
            side,
            queue,
            listeners,
        }
    }

    /// The underlying element.
    #[must_use]
    pub fn element(&self) -> &HtmlImageElement {
        &self.image
    }
}

impl MediaSource for ImageHandle {
    fn load(&mut self, src: &str, generation: Generation) {
        self.listeners.clear();
        for (kind, event) in [
            ("load", MediaEventKind::Ready),
            ("error", MediaEventKind::Failed(FaultKind::LoadFailure)),
        ] {
            let queue = self.queue.clone();
            let side = self.side;
            self.listeners.add(kind, move |_| {
                queue.push(MediaEvent::new(side, generation, event));
            });
        }
        self.image.set_src(src);
    }
}
