// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared inbox for media notifications.

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use juxta_core::media::MediaEvent;

/// A cloneable FIFO of [`MediaEvent`]s.
///
/// Media handles push from DOM callbacks; the page drains between callbacks.
/// Draining hands out an owned batch, so handling an event may push new ones
/// without a borrow conflict.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    inner: Rc<RefCell<VecDeque<MediaEvent>>>,
}

impl EventQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn push(&self, event: MediaEvent) {
        self.inner.borrow_mut().push_back(event);
    }

    /// Removes and returns everything queued so far, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<MediaEvent> {
        self.inner.borrow_mut().drain(..).collect()
    }

    /// Number of queued events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use juxta_core::media::{Generation, MediaEventKind, Side};

    use super::*;

    #[test]
    fn clones_share_one_inbox() {
        let queue = EventQueue::new();
        let producer = queue.clone();
        producer.push(MediaEvent::new(Side::Before, Generation(1), MediaEventKind::Ready));
        producer.push(MediaEvent::new(Side::After, Generation(1), MediaEventKind::Ended));
        assert_eq!(queue.len(), 2);

        let batch = queue.drain();
        assert_eq!(batch[0].side, Side::Before, "oldest first");
        assert_eq!(batch[1].kind, MediaEventKind::Ended);
        assert!(producer.is_empty(), "drain empties every handle");
    }
}
