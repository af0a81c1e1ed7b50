// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser backend for juxta.
//!
//! This crate connects [`juxta_core`] to browser APIs:
//!
//! - [`VideoHandle`] / [`ImageHandle`]: `<video>` and `<img>` elements behind
//!   [`MediaElement`](juxta_core::media::MediaElement) and
//!   [`MediaSource`](juxta_core::media::MediaSource)
//! - [`EventQueue`]: inbox the handles post notifications to
//! - [`RafLoop`]: `requestAnimationFrame` tick source
//! - [`LabelPresenter`]: reveal position and label clipping on the DOM
//! - [`ConsoleSink`]: controller trace events on the browser console
//!
//! Media callbacks never call into the controller directly. They push onto
//! the [`EventQueue`], which the page drains on every frame and after every
//! user command:
//!
//! ```rust,ignore
//! for event in queue.drain() {
//!     pair.handle(event, juxta_backend_web::now());
//! }
//! ```

#![no_std]

extern crate alloc;

mod console;
mod image;
mod listen;
mod presenter;
mod queue;
mod raf;
mod video;

pub use console::ConsoleSink;
pub use image::ImageHandle;
pub use presenter::{LabelPresenter, measure, set_text};
pub use queue::EventQueue;
pub use raf::RafLoop;
pub use video::VideoHandle;

use juxta_core::error::Rejection;
use juxta_core::time::HostTime;

/// Returns the current host time from `performance.now()`, in microsecond
/// ticks.
#[must_use]
pub fn now() -> HostTime {
    HostTime::from_millis_f64(raf::performance_now())
}

/// Classifies a rejected `play()` promise by its `DOMException` name.
///
/// `NotAllowedError` is the autoplay-policy refusal; everything else is a
/// plain failure.
#[must_use]
pub fn rejection_for(name: Option<&str>) -> Rejection {
    match name {
        Some("NotAllowedError") => Rejection::Blocked,
        _ => Rejection::Failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_allowed_is_blocked() {
        assert_eq!(rejection_for(Some("NotAllowedError")), Rejection::Blocked);
    }

    #[test]
    fn other_rejections_are_failures() {
        assert_eq!(rejection_for(Some("AbortError")), Rejection::Failed);
        assert_eq!(rejection_for(Some("NotSupportedError")), Rejection::Failed);
        assert_eq!(rejection_for(None), Rejection::Failed);
    }
}
