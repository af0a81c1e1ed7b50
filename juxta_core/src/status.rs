// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! User-visible status lines.
//!
//! Status values are derived from controller state and the last recorded
//! fault; their [`Display`](core::fmt::Display) output is the text shown to
//! the user.

use core::fmt;

use crate::error::{FaultKind, Rejection};
use crate::media::Side;

/// Status of a video pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Nothing selected yet.
    Idle,
    /// Sources assigned, waiting for both to become ready.
    Loading {
        /// Playback starts on its own once both are ready.
        autoplay: bool,
    },
    /// Both ready and paused at the start.
    Ready,
    /// Both playing.
    Playing,
    /// Both paused.
    Paused,
    /// The host refused playback without a user gesture.
    Blocked,
    /// A side failed to load, or refused to play for another reason.
    Error(FaultKind),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Idle => "No media selected",
            Self::Loading { autoplay: true } => {
                "Videos loading... Will start automatically when ready"
            }
            Self::Loading { autoplay: false } => "Videos loading...",
            Self::Ready => "Videos ready - click Play/Pause to start",
            Self::Playing => "Videos playing in sync (will loop continuously)",
            Self::Paused => "Videos paused (click to resume looping)",
            Self::Blocked | Self::Error(FaultKind::PlaybackRejected(Rejection::Blocked)) => {
                "Autoplay blocked by browser - click Play/Pause to start"
            }
            Self::Error(FaultKind::LoadFailure) => "Error loading videos",
            Self::Error(FaultKind::PlaybackRejected(Rejection::Failed)) => {
                "Error starting videos"
            }
        };
        f.write_str(text)
    }
}

/// Status of an image pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageStatus {
    /// Nothing selected yet.
    Idle,
    /// Waiting for both images.
    Loading,
    /// Both images decoded.
    Ready,
    /// One image could not be loaded.
    Failed {
        /// Side that failed.
        side: Side,
        /// Display name of the rendering on that side.
        name: &'static str,
    },
}

impl fmt::Display for ImageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle | Self::Ready => Ok(()),
            Self::Loading => f.write_str("Loading images..."),
            Self::Failed { name, .. } => write!(f, "Could not load {name} image"),
        }
    }
}
