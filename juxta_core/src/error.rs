// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fault taxonomy for media pairs.
//!
//! Faults are recorded per [`Side`] and surfaced through
//! [`Status`](crate::status::Status); none of them is fatal. A new asset
//! selection clears them and starts a fresh load.

use core::fmt;

use crate::media::Side;

/// Why a play request was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The host refused playback without a user gesture (autoplay policy).
    Blocked,
    /// Playback failed for any other reason.
    Failed,
}

/// What went wrong with one media resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// The resource could not be fetched or decoded.
    LoadFailure,
    /// A play command was refused.
    PlaybackRejected(Rejection),
}

impl FaultKind {
    /// Returns `true` for the autoplay-policy rejection.
    #[must_use]
    pub const fn is_blocked(self) -> bool {
        matches!(self, Self::PlaybackRejected(Rejection::Blocked))
    }
}

/// A fault attributed to one side of the pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MediaFault {
    /// Which resource failed.
    pub side: Side,
    /// What failed.
    pub kind: FaultKind,
}

impl MediaFault {
    /// Creates a fault record.
    #[must_use]
    pub const fn new(side: Side, kind: FaultKind) -> Self {
        Self { side, kind }
    }
}

impl fmt::Display for MediaFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FaultKind::LoadFailure => write!(f, "{} media failed to load", self.side),
            FaultKind::PlaybackRejected(Rejection::Blocked) => {
                write!(f, "{} media blocked by autoplay policy", self.side)
            }
            FaultKind::PlaybackRejected(Rejection::Failed) => {
                write!(f, "{} media refused to play", self.side)
            }
        }
    }
}

impl core::error::Error for MediaFault {}

/// Errors returned by [`PairController`](crate::pair::PairController)
/// commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlError {
    /// No asset has been loaded yet.
    NoSource,
    /// The current asset failed; select an asset to load again.
    Faulted(MediaFault),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSource => write!(f, "no media loaded"),
            Self::Faulted(fault) => write!(f, "media pair is faulted: {fault}"),
        }
    }
}

impl core::error::Error for ControlError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::NoSource => None,
            Self::Faulted(fault) => Some(fault),
        }
    }
}
