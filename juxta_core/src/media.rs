// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Media element contract for platform integrations.
//!
//! The controller never touches a platform media object directly. Each
//! backend provides a type implementing [`MediaElement`] for one side of the
//! pair and reports asynchronous notifications back as [`MediaEvent`]s:
//!
//! - **Commands**: [`load`](MediaSource::load),
//!   [`seek`](MediaElement::seek), [`pause`](MediaElement::pause) and
//!   [`set_muted`](MediaElement::set_muted) take effect synchronously.
//!   [`play`](MediaElement::play) only *dispatches*; its outcome arrives later
//!   as [`MediaEventKind::PlaySettled`] carrying the same [`PlayTicket`].
//!
//! - **Notifications**: readiness, natural end, failures and time updates
//!   arrive as [`MediaEvent`]s tagged with the [`Generation`] of the load
//!   they belong to. The controller drops events from older generations.
//!
//! # Event loop pseudocode
//!
//! ```rust,ignore
//! // selection changed
//! let reload = selection.set_asset_index(index);
//! pair.load(&reload.paths, now());
//!
//! // media callback (queued by the backend)
//! for event in inbox.drain() {
//!     pair.handle(event, now());
//! }
//!
//! // every animation frame
//! pair.tick(now());
//! status.set_text(&pair.status().to_string());
//! ```

use core::fmt;

use crate::error::{FaultKind, Rejection};

/// One side of a comparison pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    /// The primary rendering ("Ours").
    Before,
    /// The comparison rendering (baseline or ground truth).
    After,
}

impl Side {
    /// Both sides, in dispatch order.
    pub const BOTH: [Self; 2] = [Self::Before, Self::After];

    /// Returns the opposite side.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Before => Self::After,
            Self::After => Self::Before,
        }
    }

    /// Returns a short lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one load cycle of a pair.
///
/// Every call to a loader bumps the generation, so notifications produced for
/// a previous asset can be recognized and discarded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u32);

impl Generation {
    /// Returns the following generation.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Identifies one paired play operation.
///
/// Both sides receive the same ticket; the operation succeeds once both have
/// started and fails on the first rejection. A ticket is invalidated by
/// pausing, reloading, a rejection or issuing another play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlayTicket {
    /// Load cycle the operation belongs to.
    pub generation: Generation,
    /// Per-controller operation counter.
    pub serial: u32,
}

/// What happened to a media resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaEventKind {
    /// Enough data is available to render the first frame.
    Ready,
    /// Playback reached the natural end of the resource.
    Ended,
    /// The playback position advanced.
    TimeUpdate,
    /// The resource failed.
    Failed(FaultKind),
    /// A previously dispatched [`MediaElement::play`] settled.
    PlaySettled {
        /// The ticket passed to `play`.
        ticket: PlayTicket,
        /// `Ok` once playback started, otherwise why it was refused.
        result: Result<(), Rejection>,
    },
}

/// A notification from one side of the pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MediaEvent {
    /// Which side reported.
    pub side: Side,
    /// Load cycle the notification belongs to.
    pub generation: Generation,
    /// What happened.
    pub kind: MediaEventKind,
}

impl MediaEvent {
    /// Creates an event.
    #[must_use]
    pub const fn new(side: Side, generation: Generation, kind: MediaEventKind) -> Self {
        Self {
            side,
            generation,
            kind,
        }
    }

    /// Creates a [`MediaEventKind::PlaySettled`] event for `ticket`.
    #[must_use]
    pub const fn play_settled(side: Side, ticket: PlayTicket, result: Result<(), Rejection>) -> Self {
        Self::new(
            side,
            ticket.generation,
            MediaEventKind::PlaySettled { ticket, result },
        )
    }
}

/// Anything that loads from a path and reports readiness (images, videos).
///
/// Implementations must not call back into the controller synchronously;
/// notifications are queued and delivered through
/// [`PairController::handle`](crate::pair::PairController::handle) or
/// [`ImagePair::handle`](crate::load::ImagePair::handle).
pub trait MediaSource {
    /// Assigns a new source and starts loading it. Notifications for this
    /// load must carry `generation`; listeners for earlier loads must stop
    /// reporting.
    fn load(&mut self, src: &str, generation: Generation);
}

/// A playable platform media resource.
pub trait MediaElement: MediaSource {
    /// Returns the current playback position in seconds.
    fn position(&self) -> f64;

    /// Moves the playback position, in seconds.
    fn seek(&mut self, seconds: f64);

    /// Dispatches a play request. The outcome is reported later as
    /// [`MediaEventKind::PlaySettled`] with the same `ticket`.
    fn play(&mut self, ticket: PlayTicket);

    /// Pauses playback immediately.
    fn pause(&mut self);

    /// Mutes or unmutes audio.
    fn set_muted(&mut self, muted: bool);
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording test double for [`MediaElement`].

    use alloc::string::String;
    use alloc::vec::Vec;

    use super::*;

    /// A command observed by [`FakeMedia`].
    #[derive(Clone, Debug, PartialEq)]
    pub(crate) enum Call {
        Load(String, Generation),
        Seek(f64),
        Play(PlayTicket),
        Pause,
        Muted(bool),
    }

    #[derive(Debug, Default)]
    pub(crate) struct FakeMedia {
        pub(crate) position: f64,
        pub(crate) calls: Vec<Call>,
    }

    impl FakeMedia {
        pub(crate) fn last_ticket(&self) -> Option<PlayTicket> {
            self.calls.iter().rev().find_map(|c| match c {
                Call::Play(t) => Some(*t),
                _ => None,
            })
        }

        pub(crate) fn seeks(&self) -> Vec<f64> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Seek(s) => Some(*s),
                    _ => None,
                })
                .collect()
        }

        pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| pred(c)).count()
        }
    }

    impl MediaSource for FakeMedia {
        fn load(&mut self, src: &str, generation: Generation) {
            self.position = 0.0;
            self.calls.push(Call::Load(src.into(), generation));
        }
    }

    impl MediaElement for FakeMedia {
        fn position(&self) -> f64 {
            self.position
        }

        fn seek(&mut self, seconds: f64) {
            self.position = seconds;
            self.calls.push(Call::Seek(seconds));
        }

        fn play(&mut self, ticket: PlayTicket) {
            self.calls.push(Call::Play(ticket));
        }

        fn pause(&mut self) {
            self.calls.push(Call::Pause);
        }

        fn set_muted(&mut self, muted: bool) {
            self.calls.push(Call::Muted(muted));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_side_is_symmetric() {
        for side in Side::BOTH {
            assert_eq!(side.other().other(), side, "other() must be an involution");
            assert_ne!(side.other(), side, "other() must flip the side");
        }
    }

    #[test]
    fn generation_wraps_instead_of_overflowing() {
        assert_eq!(Generation(u32::MAX).next(), Generation(0));
        assert_eq!(Generation(4).next(), Generation(5));
    }

    #[test]
    fn play_settled_carries_ticket_generation() {
        let ticket = PlayTicket {
            generation: Generation(7),
            serial: 3,
        };
        let event = MediaEvent::play_settled(Side::After, ticket, Ok(()));
        assert_eq!(event.generation, Generation(7));
        assert_eq!(
            event.kind,
            MediaEventKind::PlaySettled {
                ticket,
                result: Ok(())
            }
        );
    }
}
