// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Load-cycle bookkeeping for media pairs.
//!
//! [`LoadTracker`] follows one load cycle of both sides: it hands out a fresh
//! [`Generation`] per cycle, collects readiness per side and records the
//! first failure. Notifications from earlier cycles are reported as
//! [`LoadUpdate::Stale`] so callers can drop them.
//!
//! [`ImagePair`] is the image-mode pair: it only loads, there is no playback.

use crate::error::{FaultKind, MediaFault};
use crate::media::{Generation, MediaEvent, MediaEventKind, MediaSource, Side};
use crate::selection::MediaPaths;
use crate::status::ImageStatus;

/// Where a load cycle stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    /// No cycle started yet.
    Idle,
    /// At least one side is still loading.
    Loading,
    /// Both sides are ready.
    Ready,
    /// A side failed; terminal for this cycle.
    Failed(MediaFault),
}

/// Result of feeding a notification to a [`LoadTracker`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadUpdate {
    /// The notification belongs to an earlier cycle.
    Stale,
    /// Recorded; the other side is still loading.
    Pending,
    /// The second side just became ready.
    BothReady,
    /// A side failed for the first time in this cycle.
    Failed(MediaFault),
    /// Nothing changed (duplicate readiness, or the cycle already failed).
    Unchanged,
}

/// Readiness and failure bookkeeping for one load cycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoadTracker {
    generation: Generation,
    started: bool,
    ready: [bool; 2],
    fault: Option<MediaFault>,
}

impl LoadTracker {
    /// Creates a tracker with no cycle started.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation of the current cycle.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns `true` if `generation` is the current cycle.
    #[must_use]
    pub fn is_current(&self, generation: Generation) -> bool {
        self.started && generation == self.generation
    }

    /// Starts a new cycle, forgetting everything about the previous one.
    pub fn begin(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.started = true;
        self.ready = [false; 2];
        self.fault = None;
        self.generation
    }

    /// Records that `side` is ready.
    pub fn mark_ready(&mut self, side: Side, generation: Generation) -> LoadUpdate {
        if !self.is_current(generation) {
            return LoadUpdate::Stale;
        }
        if self.fault.is_some() || self.ready[slot(side)] {
            return LoadUpdate::Unchanged;
        }
        self.ready[slot(side)] = true;
        if self.ready == [true; 2] {
            LoadUpdate::BothReady
        } else {
            LoadUpdate::Pending
        }
    }

    /// Records that `side` failed. Only the first failure of a cycle is kept.
    pub fn mark_failed(&mut self, side: Side, generation: Generation, kind: FaultKind) -> LoadUpdate {
        if !self.is_current(generation) {
            return LoadUpdate::Stale;
        }
        if self.fault.is_some() {
            return LoadUpdate::Unchanged;
        }
        let fault = MediaFault::new(side, kind);
        self.fault = Some(fault);
        LoadUpdate::Failed(fault)
    }

    /// Returns `true` once `side` reported ready in the current cycle.
    #[must_use]
    pub const fn is_ready(&self, side: Side) -> bool {
        self.ready[slot(side)]
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        match (self.started, self.fault) {
            (false, _) => LoadPhase::Idle,
            (true, Some(fault)) => LoadPhase::Failed(fault),
            (true, None) if self.ready == [true; 2] => LoadPhase::Ready,
            (true, None) => LoadPhase::Loading,
        }
    }
}

const fn slot(side: Side) -> usize {
    match side {
        Side::Before => 0,
        Side::After => 1,
    }
}

/// A before/after pair of still images.
#[derive(Debug)]
pub struct ImagePair<S> {
    before: S,
    after: S,
    tracker: LoadTracker,
    names: [&'static str; 2],
}

impl<S: MediaSource> ImagePair<S> {
    /// Creates a pair with nothing loaded.
    pub fn new(before: S, after: S) -> Self {
        Self {
            before,
            after,
            tracker: LoadTracker::new(),
            names: [""; 2],
        }
    }

    /// Assigns new sources to both images. Notifications from earlier loads
    /// are ignored from now on.
    pub fn load(&mut self, paths: &MediaPaths) -> Generation {
        let generation = self.tracker.begin();
        self.names = [paths.name(Side::Before), paths.name(Side::After)];
        self.before.load(&paths.before, generation);
        self.after.load(&paths.after, generation);
        generation
    }

    /// Feeds a notification from one of the images.
    ///
    /// Playback notifications do not apply to images and are ignored.
    pub fn handle(&mut self, event: MediaEvent) -> LoadUpdate {
        match event.kind {
            MediaEventKind::Ready => self.tracker.mark_ready(event.side, event.generation),
            MediaEventKind::Failed(kind) => {
                self.tracker
                    .mark_failed(event.side, event.generation, kind)
            }
            _ if !self.tracker.is_current(event.generation) => LoadUpdate::Stale,
            _ => LoadUpdate::Unchanged,
        }
    }

    /// Current load phase.
    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        self.tracker.phase()
    }

    /// Status line for the pair.
    #[must_use]
    pub fn status(&self) -> ImageStatus {
        match self.tracker.phase() {
            LoadPhase::Idle => ImageStatus::Idle,
            LoadPhase::Loading => ImageStatus::Loading,
            LoadPhase::Ready => ImageStatus::Ready,
            LoadPhase::Failed(fault) => ImageStatus::Failed {
                side: fault.side,
                name: self.names[slot(fault.side)],
            },
        }
    }

    /// Returns the element for `side`.
    pub fn element(&self, side: Side) -> &S {
        match side {
            Side::Before => &self.before,
            Side::After => &self.after,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString as _;

    use super::*;
    use crate::media::testing::{Call, FakeMedia};
    use crate::selection::{CompareMode, MediaKind, Selection};

    fn ready(side: Side, g: Generation) -> MediaEvent {
        MediaEvent::new(side, g, MediaEventKind::Ready)
    }

    #[test]
    fn both_sides_must_report_ready() {
        let mut t = LoadTracker::new();
        assert_eq!(t.phase(), LoadPhase::Idle);
        let g = t.begin();
        assert_eq!(t.mark_ready(Side::After, g), LoadUpdate::Pending);
        assert_eq!(t.phase(), LoadPhase::Loading);
        assert_eq!(t.mark_ready(Side::After, g), LoadUpdate::Unchanged);
        assert_eq!(t.mark_ready(Side::Before, g), LoadUpdate::BothReady);
        assert_eq!(t.phase(), LoadPhase::Ready);
    }

    #[test]
    fn earlier_generations_are_stale() {
        let mut t = LoadTracker::new();
        let old = t.begin();
        let new = t.begin();
        assert_ne!(old, new);
        assert_eq!(t.mark_ready(Side::Before, old), LoadUpdate::Stale);
        assert_eq!(
            t.mark_failed(Side::Before, old, FaultKind::LoadFailure),
            LoadUpdate::Stale
        );
        assert_eq!(t.phase(), LoadPhase::Loading);
    }

    #[test]
    fn first_failure_wins() {
        let mut t = LoadTracker::new();
        let g = t.begin();
        let first = t.mark_failed(Side::After, g, FaultKind::LoadFailure);
        assert_eq!(
            first,
            LoadUpdate::Failed(MediaFault::new(Side::After, FaultKind::LoadFailure))
        );
        assert_eq!(
            t.mark_failed(Side::Before, g, FaultKind::LoadFailure),
            LoadUpdate::Unchanged
        );
        assert_eq!(t.mark_ready(Side::Before, g), LoadUpdate::Unchanged);
    }

    #[test]
    fn image_pair_loads_selection_paths() {
        let mut sel = Selection::new(MediaKind::Image);
        sel.set_mode(CompareMode::GroundTruth).unwrap();
        let reload = sel.set_asset_index("05");

        let mut pair = ImagePair::new(FakeMedia::default(), FakeMedia::default());
        let g = pair.load(&reload.paths);
        assert_eq!(
            pair.element(Side::Before).calls,
            [Call::Load("Ours/05.png".into(), g)]
        );
        assert_eq!(
            pair.element(Side::After).calls,
            [Call::Load("gt/05.png".into(), g)]
        );
        assert_eq!(pair.status(), ImageStatus::Loading);

        pair.handle(ready(Side::Before, g));
        assert_eq!(pair.handle(ready(Side::After, g)), LoadUpdate::BothReady);
        assert_eq!(pair.status(), ImageStatus::Ready);
    }

    #[test]
    fn image_failure_is_reported_not_retried() {
        let mut pair = ImagePair::new(FakeMedia::default(), FakeMedia::default());
        let paths = MediaPaths::resolve(MediaKind::Image, CompareMode::Baseline, &"9".into());
        let g = pair.load(&paths);
        pair.handle(MediaEvent::new(
            Side::After,
            g,
            MediaEventKind::Failed(FaultKind::LoadFailure),
        ));
        assert_eq!(
            pair.status(),
            ImageStatus::Failed {
                side: Side::After,
                name: "3DGS",
            }
        );
        assert_eq!(pair.status().to_string(), "Could not load 3DGS image");
        assert_eq!(pair.element(Side::After).calls.len(), 1, "no retry");
    }

    #[test]
    fn failed_primary_is_named_after_its_rendering() {
        let mut sel = Selection::new(MediaKind::Image);
        sel.set_mode(CompareMode::GroundTruth).unwrap();
        let reload = sel.set_asset_index("02");

        let mut pair = ImagePair::new(FakeMedia::default(), FakeMedia::default());
        let g = pair.load(&reload.paths);
        pair.handle(MediaEvent::new(
            Side::Before,
            g,
            MediaEventKind::Failed(FaultKind::LoadFailure),
        ));
        assert_eq!(pair.status().to_string(), "Could not load Ours image");
    }
}
