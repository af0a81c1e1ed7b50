// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core state and control for before/after media comparison.
//!
//! `juxta_core` holds everything about a comparison widget that does not
//! depend on a platform: the reveal slider's label geometry, which assets are
//! compared, and a controller that keeps two videos playing as one. It is
//! `no_std` compatible (with `alloc`); platform media objects are reached
//! through the [`MediaElement`](media::MediaElement) trait.
//!
//! # Architecture
//!
//! ```text
//!   user input                    platform media (x2)
//!       │                               │ MediaEvent
//!       ▼                               ▼
//!   Selection ──► Reload ──► PairController::load()
//!       │                        │   ▲
//!       │ labels / legend        │   │ handle() / tick()
//!       ▼                        ▼   │
//!   presenter ◄── Status ◄── PairController ──► seek / play / pause
//!       ▲
//!       │ ClipDirectives
//!   compute_clip(slider, container, labels)
//! ```
//!
//! **[`geometry`]**: Slider position and per-label clip computation. Labels
//! are clipped to the side of the divider they belong to, never faded.
//!
//! **[`selection`]**: Media kind, comparison mode and asset index, and the
//! paths, labels and title derived from them.
//!
//! **[`media`]**: The platform contract: [`MediaSource`](media::MediaSource)
//! and [`MediaElement`](media::MediaElement) commands, and the
//! [`MediaEvent`](media::MediaEvent)s backends report back.
//!
//! **[`load`]**: Per-cycle readiness tracking with generation-based
//! staleness, and the image-only [`ImagePair`](load::ImagePair).
//!
//! **[`pair`]**: [`PairController`](pair::PairController): paired play,
//! lockstep looping, drift correction and mute.
//!
//! **[`policy`]**: [`SyncPolicy`](policy::SyncPolicy) tuning for drift
//! tolerance, correction cadence and autoplay.
//!
//! **[`status`]**: User-visible status lines.
//!
//! **[`time`]**: Host timestamps and durations in microseconds.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! controller instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod error;
pub mod geometry;
pub mod load;
pub mod media;
pub mod pair;
pub mod policy;
pub mod selection;
pub mod status;
pub mod time;
pub mod trace;
