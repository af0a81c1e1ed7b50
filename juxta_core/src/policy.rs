// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synchronization policy for media pairs.
//!
//! A [`SyncPolicy`] is fixed when a [`PairController`] is built. It decides
//! when drift between the two sides is corrected, which position both sides
//! snap to, and how the pair behaves once both sources are ready.
//!
//! [`PairController`]: crate::pair::PairController

use core::fmt;

use crate::time::Duration;

/// Position both sides snap to when drift exceeds the tolerance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CorrectionTarget {
    /// The later of the two positions; the lagging side catches up.
    #[default]
    Max,
    /// The earlier of the two positions; the leading side waits.
    Min,
    /// The position of the side whose time update triggered the check.
    ///
    /// Periodic checks have no triggering side and fall back to [`Max`].
    ///
    /// [`Max`]: Self::Max
    Triggering,
}

/// Drift correction and start-up behavior of a media pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyncPolicy {
    /// Largest tolerated position difference, in seconds. Differences strictly
    /// above this value are corrected.
    pub drift_tolerance: f64,
    /// Period of the drift check, and minimum spacing between two applied
    /// corrections.
    pub correction_interval: Duration,
    /// Position both sides snap to.
    pub correction_target: CorrectionTarget,
    /// Start playing once both sources are ready.
    pub autoplay: bool,
    /// Delay between both sources becoming ready and autoplay.
    pub autoplay_delay: Duration,
    /// Initial mute state. Browsers generally refuse unmuted autoplay.
    pub start_muted: bool,
}

impl SyncPolicy {
    /// The default policy: half a second of tolerance, checked every three
    /// seconds, catching up the lagging side.
    pub const CANONICAL: Self = Self {
        drift_tolerance: 0.5,
        correction_interval: Duration::from_millis(3000),
        correction_target: CorrectionTarget::Max,
        autoplay: true,
        autoplay_delay: Duration::from_millis(500),
        start_muted: true,
    };

    /// Tighter policy for pages that feed time updates: 0.3 s tolerance,
    /// corrections at most every 500 ms toward the side reporting progress.
    #[must_use]
    pub const fn responsive() -> Self {
        Self {
            drift_tolerance: 0.3,
            correction_interval: Duration::from_millis(500),
            correction_target: CorrectionTarget::Triggering,
            ..Self::CANONICAL
        }
    }

    /// Returns this policy with a different drift tolerance, in seconds.
    #[must_use]
    pub const fn with_drift_tolerance(mut self, seconds: f64) -> Self {
        self.drift_tolerance = seconds;
        self
    }

    /// Returns this policy with a different correction interval.
    #[must_use]
    pub const fn with_correction_interval(mut self, interval: Duration) -> Self {
        self.correction_interval = interval;
        self
    }

    /// Returns this policy with a different correction target.
    #[must_use]
    pub const fn with_correction_target(mut self, target: CorrectionTarget) -> Self {
        self.correction_target = target;
        self
    }

    /// Returns this policy with autoplay enabled or disabled.
    #[must_use]
    pub const fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    /// Checks that the numeric fields are usable.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if !self.drift_tolerance.is_finite() || self.drift_tolerance < 0.0 {
            return Err(PolicyError::InvalidTolerance);
        }
        if self.correction_interval == Duration::ZERO {
            return Err(PolicyError::ZeroInterval);
        }
        Ok(())
    }
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self::CANONICAL
    }
}

/// A [`SyncPolicy`] field is out of range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyError {
    /// Drift tolerance is negative or not finite.
    InvalidTolerance,
    /// Correction interval is zero.
    ZeroInterval,
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTolerance => {
                write!(f, "drift tolerance must be a finite, non-negative number")
            }
            Self::ZeroInterval => write!(f, "correction interval must be non-zero"),
        }
    }
}

impl core::error::Error for PolicyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_is_default_and_valid() {
        let p = SyncPolicy::default();
        assert_eq!(p, SyncPolicy::CANONICAL);
        assert_eq!(p.correction_interval.as_millis(), 3000);
        assert_eq!(p.validate(), Ok(()));
    }

    #[test]
    fn responsive_keeps_startup_behavior() {
        let p = SyncPolicy::responsive();
        assert_eq!(p.correction_target, CorrectionTarget::Triggering);
        assert!(p.autoplay, "autoplay inherited from canonical");
        assert_eq!(p.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let p = SyncPolicy::CANONICAL.with_drift_tolerance(f64::NAN);
        assert_eq!(p.validate(), Err(PolicyError::InvalidTolerance));
        let p = SyncPolicy::CANONICAL.with_drift_tolerance(-0.1);
        assert_eq!(p.validate(), Err(PolicyError::InvalidTolerance));
        let p = SyncPolicy::CANONICAL.with_correction_interval(Duration::ZERO);
        assert_eq!(p.validate(), Err(PolicyError::ZeroInterval));
    }
}
