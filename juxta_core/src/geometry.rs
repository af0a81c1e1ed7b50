// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reveal-slider geometry and label clipping.
//!
//! The comparison container stacks two media elements; the slider position
//! decides how much of the top one is revealed. Two overlay labels sit on top
//! of the media, one near each edge. When the slider line crosses a label,
//! the label is clipped at the line so each caption only covers the media it
//! names:
//!
//! ```text
//!   container.x0                         container.x1
//!   │  ┌────────┐          ┊          ┌────────┐  │
//!   │  │  left  │          ┊ slider   │ right  │  │
//!   │  └────────┘          ┊          └────────┘  │
//! ```
//!
//! The left label is clipped from its right edge inward (only the part left
//! of the line stays visible); the right label is clipped from its left edge
//! inward. [`compute_clip`] is pure and cheap enough to call on every drag
//! event.

use alloc::format;
use alloc::string::String;

use kurbo::Rect;

/// Slider position as an integer percentage of the container width.
///
/// Always within `0..=100`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SliderPosition(u8);

impl SliderPosition {
    /// The leftmost position.
    pub const MIN: Self = Self(0);
    /// The centered position used when a page loads.
    pub const CENTER: Self = Self(50);
    /// The rightmost position.
    pub const MAX: Self = Self(100);

    /// Creates a position, clamping to `100`.
    #[must_use]
    pub const fn new(percent: u8) -> Self {
        if percent > 100 { Self(100) } else { Self(percent) }
    }

    /// Parses the value of a range input.
    ///
    /// Leading and trailing whitespace is ignored and out-of-range integers
    /// are clamped. Returns `None` for anything that is not an integer.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let parsed: i64 = value.trim().parse().ok()?;
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "value is clamped to 0..=100 first"
        )]
        let percent = parsed.clamp(0, 100) as u8;
        Some(Self(percent))
    }

    /// Returns the percentage.
    #[must_use]
    pub const fn percent(self) -> u8 {
        self.0
    }

    /// Returns the slider line's offset from the container's left edge.
    #[must_use]
    pub fn pixel_offset(self, container_width: f64) -> f64 {
        // Multiply first so whole-pixel positions stay exact.
        f64::from(self.0) * container_width / 100.0
    }

    /// Returns the value for the container's `--position` custom property.
    #[must_use]
    pub fn reveal_css(self) -> String {
        format!("{}%", self.0)
    }
}

impl Default for SliderPosition {
    fn default() -> Self {
        Self::CENTER
    }
}

/// The edge a label is clipped from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClipEdge {
    /// Inset grows from the left edge toward the right.
    Left,
    /// Inset grows from the right edge toward the left.
    Right,
}

/// Clip applied to one overlay label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LabelClip {
    /// The label is fully visible.
    Unclipped,
    /// The label is cut back from `edge` by `fraction` of its width.
    Inset {
        /// Edge the inset starts from.
        edge: ClipEdge,
        /// Hidden share of the label width, in `0.0..=1.0`.
        fraction: f64,
    },
}

impl LabelClip {
    /// Returns the visible share of the label width.
    #[must_use]
    pub fn visible_fraction(self) -> f64 {
        match self {
            Self::Unclipped => 1.0,
            Self::Inset { fraction, .. } => 1.0 - fraction,
        }
    }

    /// Returns the clip state for this label, if it is clipped at all.
    #[must_use]
    pub fn state(self) -> Option<LabelClipState> {
        match self {
            Self::Unclipped => None,
            Self::Inset { edge, .. } => Some(LabelClipState {
                visible_fraction: self.visible_fraction(),
                edge,
            }),
        }
    }

    /// Returns the CSS `clip-path` value for this clip.
    #[must_use]
    pub fn css(self) -> String {
        match self {
            Self::Unclipped => String::from("none"),
            Self::Inset {
                edge: ClipEdge::Right,
                fraction,
            } => format!("inset(0 {}% 0 0)", fraction * 100.0),
            Self::Inset {
                edge: ClipEdge::Left,
                fraction,
            } => format!("inset(0 0 0 {}%)", fraction * 100.0),
        }
    }
}

/// Visible share and clipped edge of a partially hidden label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelClipState {
    /// Visible share of the label width, in `0.0..=1.0`.
    pub visible_fraction: f64,
    /// Edge the label is clipped from.
    pub edge: ClipEdge,
}

/// Clip directives for both overlay labels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipDirectives {
    /// Clip for the label near the container's left edge.
    pub left: LabelClip,
    /// Clip for the label near the container's right edge.
    pub right: LabelClip,
    /// Opacity of the left label. Always `1.0`.
    pub left_opacity: f32,
    /// Opacity of the right label. Always `1.0`.
    pub right_opacity: f32,
}

/// Computes label clips for a slider position.
///
/// All rectangles must be in the same coordinate space (for example client
/// coordinates from `getBoundingClientRect`). The interval test is closed: a
/// slider exactly on a label edge counts as crossing it. Degenerate labels
/// (zero or non-finite width) are left unclipped.
#[must_use]
pub fn compute_clip(
    slider: SliderPosition,
    container: Rect,
    left_label: Rect,
    right_label: Rect,
) -> ClipDirectives {
    let pixel = slider.pixel_offset(container.width());
    let left = crossed_fraction(pixel, container, left_label).map_or(LabelClip::Unclipped, |c| {
        LabelClip::Inset {
            edge: ClipEdge::Right,
            fraction: 1.0 - c,
        }
    });
    let right =
        crossed_fraction(pixel, container, right_label).map_or(LabelClip::Unclipped, |c| {
            LabelClip::Inset {
                edge: ClipEdge::Left,
                fraction: c,
            }
        });
    ClipDirectives {
        left,
        right,
        left_opacity: 1.0,
        right_opacity: 1.0,
    }
}

/// Share of `label` lying left of the slider line, or `None` when the line
/// does not cross the label.
fn crossed_fraction(pixel: f64, container: Rect, label: Rect) -> Option<f64> {
    let width = label.width();
    if !(width.is_finite() && width > 0.0) {
        return None;
    }
    let start = label.x0 - container.x0;
    let end = label.x1 - container.x0;
    if pixel < start || pixel > end {
        return None;
    }
    Some(((pixel - start) / width).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: Rect = Rect::new(100.0, 0.0, 900.0, 450.0);
    // Left label spans 16..96 px, right label 704..784 px within the container.
    const LEFT: Rect = Rect::new(116.0, 16.0, 196.0, 40.0);
    const RIGHT: Rect = Rect::new(804.0, 16.0, 884.0, 40.0);

    fn clips(percent: u8) -> ClipDirectives {
        compute_clip(SliderPosition::new(percent), CONTAINER, LEFT, RIGHT)
    }

    #[test]
    fn slider_away_from_labels_leaves_both_visible() {
        let d = clips(50);
        assert_eq!(d.left, LabelClip::Unclipped);
        assert_eq!(d.right, LabelClip::Unclipped);
        assert_eq!(d.left.css(), "none");
    }

    #[test]
    fn extremes_leave_inset_labels_visible() {
        for p in [0, 100] {
            let d = clips(p);
            assert_eq!(d.left, LabelClip::Unclipped, "left label at {p}%");
            assert_eq!(d.right, LabelClip::Unclipped, "right label at {p}%");
        }
    }

    #[test]
    fn left_label_is_cut_from_its_right_edge() {
        // 7% of 800 px = 56 px, i.e. half way through the 16..96 span.
        let d = clips(7);
        assert_eq!(
            d.left,
            LabelClip::Inset {
                edge: ClipEdge::Right,
                fraction: 0.5
            }
        );
        assert_eq!(d.left.css(), "inset(0 50% 0 0)");
        assert!((d.left.visible_fraction() - 0.5).abs() < 1e-12, "half visible");
    }

    #[test]
    fn right_label_is_cut_from_its_left_edge() {
        // 93% of 800 px = 744 px, half way through 704..784.
        let d = clips(93);
        assert_eq!(
            d.right,
            LabelClip::Inset {
                edge: ClipEdge::Left,
                fraction: 0.5
            }
        );
        assert_eq!(d.right.css(), "inset(0 0 0 50%)");
        let state = d.right.state().unwrap();
        assert_eq!(state.edge, ClipEdge::Left);
    }

    #[test]
    fn label_edges_are_inclusive() {
        // Label starting exactly at 200 px (25% of 800).
        let label = Rect::new(300.0, 0.0, 380.0, 20.0);
        let at_start = compute_clip(SliderPosition::new(25), CONTAINER, label, RIGHT);
        assert_eq!(
            at_start.left,
            LabelClip::Inset {
                edge: ClipEdge::Right,
                fraction: 1.0
            }
        );
        // 280 px = 35%: the label's right edge.
        let at_end = compute_clip(SliderPosition::new(35), CONTAINER, label, RIGHT);
        assert_eq!(
            at_end.left,
            LabelClip::Inset {
                edge: ClipEdge::Right,
                fraction: 0.0
            }
        );
    }

    #[test]
    fn label_spanning_the_container_edge_is_clipped_at_extremes() {
        let flush_left = Rect::new(100.0, 0.0, 180.0, 20.0);
        let d = compute_clip(SliderPosition::MIN, CONTAINER, flush_left, RIGHT);
        assert_eq!(d.left.visible_fraction(), 0.0);
    }

    #[test]
    fn zero_width_label_is_not_clipped() {
        let empty = Rect::new(500.0, 0.0, 500.0, 20.0);
        let d = compute_clip(SliderPosition::CENTER, CONTAINER, empty, empty);
        assert_eq!(d.left, LabelClip::Unclipped);
        assert_eq!(d.right, LabelClip::Unclipped);
    }

    #[test]
    fn fractions_stay_in_unit_range_for_every_position() {
        for p in 0..=100 {
            let d = clips(p);
            for clip in [d.left, d.right] {
                let v = clip.visible_fraction();
                assert!((0.0..=1.0).contains(&v), "visible fraction {v} at {p}%");
            }
            assert_eq!(d.left_opacity, 1.0);
            assert_eq!(d.right_opacity, 1.0);
        }
    }

    #[test]
    fn parse_clamps_and_rejects_garbage() {
        assert_eq!(SliderPosition::parse(" 42 "), Some(SliderPosition::new(42)));
        assert_eq!(SliderPosition::parse("250"), Some(SliderPosition::MAX));
        assert_eq!(SliderPosition::parse("-3"), Some(SliderPosition::MIN));
        assert_eq!(SliderPosition::parse("4.5"), None);
        assert_eq!(SliderPosition::new(180).percent(), 100);
        assert_eq!(SliderPosition::new(30).reveal_css(), "30%");
    }
}
