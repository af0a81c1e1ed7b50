// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM presentation of the reveal slider.
//!
//! [`LabelPresenter`] owns the comparison container and its two overlay
//! labels. On every slider change it writes the reveal position to the
//! container's `--position` custom property, measures container and labels,
//! and applies the [`ClipDirectives`] from
//! [`compute_clip`](juxta_core::geometry::compute_clip) as `clip-path` and
//! `opacity`.

use alloc::format;

use juxta_core::geometry::{ClipDirectives, LabelClip, SliderPosition, compute_clip};
use juxta_core::selection::Labels;
use kurbo::Rect;
use web_sys::{Element, HtmlElement};

/// Returns the border box of `el` in viewport coordinates.
#[must_use]
pub fn measure(el: &Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect::new(r.left(), r.top(), r.right(), r.bottom())
}

/// Replaces the text content of `el`.
pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

/// Applies slider position and label clipping to a comparison container.
pub struct LabelPresenter {
    container: HtmlElement,
    left: HtmlElement,
    right: HtmlElement,
    slider: SliderPosition,
}

impl core::fmt::Debug for LabelPresenter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LabelPresenter")
            .field("slider", &self.slider)
            .finish_non_exhaustive()
    }
}

impl LabelPresenter {
    /// Creates a presenter for `container` and its overlay labels.
    #[must_use]
    pub fn new(container: HtmlElement, left: HtmlElement, right: HtmlElement) -> Self {
        Self {
            container,
            left,
            right,
            slider: SliderPosition::CENTER,
        }
    }

    /// Returns the container element.
    #[must_use]
    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// Last applied slider position.
    #[must_use]
    pub fn slider(&self) -> SliderPosition {
        self.slider
    }

    /// Moves the divider to `slider` and re-clips both labels.
    pub fn reveal(&mut self, slider: SliderPosition) -> ClipDirectives {
        self.slider = slider;
        let _ = self
            .container
            .style()
            .set_property("--position", &slider.reveal_css());
        self.refresh()
    }

    /// Re-measures and re-clips at the current position, e.g. after a resize
    /// or a label text change.
    pub fn refresh(&self) -> ClipDirectives {
        let directives = compute_clip(
            self.slider,
            measure(&self.container),
            measure(&self.left),
            measure(&self.right),
        );
        self.apply(&directives);
        directives
    }

    /// Writes `directives` to the label styles.
    pub fn apply(&self, directives: &ClipDirectives) {
        apply_label(&self.left, directives.left, directives.left_opacity);
        apply_label(&self.right, directives.right, directives.right_opacity);
    }

    /// Sets the overlay label texts and re-clips them, since their widths
    /// changed.
    pub fn set_labels(&self, labels: &Labels) -> ClipDirectives {
        set_text(&self.left, labels.left);
        set_text(&self.right, labels.right);
        self.refresh()
    }
}

fn apply_label(el: &HtmlElement, clip: LabelClip, opacity: f32) {
    let style = el.style();
    let _ = style.set_property("clip-path", &clip.css());
    let _ = style.set_property("opacity", &format!("{opacity}"));
}
