// Copyright 2026 the Juxta Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Comparison mode and asset selection.
//!
//! [`Selection`] tracks which comparison is shown and derives everything the
//! page displays from it: media paths, overlay labels, the legend under the
//! container and the page title. Assets follow a fixed directory layout:
//!
//! ```text
//! Ours/{index}.png   3DGS/{index}.png   gt/{index}.png
//! Ours/{index}.mp4   3DGS/{index}.mp4
//! ```

use alloc::format;
use alloc::string::String;
use core::fmt;

use crate::media::Side;

/// Directory holding the primary renderings.
pub const PRIMARY_DIR: &str = "Ours";
/// Display name of the primary renderings.
pub const PRIMARY_NAME: &str = "Ours";

/// Whether the pair shows still images or videos.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// PNG image pairs.
    Image,
    /// MP4 video pairs.
    Video,
}

impl MediaKind {
    /// File extension of assets of this kind.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Image => "png",
            Self::Video => "mp4",
        }
    }

    /// Returns `true` if `mode` is available for this kind.
    ///
    /// Videos are only ever compared against the baseline.
    #[must_use]
    pub const fn supports(self, mode: CompareMode) -> bool {
        match self {
            Self::Image => true,
            Self::Video => matches!(mode, CompareMode::Baseline),
        }
    }
}

/// What the primary rendering is compared against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompareMode {
    /// Primary vs the 3DGS baseline.
    #[default]
    Baseline,
    /// Primary vs ground truth.
    GroundTruth,
}

impl CompareMode {
    /// Asset directory for the comparison side.
    #[must_use]
    pub const fn directory(self) -> &'static str {
        match self {
            Self::Baseline => "3DGS",
            Self::GroundTruth => "gt",
        }
    }

    /// Display name of the comparison side.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Baseline => "3DGS",
            Self::GroundTruth => "GT",
        }
    }
}

/// Identifier of an image or video pair, kept verbatim (e.g. `"05"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetIndex(String);

impl AssetIndex {
    /// Creates an index from the select element's value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the index text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetIndex {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AssetIndex {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for AssetIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source paths for both sides of the pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaPaths {
    /// Primary rendering.
    pub before: String,
    /// Comparison rendering.
    pub after: String,
    /// Mode the comparison side was resolved for.
    pub mode: CompareMode,
}

impl MediaPaths {
    /// Builds the paths for `index` following the asset layout.
    #[must_use]
    pub fn resolve(kind: MediaKind, mode: CompareMode, index: &AssetIndex) -> Self {
        let ext = kind.extension();
        Self {
            before: format!("{PRIMARY_DIR}/{index}.{ext}"),
            after: format!("{}/{index}.{ext}", mode.directory()),
            mode,
        }
    }

    /// Display name of the rendering shown on `side`.
    #[must_use]
    pub const fn name(&self, side: Side) -> &'static str {
        match side {
            Side::Before => PRIMARY_NAME,
            Side::After => self.mode.display_name(),
        }
    }
}

/// Overlay label text drawn over the media.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Labels {
    /// Label near the container's left edge.
    pub left: &'static str,
    /// Label near the container's right edge.
    pub right: &'static str,
}

/// Caption row shown under the container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Legend {
    /// Left caption.
    pub left: &'static str,
    /// Right caption.
    pub right: &'static str,
}

/// A request to reload both media elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reload {
    /// Increases by one with every reload the selection issues.
    pub sequence: u64,
    /// Sources to assign.
    pub paths: MediaPaths,
}

/// Errors from [`Selection`] updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionError {
    /// The mode is not available for this media kind.
    ModeUnsupported {
        /// Kind of the selection.
        kind: MediaKind,
        /// Rejected mode.
        mode: CompareMode,
    },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModeUnsupported { kind, mode } => write!(
                f,
                "{} comparison is not available for {kind:?} pairs",
                mode.display_name()
            ),
        }
    }
}

impl core::error::Error for SelectionError {}

/// Current comparison mode and asset for one page.
#[derive(Clone, Debug)]
pub struct Selection {
    kind: MediaKind,
    mode: CompareMode,
    index: Option<AssetIndex>,
    reloads: u64,
}

impl Selection {
    /// Creates a selection in baseline mode with no asset chosen.
    #[must_use]
    pub const fn new(kind: MediaKind) -> Self {
        Self {
            kind,
            mode: CompareMode::Baseline,
            index: None,
            reloads: 0,
        }
    }

    /// Media kind of this selection.
    #[must_use]
    pub const fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Current comparison mode.
    #[must_use]
    pub const fn mode(&self) -> CompareMode {
        self.mode
    }

    /// Currently selected asset, if any.
    #[must_use]
    pub fn asset_index(&self) -> Option<&AssetIndex> {
        self.index.as_ref()
    }

    /// Number of reloads issued so far.
    #[must_use]
    pub const fn reload_count(&self) -> u64 {
        self.reloads
    }

    /// Switches the comparison mode.
    ///
    /// Labels, legend and title follow immediately. If an asset is selected,
    /// the returned [`Reload`] carries the new paths for both sides.
    pub fn set_mode(&mut self, mode: CompareMode) -> Result<Option<Reload>, SelectionError> {
        if !self.kind.supports(mode) {
            return Err(SelectionError::ModeUnsupported {
                kind: self.kind,
                mode,
            });
        }
        self.mode = mode;
        Ok(self.reload())
    }

    /// Selects an asset.
    ///
    /// Always issues a reload, even when `index` is already selected.
    pub fn set_asset_index(&mut self, index: impl Into<AssetIndex>) -> Reload {
        let index = index.into();
        let paths = MediaPaths::resolve(self.kind, self.mode, &index);
        self.index = Some(index);
        self.next_reload(paths)
    }

    /// Paths for the current asset, if one is selected.
    #[must_use]
    pub fn media_paths(&self) -> Option<MediaPaths> {
        self.index
            .as_ref()
            .map(|index| MediaPaths::resolve(self.kind, self.mode, index))
    }

    /// Overlay labels: comparison side on the left, primary on the right.
    #[must_use]
    pub const fn labels(&self) -> Labels {
        Labels {
            left: self.mode.display_name(),
            right: PRIMARY_NAME,
        }
    }

    /// Captions under the container: primary on the left.
    #[must_use]
    pub const fn legend(&self) -> Legend {
        Legend {
            left: PRIMARY_NAME,
            right: self.mode.display_name(),
        }
    }

    /// Page title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self.mode {
            CompareMode::Baseline => "Ours vs 3DGS Comparison",
            CompareMode::GroundTruth => "Ours vs GT Comparison",
        }
    }

    fn reload(&mut self) -> Option<Reload> {
        let paths = self.media_paths()?;
        Some(self.next_reload(paths))
    }

    fn next_reload(&mut self, paths: MediaPaths) -> Reload {
        self.reloads += 1;
        Reload {
            sequence: self.reloads,
            paths,
        }
    }
}
