// SPDX-License-Identifier: MIT
//! Layout parameters: margins, gap, width mode, and the per-unit image
//! ceiling. One parameter set drives one planning algorithm — the width
//! modes are variants of [`WidthMode`], not separate code paths.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Conventional detail-page width in pixels (uniform-width mode default).
pub const DEFAULT_WIDTH: u32 = 900;
/// Default white margin above the first image.
pub const DEFAULT_TOP_MARGIN: u32 = 120;
/// Default vertical gap between adjacent images.
pub const DEFAULT_GAP: u32 = 80;
/// Default white margin below the last image.
pub const DEFAULT_BOTTOM_MARGIN: u32 = 120;

/// A 2D size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

/// How the canvas width is chosen and how images relate to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidthMode {
    /// Every image is rescaled (ratio-locked) so its width equals this value.
    Fixed(u32),
    /// Canvas width is the maximum source width; each image keeps its own
    /// size and is centered horizontally.
    Natural,
}

/// Parameters for one layout computation.
///
/// Margins and gap are in pixels. `max_per_unit`, when set, partitions the
/// input into consecutive chunks of at most that many images, each chunk
/// producing its own independent plan — used when the downstream document
/// tool has a per-document image-count ceiling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutParams {
    pub width_mode: WidthMode,
    pub top_margin: u32,
    pub gap: u32,
    pub bottom_margin: u32,
    pub max_per_unit: Option<NonZeroUsize>,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            width_mode: WidthMode::Fixed(DEFAULT_WIDTH),
            top_margin: DEFAULT_TOP_MARGIN,
            gap: DEFAULT_GAP,
            bottom_margin: DEFAULT_BOTTOM_MARGIN,
            max_per_unit: None,
        }
    }
}
