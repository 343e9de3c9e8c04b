//! Configuration for one generation request.
//!
//! `StitchConfig` is the interface between front ends (CLI, future UIs) and
//! the core pipeline: validated once up front, then converted into the
//! layout crate's parameter type.

use std::num::NonZeroUsize;

use stitch_layout::{LayoutParams, WidthMode};

use crate::compose::JPEG_QUALITY;
use crate::error::{StitchError, StitchResult};

/// Opaque white, the conventional detail-page background.
pub const DEFAULT_BACKGROUND: [u8; 3] = [255, 255, 255];

/// Parameters for one generation request.
///
/// - `width: Some(w)` selects uniform-width mode (every image rescaled to
///   `w`); `None` selects natural-width mode (canvas = widest source,
///   narrower images centered).
/// - `max_per_unit` caps how many images one unit (output document) may
///   hold; inputs beyond the cap split into further units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StitchConfig {
    pub width: Option<u32>,
    pub top_margin: u32,
    pub gap: u32,
    pub bottom_margin: u32,
    pub background: [u8; 3],
    pub quality: u8,
    pub max_per_unit: Option<usize>,
    pub base_name: String,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            width: Some(stitch_layout::params::DEFAULT_WIDTH),
            top_margin: stitch_layout::params::DEFAULT_TOP_MARGIN,
            gap: stitch_layout::params::DEFAULT_GAP,
            bottom_margin: stitch_layout::params::DEFAULT_BOTTOM_MARGIN,
            background: DEFAULT_BACKGROUND,
            quality: JPEG_QUALITY,
            max_per_unit: None,
            base_name: "detail_page".to_string(),
        }
    }
}

impl StitchConfig {
    /// Validate parameter ranges.
    ///
    /// # Errors
    ///
    /// [`StitchError::Config`] naming the offending field.
    pub fn validate(&self) -> StitchResult<()> {
        if self.width == Some(0) {
            return Err(StitchError::config("width", "must be at least 1 pixel"));
        }
        if self.quality == 0 || self.quality > 100 {
            return Err(StitchError::config("quality", "must be in 1..=100"));
        }
        if self.max_per_unit == Some(0) {
            return Err(StitchError::config(
                "max_per_unit",
                "must be at least 1 image per unit",
            ));
        }
        Ok(())
    }

    /// Convert into the layout planner's parameter type.
    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            width_mode: match self.width {
                Some(w) => WidthMode::Fixed(w),
                None => WidthMode::Natural,
            },
            top_margin: self.top_margin,
            gap: self.gap,
            bottom_margin: self.bottom_margin,
            max_per_unit: self.max_per_unit.and_then(NonZeroUsize::new),
        }
    }
}
