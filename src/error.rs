//! Error types for the stitching pipeline.
//!
//! Every failure is terminal for the current generation request — nothing is
//! retried and there is no partial-success mode. Variants that originate from
//! one image carry that image's identity so the front end can tell the user
//! which file to fix.

use std::{error::Error as StdError, fmt, io, path::PathBuf};

use stitch_layout::PlanError;

/// Result type alias using the pipeline error type.
pub type StitchResult<T> = Result<T, StitchError>;

/// Failures surfaced by planning, compositing, or export.
#[derive(Debug)]
pub enum StitchError {
    /// No images supplied — nothing to lay out.
    EmptyInput,
    /// An image's recorded geometry is unusable (e.g. zero width).
    InvalidImage {
        index: usize,
        name: String,
        reason: String,
    },
    /// Pixel data could not be decoded.
    ImageDecode {
        name: String,
        source: image::ImageError,
    },
    /// Planning-time dimensions disagree with render-time dimensions.
    /// Guards against stale cached metadata; both are (width, height).
    DimensionMismatch {
        name: String,
        planned: (u32, u32),
        actual: (u32, u32),
    },
    /// The number of images handed to the compositor does not match the
    /// plan's placement count.
    CountMismatch { planned: usize, actual: usize },
    /// Configuration validation failures.
    Config { field: String, reason: String },
    /// The resampling engine rejected the operation.
    Resize {
        name: String,
        source: fast_image_resize::ResizeError,
    },
    /// A pixel buffer could not be viewed as a resize input/output.
    ImageBuffer {
        name: String,
        source: fast_image_resize::ImageBufferError,
    },
    /// JPEG encoding failed.
    Encode { source: image::ImageError },
    /// Manifest serialization failed.
    Manifest { source: serde_json::Error },
    /// Filesystem errors during package export.
    Io { path: PathBuf, source: io::Error },
}

impl StitchError {
    /// Create an invalid-image error.
    pub fn invalid_image(
        index: usize,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidImage {
            index,
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a decode error for a named image.
    pub fn decode(name: impl Into<String>, source: image::ImageError) -> Self {
        Self::ImageDecode {
            name: name.into(),
            source,
        }
    }

    /// Create a dimension-mismatch error for a named image.
    pub fn mismatch(name: impl Into<String>, planned: (u32, u32), actual: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            name: name.into(),
            planned,
            actual,
        }
    }

    /// Create a configuration error.
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an I/O error tied to a path.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The error category as a short static string (for summaries/logs).
    pub fn category(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::InvalidImage { .. } => "invalid_image",
            Self::ImageDecode { .. } => "image_decode",
            Self::DimensionMismatch { .. } => "dimension_mismatch",
            Self::CountMismatch { .. } => "count_mismatch",
            Self::Config { .. } => "config",
            Self::Resize { .. } => "resize",
            Self::ImageBuffer { .. } => "image_buffer",
            Self::Encode { .. } => "encode",
            Self::Manifest { .. } => "manifest",
            Self::Io { .. } => "io",
        }
    }
}

impl fmt::Display for StitchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StitchError::EmptyInput => write!(f, "no images supplied, nothing to lay out"),
            StitchError::InvalidImage {
                index,
                name,
                reason,
            } => write!(f, "invalid image #{} '{}': {}", index, name, reason),
            StitchError::ImageDecode { name, source } => {
                write!(f, "failed to decode '{}': {}", name, source)
            }
            StitchError::DimensionMismatch {
                name,
                planned,
                actual,
            } => write!(
                f,
                "dimensions of '{}' changed between planning and rendering: planned {}x{}, decoded {}x{}",
                name, planned.0, planned.1, actual.0, actual.1
            ),
            StitchError::CountMismatch { planned, actual } => write!(
                f,
                "plan expects {} images but {} were supplied",
                planned, actual
            ),
            StitchError::Config { field, reason } => {
                write!(f, "configuration error in '{}': {}", field, reason)
            }
            StitchError::Resize { name, source } => {
                write!(f, "failed to resize '{}': {}", name, source)
            }
            StitchError::ImageBuffer { name, source } => {
                write!(f, "pixel buffer error for '{}': {}", name, source)
            }
            StitchError::Encode { source } => write!(f, "JPEG encoding failed: {}", source),
            StitchError::Manifest { source } => {
                write!(f, "manifest serialization failed: {}", source)
            }
            StitchError::Io { path, source } => {
                write!(f, "I/O error on '{}': {}", path.display(), source)
            }
        }
    }
}

impl StdError for StitchError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::ImageDecode { source, .. } => Some(source),
            Self::Resize { source, .. } => Some(source),
            Self::ImageBuffer { source, .. } => Some(source),
            Self::Encode { source } => Some(source),
            Self::Manifest { source } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<PlanError> for StitchError {
    fn from(error: PlanError) -> Self {
        match error {
            PlanError::EmptyInput => Self::EmptyInput,
            PlanError::ZeroDimension { index, name } => {
                Self::invalid_image(index, name, "zero width or height")
            }
        }
    }
}

impl From<serde_json::Error> for StitchError {
    fn from(error: serde_json::Error) -> Self {
        Self::Manifest { source: error }
    }
}
