//! # page_stitch
//!
//! Stacks an ordered sequence of images into one tall detail-page JPEG and
//! emits, per layout unit, a structured job manifest so an external
//! Photoshop script can rebuild the identical arrangement as editable
//! layers.
//!
//! The pipeline is one-directional and request-scoped: raw images →
//! normalize → plan → rasterize/manifest. The caller hands in a fresh
//! ordered snapshot each call; nothing is kept across invocations.
//!
//! - `source`: decoding and normalization (orientation, first frame, alpha
//!   flattening)
//! - `compose`: scaling, canvas pasting, JPEG encoding
//! - `manifest`: the job.json contract for the reconstruction script
//! - `export`: one package directory per unit on disk
//! - `config`: validated front-end parameters
//!
//! Layout geometry itself lives in the `stitch_layout` crate; both the
//! rasterizer and the manifest read the same immutable plan, which is what
//! guarantees the bitmap and the description agree pixel-for-pixel.
//!
//! ## Example
//!
//! ```rust,no_run
//! use page_stitch::{generate, InputImage, StitchConfig};
//!
//! # fn run() -> Result<(), page_stitch::StitchError> {
//! let inputs = vec![
//!     InputImage::new("front.jpg", std::fs::read("front.jpg").unwrap()),
//!     InputImage::new("back.jpg", std::fs::read("back.jpg").unwrap()),
//! ];
//! let outputs = generate(&inputs, &StitchConfig::default())?;
//! page_stitch::export::write_packages(&outputs, "out".as_ref(), "detail_page")?;
//! # Ok(())
//! # }
//! ```

use fast_image_resize::Resizer;

pub mod compose;
pub mod config;
pub mod error;
pub mod export;
pub mod manifest;
pub mod source;

pub use config::StitchConfig;
pub use error::{StitchError, StitchResult};
pub use manifest::Manifest;
pub use source::{InputImage, LoadedImage};
pub use stitch_layout::{LayoutParams, LayoutPlan, Placement, Size, UnitId, WidthMode};

/// One re-encoded source image destined for a unit package.
#[derive(Clone, Debug)]
pub struct PackagedImage {
    /// Path inside the unit directory, identical to the manifest's
    /// `relative_file_path` for this image.
    pub relative_path: String,
    pub jpeg: Vec<u8>,
}

/// Everything produced for one layout unit.
#[derive(Clone, Debug)]
pub struct UnitOutput {
    pub plan: LayoutPlan,
    pub manifest: Manifest,
    pub flattened_jpg: Vec<u8>,
    pub images: Vec<PackagedImage>,
}

/// Run the full pipeline: normalize every input, plan the layout, and
/// produce per-unit renders, manifests, and package images.
///
/// Each image is scaled exactly once; the same raster feeds both the
/// flattened canvas and the package re-encode, so the manifest geometry and
/// both raster outputs always agree.
///
/// All-or-nothing across the whole batch: a corrupt image in any unit means
/// no output at all (decoding and planning complete before any unit
/// renders).
///
/// # Errors
///
/// See [`StitchError`]; the failing image's identity is carried where one
/// exists.
pub fn generate(inputs: &[InputImage], config: &StitchConfig) -> StitchResult<Vec<UnitOutput>> {
    config.validate()?;
    if inputs.is_empty() {
        return Err(StitchError::EmptyInput);
    }

    let loaded: Vec<LoadedImage> = inputs
        .iter()
        .map(|input| LoadedImage::decode(input, config.background))
        .collect::<StitchResult<_>>()?;
    let dims: Vec<_> = loaded.iter().map(LoadedImage::dims).collect();
    let plans = stitch_layout::plan(&dims, &config.layout_params())?;

    let base = export::sanitize_base_name(&config.base_name);
    let mut resizer = Resizer::new();
    let mut outputs = Vec::with_capacity(plans.len());
    let mut offset = 0;
    for plan in plans {
        let unit_images = &loaded[offset..offset + plan.placements.len()];
        offset += plan.placements.len();

        let mut scaled = Vec::with_capacity(unit_images.len());
        for (image, placement) in unit_images.iter().zip(&plan.placements) {
            scaled.push(compose::scale_to_placement(&mut resizer, image, placement)?);
        }

        let canvas = compose::flatten(&plan, &scaled, config.background)?;
        let flattened_jpg = compose::encode_jpeg(&canvas, config.quality)?;
        let images = scaled
            .iter()
            .zip(&plan.placements)
            .map(|(image, placement)| {
                Ok(PackagedImage {
                    relative_path: manifest::relative_image_path(placement.index),
                    jpeg: compose::encode_jpeg(image, config.quality)?,
                })
            })
            .collect::<StitchResult<Vec<_>>>()?;
        let manifest = Manifest::from_plan(&plan, config.background, &base);

        outputs.push(UnitOutput {
            plan,
            manifest,
            flattened_jpg,
            images,
        });
    }
    Ok(outputs)
}
