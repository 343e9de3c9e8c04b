//! Canvas compositor: scale normalized images per the plan, paste them onto
//! a background-filled canvas, and encode the result as JPEG.
//!
//! Scaling runs through fast_image_resize with a Lanczos3 convolution
//! filter. Placements occupy disjoint vertical bands by construction, so
//! pasting is a plain row copy — later images never blend with earlier ones.

use fast_image_resize as fir;
use fir::images::{TypedImage, TypedImageRef};
use fir::pixels::U8x3;
use fir::{ResizeOptions, Resizer};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, Rgb, RgbImage};
use stitch_layout::{LayoutPlan, Placement};

use crate::error::{StitchError, StitchResult};
use crate::source::LoadedImage;

/// Fixed high-quality JPEG setting used for the flattened page and the
/// per-image re-encodes.
pub const JPEG_QUALITY: u8 = 95;

/// Scale one normalized image to its planned placement size.
///
/// Verifies first that the decoded geometry matches what the planner was
/// told ([`StitchError::DimensionMismatch`] otherwise — planning and
/// rendering must see identical dimensions). Identity sizes skip the
/// resampler entirely.
pub fn scale_to_placement(
    resizer: &mut Resizer,
    image: &LoadedImage,
    placement: &Placement,
) -> StitchResult<RgbImage> {
    let (actual_w, actual_h) = image.pixels.dimensions();
    if actual_w != placement.source.w || actual_h != placement.source.h {
        return Err(StitchError::mismatch(
            &image.name,
            (placement.source.w, placement.source.h),
            (actual_w, actual_h),
        ));
    }
    if actual_w == placement.width && actual_h == placement.height {
        return Ok(image.pixels.clone());
    }

    let src = TypedImageRef::<U8x3>::from_buffer(actual_w, actual_h, image.pixels.as_raw())
        .map_err(|e| StitchError::ImageBuffer {
            name: image.name.clone(),
            source: e,
        })?;
    let mut out = RgbImage::new(placement.width, placement.height);
    let mut dst = TypedImage::<U8x3>::from_buffer(placement.width, placement.height, &mut *out)
        .map_err(|e| StitchError::ImageBuffer {
            name: image.name.clone(),
            source: e,
        })?;

    let opts = ResizeOptions::new()
        .resize_alg(fir::ResizeAlg::Convolution(fir::FilterType::Lanczos3))
        .use_alpha(false);
    resizer
        .resize_typed::<U8x3>(&src, &mut dst, &opts)
        .map_err(|e| StitchError::Resize {
            name: image.name.clone(),
            source: e,
        })?;
    Ok(out)
}

/// Paste the scaled images onto a background-filled canvas in plan order.
///
/// `scaled` must be in placement order with matching dimensions, one raster
/// per placement; plans produced by the planner always fit their own
/// canvas, so after these checks pasting is a plain row copy.
///
/// # Errors
///
/// [`StitchError::CountMismatch`] if the raster count differs from the
/// placement count, [`StitchError::DimensionMismatch`] if any raster does
/// not match its placement or a placement falls outside the canvas.
pub fn flatten(
    plan: &LayoutPlan,
    scaled: &[RgbImage],
    background: [u8; 3],
) -> StitchResult<RgbImage> {
    if scaled.len() != plan.placements.len() {
        return Err(StitchError::CountMismatch {
            planned: plan.placements.len(),
            actual: scaled.len(),
        });
    }
    for (placement, image) in plan.placements.iter().zip(scaled) {
        let fits = u64::from(placement.x) + u64::from(placement.width)
            <= u64::from(plan.canvas.w)
            && u64::from(placement.y) + u64::from(placement.height) <= u64::from(plan.canvas.h);
        if !fits || image.dimensions() != (placement.width, placement.height) {
            return Err(StitchError::mismatch(
                &placement.name,
                (placement.width, placement.height),
                image.dimensions(),
            ));
        }
    }

    let mut canvas = RgbImage::from_pixel(plan.canvas.w, plan.canvas.h, Rgb(background));
    for (placement, image) in plan.placements.iter().zip(scaled) {
        paste(&mut canvas, image, placement.x, placement.y);
    }
    Ok(canvas)
}

/// Row-copy `image` into `canvas` at `(x, y)`, overwriting destination
/// pixels directly. Callers have already verified the image fits.
fn paste(canvas: &mut RgbImage, image: &RgbImage, x: u32, y: u32) {
    let canvas_row = canvas.width() as usize * 3;
    let (w, h) = image.dimensions();
    let row = w as usize * 3;
    let src = image.as_raw();
    let dst: &mut [u8] = &mut *canvas;
    for r in 0..h as usize {
        let off = (y as usize + r) * canvas_row + x as usize * 3;
        dst[off..off + row].copy_from_slice(&src[r * row..(r + 1) * row]);
    }
}

/// Encode an opaque RGB raster as JPEG at the given quality.
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> StitchResult<Vec<u8>> {
    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality);
    encoder
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| StitchError::Encode { source: e })?;
    Ok(out)
}

/// Render one unit: scale every image per its placement, flatten, encode.
///
/// All-or-nothing: any mismatch or resize failure aborts the whole render
/// before the canvas is produced; partial canvases are never returned.
pub fn render(
    images: &[LoadedImage],
    plan: &LayoutPlan,
    background: [u8; 3],
    quality: u8,
) -> StitchResult<Vec<u8>> {
    if images.len() != plan.placements.len() {
        return Err(StitchError::CountMismatch {
            planned: plan.placements.len(),
            actual: images.len(),
        });
    }
    let mut resizer = Resizer::new();
    let mut scaled = Vec::with_capacity(images.len());
    for (image, placement) in images.iter().zip(&plan.placements) {
        scaled.push(scale_to_placement(&mut resizer, image, placement)?);
    }
    encode_jpeg(&flatten(plan, &scaled, background)?, quality)
}
