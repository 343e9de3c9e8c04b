//! Decoding and normalization of user-submitted images.
//!
//! Every source is normalized before it ever reaches the compositor:
//! orientation metadata is applied, multi-frame assets contribute only their
//! first frame, and transparency is flattened onto the opaque background
//! color with a standard "over" blend. The result is always opaque RGB,
//! because the final encoding is JPEG and has no alpha channel.

use std::io::Cursor;

use image::{metadata::Orientation, DynamicImage, ImageDecoder, ImageReader, RgbImage};
use stitch_layout::{Size, SourceDims};

use crate::error::{StitchError, StitchResult};

/// One user-submitted asset: identity plus raw encoded bytes. Owned by the
/// caller; the pipeline only reads it.
#[derive(Clone, Debug)]
pub struct InputImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputImage {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// A decoded, orientation-corrected, alpha-flattened image. Immutable once
/// built; consumed by the planner (dimensions) and the compositor (pixels).
#[derive(Clone, Debug)]
pub struct LoadedImage {
    pub name: String,
    pub pixels: RgbImage,
}

impl LoadedImage {
    /// Decode and normalize one input.
    ///
    /// The format is sniffed from the bytes (the filename extension is not
    /// trusted). GIF and other multi-frame formats decode to their first
    /// frame. Orientation metadata, when present and readable, is applied so
    /// the planner and the rasterizer agree on display geometry.
    ///
    /// # Errors
    ///
    /// [`StitchError::ImageDecode`] carrying the image name if the data is
    /// empty, unrecognized, or corrupt.
    pub fn decode(input: &InputImage, background: [u8; 3]) -> StitchResult<Self> {
        let reader = ImageReader::new(Cursor::new(&input.bytes))
            .with_guessed_format()
            .map_err(|e| StitchError::decode(&input.name, image::ImageError::IoError(e)))?;
        let mut decoder = reader
            .into_decoder()
            .map_err(|e| StitchError::decode(&input.name, e))?;
        // A missing or unreadable EXIF block is not an error; the pixels are
        // already in display orientation then.
        let orientation = decoder
            .orientation()
            .unwrap_or(Orientation::NoTransforms);
        let mut image = DynamicImage::from_decoder(decoder)
            .map_err(|e| StitchError::decode(&input.name, e))?;
        image.apply_orientation(orientation);

        Ok(Self {
            name: input.name.clone(),
            pixels: flatten_alpha(image, background),
        })
    }

    /// Post-normalization dimensions, as the planner must see them.
    pub fn size(&self) -> Size {
        let (w, h) = self.pixels.dimensions();
        Size::new(w, h)
    }

    /// Planner input record for this image.
    pub fn dims(&self) -> SourceDims {
        SourceDims::new(self.name.clone(), self.size())
    }
}

/// Convert to opaque RGB, compositing any alpha channel over `background`
/// with the standard "over" blend (full-opacity background).
fn flatten_alpha(image: DynamicImage, background: [u8; 3]) -> RgbImage {
    if !image.color().has_alpha() {
        return image.into_rgb8();
    }
    let rgba = image.into_rgba8();
    let (w, h) = rgba.dimensions();
    let mut out = RgbImage::new(w, h);
    for (src, dst) in rgba.pixels().zip(out.pixels_mut()) {
        let a = u32::from(src[3]);
        for c in 0..3 {
            let blended = u32::from(src[c]) * a + u32::from(background[c]) * (255 - a);
            // +127 rounds the /255 to nearest.
            dst[c] = ((blended + 127) / 255) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use image::codecs::gif::GifEncoder;
    use image::codecs::jpeg::JpegEncoder;
    use image::{ExtendedColorType, Frame, Rgb, Rgba, RgbaImage};

    use super::*;

    fn jpeg_with_orientation(w: u32, h: u32, orientation: u16) -> Vec<u8> {
        let mut jpeg = Vec::new();
        let image = RgbImage::from_pixel(w, h, Rgb([90, 90, 90]));
        JpegEncoder::new_with_quality(&mut jpeg, 95)
            .encode(image.as_raw(), w, h, ExtendedColorType::Rgb8)
            .unwrap();

        // Minimal little-endian TIFF block holding only the orientation tag
        // (0x0112, SHORT, count 1).
        let mut tiff = Vec::new();
        tiff.extend_from_slice(&[0x49, 0x49, 0x2a, 0x00, 0x08, 0x00, 0x00, 0x00]);
        tiff.extend_from_slice(&[0x01, 0x00]);
        tiff.extend_from_slice(&[0x12, 0x01, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00]);
        tiff.extend_from_slice(&orientation.to_le_bytes());
        tiff.extend_from_slice(&[0x00, 0x00]);
        tiff.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        let mut app1 = Vec::from(&b"Exif\0\0"[..]);
        app1.extend_from_slice(&tiff);

        // Splice the EXIF APP1 segment directly after SOI.
        let mut out = Vec::with_capacity(jpeg.len() + app1.len() + 4);
        out.extend_from_slice(&jpeg[..2]);
        out.extend_from_slice(&[0xff, 0xe1]);
        out.extend_from_slice(&((app1.len() + 2) as u16).to_be_bytes());
        out.extend_from_slice(&app1);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn exif_rotation_transposes_decoded_dimensions() {
        // Orientation 6: stored sideways, rotate 90° clockwise to display.
        let rotated = InputImage::new("rotated.jpg", jpeg_with_orientation(40, 16, 6));
        let loaded = LoadedImage::decode(&rotated, [255, 255, 255]).unwrap();
        assert_eq!(loaded.pixels.dimensions(), (16, 40));

        // Orientation 1 leaves the stored geometry untouched.
        let upright = InputImage::new("upright.jpg", jpeg_with_orientation(40, 16, 1));
        let loaded = LoadedImage::decode(&upright, [255, 255, 255]).unwrap();
        assert_eq!(loaded.pixels.dimensions(), (40, 16));
    }

    #[test]
    fn multi_frame_gif_uses_first_frame() {
        let mut bytes = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut bytes);
            encoder
                .encode_frames([
                    Frame::new(RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]))),
                    Frame::new(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 255, 255]))),
                ])
                .unwrap();
        }
        let input = InputImage::new("anim.gif", bytes);
        let loaded = LoadedImage::decode(&input, [255, 255, 255]).unwrap();
        assert_eq!(loaded.pixels.dimensions(), (8, 8));
        let px = loaded.pixels.get_pixel(4, 4).0;
        assert!(px[0] > 200 && px[2] < 50, "expected first-frame red, got {px:?}");
    }

    #[test]
    fn fully_transparent_flattens_to_background() {
        let rgba = RgbaImage::from_pixel(100, 100, Rgba([12, 34, 56, 0]));
        let flat = flatten_alpha(DynamicImage::ImageRgba8(rgba), [255, 255, 255]);
        assert_eq!(flat.dimensions(), (100, 100));
        assert!(flat.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn opaque_alpha_keeps_source_colors() {
        let rgba = RgbaImage::from_pixel(4, 4, Rgba([12, 34, 56, 255]));
        let flat = flatten_alpha(DynamicImage::ImageRgba8(rgba), [255, 255, 255]);
        assert!(flat.pixels().all(|p| p.0 == [12, 34, 56]));
    }

    #[test]
    fn half_transparent_blends_over_background() {
        let rgba = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128]));
        let flat = flatten_alpha(DynamicImage::ImageRgba8(rgba), [255, 255, 255]);
        // 0*128 + 255*127 = 32385; (32385 + 127) / 255 = 127 (rounded).
        assert_eq!(flat.get_pixel(0, 0).0, [127, 127, 127]);
    }

    #[test]
    fn undecodable_bytes_report_the_image_name() {
        let input = InputImage::new("garbage.jpg", vec![0x00, 0x01, 0x02]);
        let err = LoadedImage::decode(&input, [255, 255, 255]).unwrap_err();
        assert!(err.to_string().contains("garbage.jpg"));
    }
}
