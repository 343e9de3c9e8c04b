//! The job manifest: a structured description of one layout unit for the
//! external Photoshop reconstruction script.
//!
//! The script rebuilds the page as editable layers from `layout.width`,
//! `layout.total_height`, and each entry's `relative_file_path`,
//! `layer_name`, and `y`. Those field names and the invariant that the `y`
//! values exactly match the pixel offsets used for the flattened JPEG are
//! load-bearing — the manifest is built from the same [`LayoutPlan`] the
//! compositor consumed, so the two outputs cannot drift.
//!
//! Manifests are byte-stable: identical plans serialize to identical JSON
//! (no timestamps, no map ordering surprises).

use serde::{Deserialize, Serialize};
use stitch_layout::LayoutPlan;

use crate::error::StitchResult;

/// Relative path of one re-encoded source image inside a unit package,
/// e.g. `images/image_003.jpg`. `index` is the 1-based placement index.
pub fn relative_image_path(index: usize) -> String {
    format!("images/image_{index:03}.jpg")
}

/// Symbolic layer name for the external tool, e.g. `IMAGE_003`.
pub fn layer_name(index: usize) -> String {
    format!("IMAGE_{index:03}")
}

/// One unit's manifest (`job.json`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub layout: LayoutSection,
    pub images: Vec<ImageEntry>,
    pub outputs: OutputsSection,
}

/// Canvas geometry and margin rule for one unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSection {
    pub width: u32,
    pub total_height: u32,
    pub top_margin: u32,
    pub bottom_margin: u32,
    pub gap: u32,
    /// Solid background fill as an RGB triple.
    pub background: [u8; 3],
}

/// One placed image, coordinates identical to the flattened render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub index: usize,
    pub original_filename: String,
    /// Path inside the unit package; matches the re-encoded file exactly.
    pub relative_file_path: String,
    pub layer_name: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Filenames the external script produces next to the manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputsSection {
    pub flattened_jpg: String,
    pub psd: String,
    pub jpg_from_psd: String,
}

impl Manifest {
    /// Build the manifest for one unit from its plan.
    ///
    /// `base_name` should already be sanitized; it names the flattened JPEG
    /// inside the unit package.
    pub fn from_plan(plan: &LayoutPlan, background: [u8; 3], base_name: &str) -> Self {
        Self {
            layout: LayoutSection {
                width: plan.canvas.w,
                total_height: plan.canvas.h,
                top_margin: plan.top_margin,
                bottom_margin: plan.bottom_margin,
                gap: plan.gap,
                background,
            },
            images: plan
                .placements
                .iter()
                .map(|p| ImageEntry {
                    index: p.index,
                    original_filename: p.name.clone(),
                    relative_file_path: relative_image_path(p.index),
                    layer_name: layer_name(p.index),
                    x: p.x,
                    y: p.y,
                    width: p.width,
                    height: p.height,
                })
                .collect(),
            outputs: OutputsSection {
                flattened_jpg: format!("{base_name}.jpg"),
                psd: "output.psd".to_string(),
                jpg_from_psd: "output.jpg".to_string(),
            },
        }
    }

    /// Pretty-printed JSON bytes, stable for identical plans.
    pub fn to_json_bytes(&self) -> StitchResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use stitch_layout::{plan, LayoutParams, Size, SourceDims, WidthMode};

    use super::*;

    fn sample_plan() -> LayoutPlan {
        let sources = vec![
            SourceDims::new("front.jpg", Size::new(1200, 800)),
            SourceDims::new("back.png", Size::new(600, 900)),
        ];
        let params = LayoutParams {
            width_mode: WidthMode::Fixed(900),
            top_margin: 100,
            gap: 50,
            bottom_margin: 100,
            max_per_unit: None,
        };
        plan(&sources, &params).unwrap().remove(0)
    }

    #[test]
    fn manifest_mirrors_plan_coordinates() {
        let p = sample_plan();
        let m = Manifest::from_plan(&p, [255, 255, 255], "detail_page");
        assert_eq!(m.layout.width, 900);
        assert_eq!(m.layout.total_height, 2200);
        assert_eq!(m.images.len(), 2);
        for (entry, placement) in m.images.iter().zip(&p.placements) {
            assert_eq!(entry.y, placement.y);
            assert_eq!(entry.x, placement.x);
            assert_eq!(entry.width, placement.width);
            assert_eq!(entry.height, placement.height);
        }
        assert_eq!(m.images[0].relative_file_path, "images/image_001.jpg");
        assert_eq!(m.images[1].layer_name, "IMAGE_002");
        assert_eq!(m.outputs.flattened_jpg, "detail_page.jpg");
    }

    #[test]
    fn serialization_is_byte_stable() {
        let p = sample_plan();
        let a = Manifest::from_plan(&p, [255, 255, 255], "x").to_json_bytes().unwrap();
        let b = Manifest::from_plan(&p, [255, 255, 255], "x").to_json_bytes().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn json_field_names_match_the_reconstruction_contract() {
        let p = sample_plan();
        let m = Manifest::from_plan(&p, [255, 255, 255], "x");
        let value: serde_json::Value = serde_json::from_slice(&m.to_json_bytes().unwrap()).unwrap();
        assert!(value["layout"]["total_height"].is_u64());
        assert!(value["layout"]["background"].is_array());
        assert_eq!(
            value["images"][0]["relative_file_path"],
            "images/image_001.jpg"
        );
        assert!(value["images"][0]["layer_name"].is_string());
        assert!(value["images"][0]["y"].is_u64());
    }
}
