//! On-disk package writer.
//!
//! The external reconstruction script expects one directory per unit
//! containing the manifest, the flattened JPEG, and an `images/`
//! subdirectory whose filenames match the manifest's `relative_file_path`
//! values exactly:
//!
//! ```text
//! <out_dir>/<base>/              single unit, or <base>_unit_NN/ when chunked
//!   <base>.jpg
//!   job.json
//!   images/image_001.jpg
//!   images/image_002.jpg
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{StitchError, StitchResult};
use crate::UnitOutput;

/// Fallback base name when sanitization leaves nothing usable.
pub const DEFAULT_BASE_NAME: &str = "detail_page";

/// Normalize a user-supplied base name into something every filesystem and
/// the scripting host accept: spaces become underscores, only alphanumerics
/// and `_-.()[]` survive, length capped at 80.
pub fn sanitize_base_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '(' | ')' | '[' | ']'))
        .take(80)
        .collect();
    if cleaned.is_empty() {
        DEFAULT_BASE_NAME.to_string()
    } else {
        cleaned
    }
}

/// Write one package directory per unit; returns the created directories in
/// unit order.
///
/// A single unit writes to `<out_dir>/<base>/`; multiple units get a
/// `_unit_NN` suffix from the unit label so packages never collide.
pub fn write_packages(
    outputs: &[UnitOutput],
    out_dir: &Path,
    base_name: &str,
) -> StitchResult<Vec<PathBuf>> {
    let base = sanitize_base_name(base_name);
    let mut dirs = Vec::with_capacity(outputs.len());
    for output in outputs {
        let dir = if output.plan.unit.is_sole() {
            out_dir.join(&base)
        } else {
            out_dir.join(format!("{base}_{}", output.plan.unit.label()))
        };
        let images_dir = dir.join("images");
        fs::create_dir_all(&images_dir).map_err(|e| StitchError::io(&images_dir, e))?;

        let jpg_path = dir.join(format!("{base}.jpg"));
        fs::write(&jpg_path, &output.flattened_jpg).map_err(|e| StitchError::io(&jpg_path, e))?;

        let manifest_path = dir.join("job.json");
        fs::write(&manifest_path, output.manifest.to_json_bytes()?)
            .map_err(|e| StitchError::io(&manifest_path, e))?;

        for image in &output.images {
            let path = dir.join(&image.relative_path);
            fs::write(&path, &image.jpeg).map_err(|e| StitchError::io(&path, e))?;
        }
        dirs.push(dir);
    }
    Ok(dirs)
}
