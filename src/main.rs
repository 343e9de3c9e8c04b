use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use page_stitch::{export, generate, InputImage, StitchConfig};

/// Extensions accepted as image input; anything else is skipped at the CLI
/// boundary before the pipeline runs.
const IMAGE_EXTS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp", "tif", "tiff"];

#[derive(Parser, Debug)]
#[command(name = "stitch")]
#[command(about = "Stack images vertically into one detail-page JPEG plus a Photoshop job manifest")]
#[command(
    long_about = "Stack images vertically into one detail-page JPEG with configurable margins,
and write one package directory per unit containing the flattened page, a job.json
manifest, and re-encoded source images for the Photoshop reconstruction script."
)]
struct Args {
    /// Image files in stacking order (top to bottom)
    #[arg(required = true, help = "Image files in stacking order, top to bottom")]
    images: Vec<PathBuf>,

    /// Output directory for unit packages
    #[arg(short, long, default_value = "out", help = "Directory to write unit packages into")]
    out_dir: PathBuf,

    /// Page width in pixels (uniform-width mode)
    #[arg(short, long, default_value_t = 900,
          help = "Rescale every image to this width (ignored with --natural)")]
    width: u32,

    /// Keep each image at its natural size, centered horizontally
    #[arg(long, help = "Natural-width mode: canvas as wide as the widest image, others centered")]
    natural: bool,

    /// White margin above the first image, in pixels
    #[arg(long, default_value_t = 120, help = "Top margin in pixels")]
    top: u32,

    /// Vertical gap between adjacent images, in pixels
    #[arg(long, default_value_t = 80, help = "Gap between images in pixels")]
    gap: u32,

    /// White margin below the last image, in pixels
    #[arg(long, default_value_t = 120, help = "Bottom margin in pixels")]
    bottom: u32,

    /// Base name for output files and package directories
    #[arg(long, default_value = "detail_page",
          help = "Base name for the flattened JPEG and package directories")]
    base_name: String,

    /// Split the page into units of at most this many images
    #[arg(long, help = "Per-unit image ceiling; extra images start a new unit package")]
    max_per_unit: Option<usize>,

    /// JPEG quality for all encoded output
    #[arg(long, default_value_t = 95, help = "JPEG quality, 1-100")]
    quality: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut inputs = Vec::with_capacity(args.images.len());
    for path in &args.images {
        if !has_image_extension(path) {
            eprintln!("Skipping non-image file: {}", path.display());
            continue;
        }
        let bytes =
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        inputs.push(InputImage::new(name, bytes));
    }

    let config = StitchConfig {
        width: (!args.natural).then_some(args.width),
        top_margin: args.top,
        gap: args.gap,
        bottom_margin: args.bottom,
        quality: args.quality,
        max_per_unit: args.max_per_unit,
        base_name: args.base_name.clone(),
        ..StitchConfig::default()
    };

    let outputs = generate(&inputs, &config)?;
    let dirs = export::write_packages(&outputs, &args.out_dir, &args.base_name)?;

    for (output, dir) in outputs.iter().zip(&dirs) {
        println!(
            "Unit {}/{}: {} images, canvas {}x{} → {}",
            output.plan.unit.number,
            output.plan.unit.count,
            output.plan.placements.len(),
            output.plan.canvas.w,
            output.plan.canvas.h,
            dir.display()
        );
    }
    println!(
        "Done: {} unit package(s) under {}",
        dirs.len(),
        args.out_dir.display()
    );
    Ok(())
}

/// True if the path carries a recognized image extension (case-insensitive).
fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
