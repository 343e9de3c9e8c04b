// SPDX-License-Identifier: MIT
//! The layout planner: ordered source dimensions + parameters in, one or
//! more immutable [`LayoutPlan`]s out.

use serde::{Deserialize, Serialize};

use crate::params::{LayoutParams, Size, WidthMode};

/// Planner input: one image's identity and decoded pixel dimensions.
///
/// The planner never sees pixel data. Dimensions must be the ones the
/// rasterizer will see after normalization (i.e. post orientation
/// correction), otherwise rendering fails its dimension-mismatch guard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDims {
    pub name: String,
    pub size: Size,
}

impl SourceDims {
    pub fn new(name: impl Into<String>, size: Size) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Identifies one layout unit (chunk) within a generation request.
///
/// `number` is 1-based and `count` is the total number of units, so the
/// label is stable and globally unique within the request — the exporter
/// uses it to correlate per-unit output directories and filenames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitId {
    pub number: usize,
    pub count: usize,
}

impl UnitId {
    /// Stable label for filename correlation, e.g. `unit_02`.
    pub fn label(&self) -> String {
        format!("unit_{:02}", self.number)
    }

    /// True when chunking was inactive (the whole input is one unit).
    pub fn is_sole(&self) -> bool {
        self.count == 1
    }
}

/// One image instance after layout: scaled dimensions and canvas offsets.
///
/// `index` is 1-based and restarts at 1 within each unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub index: usize,
    pub name: String,
    /// Dimensions the planner was given, echoed back so the rasterizer can
    /// verify it decodes the same geometry.
    pub source: Size,
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

/// The fully resolved geometry of one unit: canvas size, the parameters
/// that produced it, and an ordered placement per image.
///
/// A plan is a pure derived value — recomputable from the inputs, never
/// mutated after construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub unit: UnitId,
    pub canvas: Size,
    pub top_margin: u32,
    pub gap: u32,
    pub bottom_margin: u32,
    pub placements: Vec<Placement>,
}

/// Planning failures. All terminal; the failing image's identity is carried
/// so the caller can report it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlanError {
    /// No images supplied — nothing to lay out.
    EmptyInput,
    /// An image reported a zero width or height; ratio-locked scaling is
    /// undefined for it.
    ZeroDimension { index: usize, name: String },
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanError::EmptyInput => write!(f, "no images supplied, nothing to lay out"),
            PlanError::ZeroDimension { index, name } => {
                write!(f, "image #{} '{}' has a zero dimension", index, name)
            }
        }
    }
}

impl std::error::Error for PlanError {}

/// Compute layout plans for an ordered image sequence.
///
/// Returns one plan per unit: a single-element vector when chunking is
/// inactive, otherwise one plan per consecutive chunk of at most
/// `params.max_per_unit` images (the last chunk may be smaller).
///
/// # Errors
///
/// [`PlanError::EmptyInput`] for an empty sequence;
/// [`PlanError::ZeroDimension`] if any source reports a zero width or
/// height. Both checks run before any geometry is computed.
pub fn plan(sources: &[SourceDims], params: &LayoutParams) -> Result<Vec<LayoutPlan>, PlanError> {
    if sources.is_empty() {
        return Err(PlanError::EmptyInput);
    }
    for (i, src) in sources.iter().enumerate() {
        if src.size.w == 0 || src.size.h == 0 {
            return Err(PlanError::ZeroDimension {
                index: i + 1,
                name: src.name.clone(),
            });
        }
    }

    let chunk_len = params
        .max_per_unit
        .map(|k| k.get())
        .unwrap_or(sources.len());
    let chunks: Vec<&[SourceDims]> = sources.chunks(chunk_len).collect();
    let count = chunks.len();

    Ok(chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            plan_unit(
                chunk,
                params,
                UnitId {
                    number: i + 1,
                    count,
                },
            )
        })
        .collect())
}

/// Lay out one chunk. Callers have already validated dimensions.
fn plan_unit(chunk: &[SourceDims], params: &LayoutParams, unit: UnitId) -> LayoutPlan {
    let canvas_w = match params.width_mode {
        WidthMode::Fixed(w) => w,
        // Zero-dimension sources were rejected up front, so the max is >= 1.
        WidthMode::Natural => chunk.iter().map(|s| s.size.w).max().unwrap_or(1),
    };

    let mut placements = Vec::with_capacity(chunk.len());
    let mut y = params.top_margin;
    for (i, src) in chunk.iter().enumerate() {
        if i > 0 {
            y += params.gap;
        }
        let (width, height) = match params.width_mode {
            WidthMode::Fixed(target) => (target, scaled_height(src.size, target)),
            WidthMode::Natural => (src.size.w, src.size.h),
        };
        let x = match params.width_mode {
            WidthMode::Fixed(_) => 0,
            // Floor division: the odd remainder pixel falls to the right.
            WidthMode::Natural => (canvas_w - width) / 2,
        };
        placements.push(Placement {
            index: i + 1,
            name: src.name.clone(),
            source: src.size,
            width,
            height,
            x,
            y,
        });
        y += height;
    }

    LayoutPlan {
        unit,
        canvas: Size::new(canvas_w, y + params.bottom_margin),
        top_margin: params.top_margin,
        gap: params.gap,
        bottom_margin: params.bottom_margin,
        placements,
    }
}

/// Ratio-locked height for a source rescaled to `target_w`:
/// `round(h * target_w / w)`, half rounds up, clamped to at least 1px.
fn scaled_height(src: Size, target_w: u32) -> u32 {
    if src.w == target_w {
        return src.h;
    }
    let scale = f64::from(target_w) / f64::from(src.w);
    ((f64::from(src.h) * scale).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    fn src(name: &str, w: u32, h: u32) -> SourceDims {
        SourceDims::new(name, Size::new(w, h))
    }

    fn fixed(width: u32, top: u32, gap: u32, bottom: u32) -> LayoutParams {
        LayoutParams {
            width_mode: WidthMode::Fixed(width),
            top_margin: top,
            gap,
            bottom_margin: bottom,
            max_per_unit: None,
        }
    }

    /// 1200×800 and 600×900 at width 900 → heights 600 and 1350,
    /// canvas 900×2200, y offsets 100 and 750.
    #[test]
    fn worked_example_two_images() {
        let sources = vec![src("a.jpg", 1200, 800), src("b.png", 600, 900)];
        let plans = plan(&sources, &fixed(900, 100, 50, 100)).unwrap();
        assert_eq!(plans.len(), 1);
        let p = &plans[0];
        assert_eq!(p.canvas, Size::new(900, 2200));
        assert_eq!(p.placements[0].height, 600);
        assert_eq!(p.placements[1].height, 1350);
        assert_eq!(p.placements[0].y, 100);
        assert_eq!(p.placements[1].y, 750);
        assert!(p.placements.iter().all(|pl| pl.width == 900 && pl.x == 0));
    }

    #[test]
    fn height_formula_holds() {
        let sources = vec![
            src("a", 800, 600),
            src("b", 1024, 768),
            src("c", 300, 1000),
        ];
        let params = fixed(900, 120, 80, 120);
        let p = &plan(&sources, &params).unwrap()[0];
        let sum: u32 = p.placements.iter().map(|pl| pl.height).sum();
        let n = p.placements.len() as u32;
        assert_eq!(p.canvas.h, 120 + 120 + sum + 80 * (n - 1));
    }

    #[test]
    fn placements_are_adjacent_and_inside_canvas() {
        let sources = vec![src("a", 640, 480), src("b", 640, 480), src("c", 200, 900)];
        let p = &plan(&sources, &fixed(900, 50, 30, 50)).unwrap()[0];
        assert_eq!(p.placements[0].y, 50);
        for pair in p.placements.windows(2) {
            assert_eq!(pair[0].y + pair[0].height + p.gap, pair[1].y);
        }
        for pl in &p.placements {
            assert!(pl.y + pl.height <= p.canvas.h);
            assert!(pl.x + pl.width <= p.canvas.w);
        }
    }

    #[test]
    fn single_image_has_no_gap_contribution() {
        let p = &plan(&[src("only", 900, 500)], &fixed(900, 120, 80, 120)).unwrap()[0];
        assert_eq!(p.canvas.h, 120 + 500 + 120);
        assert_eq!(p.placements[0].y, 120);
    }

    #[test]
    fn natural_mode_centers_and_uses_max_width() {
        let sources = vec![src("wide", 1000, 400), src("narrow", 301, 200)];
        let params = LayoutParams {
            width_mode: WidthMode::Natural,
            ..fixed(0, 10, 10, 10)
        };
        let p = &plan(&sources, &params).unwrap()[0];
        assert_eq!(p.canvas.w, 1000);
        assert_eq!(p.placements[0].x, 0);
        // (1000 - 301) / 2 floors to 349; the spare pixel sits on the right.
        assert_eq!(p.placements[1].x, 349);
        // Sizes are untouched in natural mode.
        assert_eq!(p.placements[1].width, 301);
        assert_eq!(p.placements[1].height, 200);
    }

    #[test]
    fn scaled_height_rounds_half_up_and_clamps() {
        // 3 * 900 / 1800 = 1.5 → 2
        assert_eq!(scaled_height(Size::new(1800, 3), 900), 2);
        // 1 * 900 / 10000 = 0.09 → clamped to 1
        assert_eq!(scaled_height(Size::new(10_000, 1), 900), 1);
        // Same width short-circuits.
        assert_eq!(scaled_height(Size::new(900, 777), 900), 777);
    }

    #[test]
    fn chunking_splits_fourteen_into_six_six_two() {
        let sources: Vec<SourceDims> = (0..14)
            .map(|i| src(&format!("img{i:02}.jpg"), 800, 600))
            .collect();
        let params = LayoutParams {
            max_per_unit: NonZeroUsize::new(6),
            ..fixed(900, 100, 40, 100)
        };
        let plans = plan(&sources, &params).unwrap();
        let sizes: Vec<usize> = plans.iter().map(|p| p.placements.len()).collect();
        assert_eq!(sizes, vec![6, 6, 2]);
        for (i, p) in plans.iter().enumerate() {
            assert_eq!(p.unit.number, i + 1);
            assert_eq!(p.unit.count, 3);
            // Indices restart at 1 per unit.
            assert_eq!(p.placements[0].index, 1);
            let sum: u32 = p.placements.iter().map(|pl| pl.height).sum();
            let n = p.placements.len() as u32;
            assert_eq!(p.canvas.h, 100 + 100 + sum + 40 * (n - 1));
        }
        assert_eq!(plans[0].unit.label(), "unit_01");
        assert!(!plans[0].unit.is_sole());
    }

    #[test]
    fn chunking_inactive_below_ceiling() {
        let sources = vec![src("a", 800, 600), src("b", 800, 600)];
        let params = LayoutParams {
            max_per_unit: NonZeroUsize::new(6),
            ..fixed(900, 100, 40, 100)
        };
        let plans = plan(&sources, &params).unwrap();
        assert_eq!(plans.len(), 1);
        assert!(plans[0].unit.is_sole());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(
            plan(&[], &LayoutParams::default()),
            Err(PlanError::EmptyInput)
        );
    }

    #[test]
    fn zero_width_is_rejected_before_planning() {
        let sources = vec![src("ok.jpg", 800, 600), src("bad.jpg", 0, 600)];
        assert_eq!(
            plan(&sources, &LayoutParams::default()),
            Err(PlanError::ZeroDimension {
                index: 2,
                name: "bad.jpg".to_string()
            })
        );
    }

    #[test]
    fn planning_is_deterministic() {
        let sources = vec![src("a", 1234, 567), src("b", 89, 1011)];
        let params = fixed(900, 120, 80, 120);
        assert_eq!(plan(&sources, &params), plan(&sources, &params));
    }
}
