// SPDX-License-Identifier: MIT
//! # stitch-layout: Vertical Stack Layout Planning
//!
//! Pure geometry for stacking an ordered sequence of images into one tall
//! page: per-image scaled dimensions, vertical offsets, and the overall
//! canvas size. No pixel data enters this crate — callers hand in decoded
//! dimensions and get back an immutable [`plan::LayoutPlan`] that both the
//! rasterizer and the manifest exporter consume, which is what keeps the
//! flattened bitmap and the structured description in exact agreement.
//!
//! ## Layout rules
//!
//! - `canvas_height = top_margin + bottom_margin + Σ scaled_heights + gap × (n − 1)`
//! - `placements[0].y = top_margin`; each later image sits `gap` pixels below
//!   the previous one. Bands never overlap and never leave the canvas.
//! - **Uniform-width mode** ([`params::WidthMode::Fixed`]): every image is
//!   rescaled so its width equals the canvas width, height ratio-locked.
//! - **Natural-width mode** ([`params::WidthMode::Natural`]): the canvas is
//!   as wide as the widest source and narrower images are centered.
//!
//! ## Determinism
//!
//! [`plan::plan`] is a pure function: identical inputs and parameters yield
//! identical plans, down to every coordinate. There is no hidden state and
//! no randomness.

pub mod params;
pub mod plan;

pub use params::{LayoutParams, Size, WidthMode};
pub use plan::{plan, LayoutPlan, Placement, PlanError, SourceDims, UnitId};
