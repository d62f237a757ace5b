//! Radial edge darkening.
//!
//! The mask is black with an alpha ramp: fully transparent inside 60% of the gradient radius,
//! rising linearly to the edge alpha at the radius, and held there beyond it. The radius is 0.7
//! of the canvas width horizontally and 0.7 of the canvas height vertically.

use rayon::prelude::*;

use crate::effects::composite::{Layer, LayerStack, composite};
use crate::foundation::core::{Canvas, Raster};
use crate::foundation::error::ThumbResult;
use crate::foundation::math::unit_to_u8;
use crate::layout::placement::PlacementIntent;

/// Accepted edge-opacity range; inputs outside are clamped.
pub const VIGNETTE_OPACITY_RANGE: (f32, f32) = (0.20, 0.30);
/// Gradient radius relative to the canvas size.
pub const VIGNETTE_RADIUS: f64 = 0.7;
/// Fraction of the radius left untouched.
pub const VIGNETTE_INNER_STOP: f64 = 0.6;

/// Effective edge opacity after clamping.
pub fn vignette_opacity(opacity: f32) -> f32 {
    let (lo, hi) = VIGNETTE_OPACITY_RANGE;
    if opacity.is_nan() {
        return lo;
    }
    opacity.clamp(lo, hi)
}

/// 8-bit edge alpha for a requested opacity (`round(clamped * 255)`).
pub fn vignette_alpha(opacity: f32) -> u8 {
    unit_to_u8(vignette_opacity(opacity))
}

/// Build the vignette mask for `canvas`, centered per `intent`.
pub fn generate_vignette(
    canvas: Canvas,
    intent: PlacementIntent,
    opacity: f32,
) -> ThumbResult<Raster> {
    let canvas = Canvas::new(canvas.width, canvas.height)?;
    let edge_alpha = f64::from(vignette_alpha(opacity));
    let center = intent.vignette_center();
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    let row_len = (canvas.width as usize) * 4;

    let mut data = vec![0u8; canvas.byte_len()?];
    data.par_chunks_exact_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let dy = ((y as f64 + 0.5) / h - center.y) / VIGNETTE_RADIUS;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let dx = ((x as f64 + 0.5) / w - center.x) / VIGNETTE_RADIUS;
                let d = dx.hypot(dy);
                let t = ((d - VIGNETTE_INNER_STOP) / (1.0 - VIGNETTE_INNER_STOP)).clamp(0.0, 1.0);
                px[3] = (edge_alpha * t).round() as u8;
            }
        });

    Raster::from_premul_rgba8(canvas.width, canvas.height, data)
}

/// Darken `base` with a vignette matching its size.
pub fn apply_vignette(base: &Raster, intent: PlacementIntent, opacity: f32) -> ThumbResult<Raster> {
    let mask = generate_vignette(base.size(), intent, opacity)?;
    let mut stack = LayerStack::new();
    stack.push(Layer::new(mask, 0, 0));
    composite(base, &stack)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/vignette.rs"]
mod tests;
