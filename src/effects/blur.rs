use rayon::prelude::*;

use crate::foundation::core::Raster;
use crate::foundation::error::{ThumbError, ThumbResult};

/// Smallest blur magnitude the synthesizers apply; smaller requests are raised to it.
pub const MIN_BLUR_RADIUS: f32 = 0.3;
/// Lower bound of the background softening radius.
pub const SOFTEN_MIN_RADIUS: f32 = 8.0;
/// Upper bound of the background softening radius.
pub const SOFTEN_MAX_RADIUS: f32 = 15.0;

/// Kernel parameters derived from a pixel radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlurSpec {
    /// Kernel half-width in pixels.
    pub radius_px: u32,
    /// Gaussian standard deviation.
    pub sigma: f32,
}

impl BlurSpec {
    /// Kernel for a blur radius: half-width `ceil(r)`, sigma `r / 2`.
    ///
    /// Radii below [`MIN_BLUR_RADIUS`] (or non-finite) are raised to it.
    pub fn from_radius(radius: f32) -> Self {
        let r = if radius.is_finite() {
            radius.max(MIN_BLUR_RADIUS)
        } else {
            MIN_BLUR_RADIUS
        };
        Self {
            radius_px: r.ceil() as u32,
            sigma: r / 2.0,
        }
    }
}

/// Effective softening radius: clamped to `[8, 15]`, never rejected.
pub fn soften_radius(radius: f32) -> f32 {
    if radius.is_nan() {
        return SOFTEN_MIN_RADIUS;
    }
    radius.clamp(SOFTEN_MIN_RADIUS, SOFTEN_MAX_RADIUS)
}

/// Gaussian-blur a raster; output has the input's dimensions.
pub fn gaussian_blur(raster: &Raster, radius: f32) -> ThumbResult<Raster> {
    let spec = BlurSpec::from_radius(radius);
    let out = blur_rgba8_premul(
        raster.data(),
        raster.width(),
        raster.height(),
        spec.radius_px,
        spec.sigma,
    )?;
    Ok(raster.with_data(out))
}

/// Softening filter for backgrounds: [`gaussian_blur`] at the clamped [`soften_radius`].
pub fn soften(raster: &Raster, radius: f32) -> ThumbResult<Raster> {
    let effective = soften_radius(radius);
    tracing::debug!(requested = radius, effective, "soften background");
    gaussian_blur(raster, effective)
}

pub(crate) fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> ThumbResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| ThumbError::effect("blur buffer size overflow"))?;
    if src.len() != expected_len || expected_len == 0 {
        return Err(ThumbError::effect(
            "blur expects a non-empty src matching width*height*4",
        ));
    }
    if radius == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ThumbResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ThumbError::effect("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(ThumbError::effect("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let row_len = (width as usize) * 4;
    dst.par_chunks_exact_mut(row_len)
        .zip(src.par_chunks_exact(row_len))
        .for_each(|(dst_row, src_row)| {
            for x in 0..w {
                let mut acc = [0u64; 4];
                for (ki, &kw) in k.iter().enumerate() {
                    let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                    let idx = (sx as usize) * 4;
                    for c in 0..4 {
                        acc[c] += u64::from(kw) * u64::from(src_row[idx + c]);
                    }
                }
                let out_idx = (x as usize) * 4;
                for c in 0..4 {
                    dst_row[out_idx + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let h = height as i32;
    let row_len = (width as usize) * 4;
    dst.par_chunks_exact_mut(row_len)
        .enumerate()
        .for_each(|(y, dst_row)| {
            for x in 0..row_len {
                let mut acc = 0u64;
                for (ki, &kw) in k.iter().enumerate() {
                    let sy = (y as i32 + ki as i32 - radius).clamp(0, h - 1);
                    acc += u64::from(kw) * u64::from(src[(sy as usize) * row_len + x]);
                }
                dst_row[x] = q16_to_u8(acc);
            }
        });
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
