use crate::foundation::core::{Canvas, Raster};
use crate::foundation::error::{ThumbError, ThumbResult};

/// Resampling filter used when scaling backgrounds and cutouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    /// Nearest neighbour.
    Nearest,
    /// Linear.
    Triangle,
    /// Cubic.
    #[default]
    CatmullRom,
    /// Lanczos with window 3.
    Lanczos3,
}

impl ResizeFilter {
    fn filter_type(self) -> image::imageops::FilterType {
        use image::imageops::FilterType;
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Resample `raster` to exactly `width`x`height`.
pub fn resize_exact(
    raster: &Raster,
    width: u32,
    height: u32,
    filter: ResizeFilter,
) -> ThumbResult<Raster> {
    if width == 0 || height == 0 {
        return Err(ThumbError::geometry(format!(
            "cannot resize to {width}x{height}"
        )));
    }
    if raster.width() == width && raster.height() == height {
        return Ok(raster.clone());
    }

    let img = raster.to_premul_image()?;
    let mut resized = image::imageops::resize(&img, width, height, filter.filter_type());
    // Negative filter lobes can push color past coverage.
    for px in resized.pixels_mut() {
        let a = px.0[3];
        for c in &mut px.0[..3] {
            *c = (*c).min(a);
        }
    }
    Raster::from_premul_image(resized)
}

/// Scale `raster` to cover `canvas`, center-crop the overflow and flatten to opaque.
///
/// Aspect ratio is preserved; a raster already at canvas size is only flattened.
pub fn cover_fit(raster: &Raster, canvas: Canvas, filter: ResizeFilter) -> ThumbResult<Raster> {
    let canvas = Canvas::new(canvas.width, canvas.height)?;
    if raster.size() == canvas {
        return Ok(raster.opaque());
    }

    let sw = f64::from(raster.width());
    let sh = f64::from(raster.height());
    let scale = (f64::from(canvas.width) / sw).max(f64::from(canvas.height) / sh);
    let scaled_w = ((sw * scale).ceil() as u32).max(canvas.width);
    let scaled_h = ((sh * scale).ceil() as u32).max(canvas.height);

    let scaled = resize_exact(raster, scaled_w, scaled_h, filter)?;
    let x = (scaled_w - canvas.width) / 2;
    let y = (scaled_h - canvas.height) / 2;
    tracing::debug!(scaled_w, scaled_h, x, y, "cover fit");

    let img = scaled.to_premul_image()?;
    let cropped = image::imageops::crop_imm(&img, x, y, canvas.width, canvas.height).to_image();
    Ok(Raster::from_premul_image(cropped)?.opaque())
}

#[cfg(test)]
#[path = "../../tests/unit/render/fit.rs"]
mod tests;
