use std::sync::Arc;

use crate::foundation::error::{ThumbError, ThumbResult};
use crate::foundation::math::{
    Fnv1a64, mul_div255_u8, premultiply_rgba8_in_place, unit_to_u8, unpremultiply_rgba8_in_place,
};

pub use kurbo::Point;

/// Output frame size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The standard thumbnail frame (1280x720).
    pub const STANDARD: Canvas = Canvas {
        width: 1280,
        height: 720,
    };

    /// Build a canvas, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> ThumbResult<Self> {
        if width == 0 || height == 0 {
            return Err(ThumbError::geometry("canvas dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub(crate) fn byte_len(self) -> ThumbResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| ThumbError::validation("raster buffer size overflow"))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Integer pixel rectangle describing where the subject was placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl BoundingBox {
    /// Exclusive right edge.
    pub fn right(self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> u32 {
        self.y + self.height
    }

    /// Whether pixel `(px, py)` lies inside the box.
    pub fn contains(self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Whether the box sits inside `canvas` with at least `margin` pixels on every side.
    pub fn is_inside(self, canvas: Canvas, margin: u32) -> bool {
        self.x >= margin
            && self.y >= margin
            && self.right() + margin <= canvas.width
            && self.bottom() + margin <= canvas.height
    }
}

/// Immutable premultiplied RGBA8 pixel buffer.
///
/// Every transform returns a new `Raster`; clones share the pixel storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Arc<Vec<u8>>,
}

impl Raster {
    /// Wrap premultiplied RGBA8 pixels.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> ThumbResult<Self> {
        if width == 0 || height == 0 {
            return Err(ThumbError::decode("raster dimensions must be > 0"));
        }
        let expected = Canvas { width, height }.byte_len()?;
        if data.len() != expected {
            return Err(ThumbError::decode(format!(
                "raster expects {expected} bytes for {width}x{height} rgba8, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data: Arc::new(data),
        })
    }

    /// Premultiply straight-alpha RGBA8 pixels into a raster.
    pub fn from_straight_rgba8(width: u32, height: u32, mut data: Vec<u8>) -> ThumbResult<Self> {
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul_rgba8(width, height, data)
    }

    /// Promote three-channel RGB8 pixels to an opaque raster.
    pub fn from_rgb8(width: u32, height: u32, rgb: &[u8]) -> ThumbResult<Self> {
        let pixels = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| ThumbError::decode("raster buffer size overflow"))?;
        if rgb.len() != pixels.saturating_mul(3) {
            return Err(ThumbError::decode(format!(
                "rgb8 raster expects {} bytes for {width}x{height}, got {}",
                pixels.saturating_mul(3),
                rgb.len()
            )));
        }
        let mut data = Vec::with_capacity(pixels * 4);
        for px in rgb.chunks_exact(3) {
            data.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        Self::from_premul_rgba8(width, height, data)
    }

    /// A raster filled with one straight-alpha color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> ThumbResult<Self> {
        let len = Canvas { width, height }.byte_len()?;
        let data = rgba.iter().copied().cycle().take(len).collect();
        Self::from_straight_rgba8(width, height, data)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size as a [`Canvas`].
    pub fn size(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.data[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Whether every pixel is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 255)
    }

    /// Straight-alpha copy for encoding.
    pub fn to_rgba_image(&self) -> ThumbResult<image::RgbaImage> {
        let mut data = self.data.as_ref().clone();
        unpremultiply_rgba8_in_place(&mut data);
        image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| ThumbError::compositing("raster buffer does not match its dimensions"))
    }

    pub(crate) fn to_premul_image(&self) -> ThumbResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.as_ref().clone())
            .ok_or_else(|| ThumbError::compositing("raster buffer does not match its dimensions"))
    }

    pub(crate) fn from_premul_image(img: image::RgbaImage) -> ThumbResult<Self> {
        let (width, height) = img.dimensions();
        Self::from_premul_rgba8(width, height, img.into_raw())
    }

    /// Flatten over opaque black.
    pub fn opaque(&self) -> Raster {
        if self.is_opaque() {
            return self.clone();
        }
        self.map_pixels(|px| [px[0], px[1], px[2], 255])
    }

    /// Mirror top-to-bottom.
    pub fn flip_vertical(&self) -> Raster {
        let row = (self.width as usize) * 4;
        let mut out = Vec::with_capacity(self.data.len());
        for chunk in self.data.chunks_exact(row).rev() {
            out.extend_from_slice(chunk);
        }
        self.with_data(out)
    }

    /// Scale color channels by `factor` (clamped to `[0, 1]`), keeping alpha.
    pub fn scale_rgb(&self, factor: f32) -> Raster {
        let f = u16::from(unit_to_u8(factor));
        self.map_pixels(|px| {
            [
                mul_div255_u8(u16::from(px[0]), f),
                mul_div255_u8(u16::from(px[1]), f),
                mul_div255_u8(u16::from(px[2]), f),
                px[3],
            ]
        })
    }

    /// Scale coverage by `factor` (clamped to `[0, 1]`).
    pub fn scale_alpha(&self, factor: f32) -> Raster {
        let f = u16::from(unit_to_u8(factor));
        self.map_pixels(|px| px.map(|c| mul_div255_u8(u16::from(c), f)))
    }

    /// Black silhouette carrying this raster's alpha.
    pub fn silhouette(&self) -> Raster {
        self.map_pixels(|px| [0, 0, 0, px[3]])
    }

    /// Surround the raster with a transparent border of `border` pixels on every side.
    pub fn pad(&self, border: u32) -> ThumbResult<Raster> {
        if border == 0 {
            return Ok(self.clone());
        }
        let grow = |v: u32| {
            border
                .checked_mul(2)
                .and_then(|b| v.checked_add(b))
                .ok_or_else(|| ThumbError::geometry("padded raster size overflow"))
        };
        let (width, height) = (grow(self.width)?, grow(self.height)?);
        let mut data = vec![0u8; Canvas { width, height }.byte_len()?];
        let src_row = self.width as usize * 4;
        let dst_row = width as usize * 4;
        let offset = border as usize * 4;
        for (y, row) in self.data.chunks_exact(src_row).enumerate() {
            let start = (y + border as usize) * dst_row + offset;
            data[start..start + src_row].copy_from_slice(row);
        }
        Self::from_premul_rgba8(width, height, data)
    }

    /// Stable FNV-1a digest of dimensions and pixels.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u32(self.width);
        h.write_u32(self.height);
        h.write_bytes(&self.data);
        h.finish()
    }

    pub(crate) fn with_data(&self, data: Vec<u8>) -> Raster {
        debug_assert_eq!(data.len(), self.data.len());
        Raster {
            width: self.width,
            height: self.height,
            data: Arc::new(data),
        }
    }

    fn map_pixels(&self, f: impl Fn([u8; 4]) -> [u8; 4]) -> Raster {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&f([px[0], px[1], px[2], px[3]]));
        }
        self.with_data(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
