use crate::foundation::core::Raster;
use crate::foundation::error::{ThumbError, ThumbResult};
use crate::foundation::math::mul_div255_u8;

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Porter-Duff "over" with an extra layer opacity.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Premultiplied multiply: `s*(1-da) + d*(1-sa) + s*d`.
pub fn multiply(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    let sa = u16::from(src[3]);
    let da = u16::from(dst[3]);
    let mut out = [0u8; 4];
    for i in 0..3 {
        let s = u16::from(src[i]);
        let d = u16::from(dst[i]);
        let v = u16::from(mul_div255(s, 255 - da))
            + u16::from(mul_div255(d, 255 - sa))
            + u16::from(mul_div255(s, d));
        out[i] = v.min(255) as u8;
    }
    out[3] = union_alpha(sa, da);
    out
}

/// Premultiplied screen: `s + d - s*d`.
pub fn screen(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    let mut out = [0u8; 4];
    for i in 0..3 {
        let s = u16::from(src[i]);
        let d = u16::from(dst[i]);
        out[i] = (s + d - u16::from(mul_div255(s, d))).min(255) as u8;
    }
    out[3] = union_alpha(u16::from(src[3]), u16::from(dst[3]));
    out
}

/// How a layer's pixels combine with what is already on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Source over destination.
    #[default]
    Normal,
    /// Darkening multiply.
    Multiply,
    /// Lightening screen.
    Screen,
}

impl BlendMode {
    fn blend(self, dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
        match self {
            BlendMode::Normal => over(dst, src, 1.0),
            BlendMode::Multiply => multiply(dst, src),
            BlendMode::Screen => screen(dst, src),
        }
    }
}

/// A raster positioned on the canvas. `top`/`left` may be negative; overflow is clipped.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Pixels to draw.
    pub raster: Raster,
    /// Row of the raster's first line on the canvas.
    pub top: i64,
    /// Column of the raster's first pixel on the canvas.
    pub left: i64,
    /// Blend mode.
    pub blend: BlendMode,
}

impl Layer {
    /// A normal-blend layer at `(top, left)`.
    pub fn new(raster: Raster, top: i64, left: i64) -> Self {
        Self {
            raster,
            top,
            left,
            blend: BlendMode::Normal,
        }
    }

    /// Replace the blend mode.
    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }
}

/// Ordered layer list. The first pushed layer is drawn first; the last pushed ends up on top.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    /// Empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer above everything pushed so far.
    pub fn push(&mut self, layer: Layer) -> &mut Self {
        self.layers.push(layer);
        self
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the stack has no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layers in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }
}

/// The subject with its optional effect layers.
///
/// [`SubjectLayers::into_stack`] always yields shadow, then reflection, then the subject on top.
#[derive(Clone, Debug, PartialEq)]
pub struct SubjectLayers {
    /// Drop shadow, drawn first.
    pub shadow: Option<Layer>,
    /// Floor reflection, drawn above the shadow.
    pub reflection: Option<Layer>,
    /// The cutout itself, always topmost.
    pub subject: Layer,
}

impl SubjectLayers {
    /// Just the subject.
    pub fn subject(subject: Layer) -> Self {
        Self {
            shadow: None,
            reflection: None,
            subject,
        }
    }

    /// Flatten into draw order.
    pub fn into_stack(self) -> LayerStack {
        let mut stack = LayerStack::new();
        if let Some(shadow) = self.shadow {
            stack.push(shadow);
        }
        if let Some(reflection) = self.reflection {
            stack.push(reflection);
        }
        stack.push(self.subject);
        stack
    }
}

/// Draw `layers` over `base` in order and flatten to an opaque raster of the base's size.
pub fn composite(base: &Raster, layers: &LayerStack) -> ThumbResult<Raster> {
    let bw = i64::from(base.width());
    let bh = i64::from(base.height());
    let mut out = base.data().to_vec();

    for (idx, layer) in layers.iter().enumerate() {
        let lw = i64::from(layer.raster.width());
        let lh = i64::from(layer.raster.height());
        let right = layer
            .left
            .checked_add(lw)
            .ok_or_else(|| ThumbError::compositing(format!("layer {idx} x-extent overflows")))?;
        let bottom = layer
            .top
            .checked_add(lh)
            .ok_or_else(|| ThumbError::compositing(format!("layer {idx} y-extent overflows")))?;

        let x0 = layer.left.max(0);
        let y0 = layer.top.max(0);
        let x1 = right.min(bw);
        let y1 = bottom.min(bh);
        if x0 >= x1 || y0 >= y1 {
            tracing::debug!(layer = idx, "layer lies entirely outside the canvas");
            continue;
        }

        let src = layer.raster.data();
        for y in y0..y1 {
            let sy = (y - layer.top) as usize;
            for x in x0..x1 {
                let sx = (x - layer.left) as usize;
                let si = (sy * (lw as usize) + sx) * 4;
                let di = ((y as usize) * (bw as usize) + (x as usize)) * 4;
                let s = [src[si], src[si + 1], src[si + 2], src[si + 3]];
                let d = [out[di], out[di + 1], out[di + 2], out[di + 3]];
                out[di..di + 4].copy_from_slice(&layer.blend.blend(d, s));
            }
        }
    }

    for px in out.chunks_exact_mut(4) {
        px[3] = 255;
    }
    Ok(base.with_data(out))
}

fn mul_div255(x: u16, y: u16) -> u8 {
    mul_div255_u8(x, y)
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

fn union_alpha(sa: u16, da: u16) -> u8 {
    (sa + da - u16::from(mul_div255(sa, da))).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
