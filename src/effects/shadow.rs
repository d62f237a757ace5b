use crate::effects::blur::{BlurSpec, gaussian_blur};
use crate::effects::composite::Layer;
use crate::effects::presets::ShadowPreset;
use crate::foundation::core::{BoundingBox, Canvas, Raster};
use crate::foundation::error::ThumbResult;

/// Brightness kept in a reflection.
pub const REFLECTION_BRIGHTNESS: f32 = 0.3;
/// Blur radius applied to a reflection.
pub const REFLECTION_BLUR_RADIUS: f32 = 3.0;
/// Opacity applied to a reflection.
pub const REFLECTION_OPACITY: f32 = 0.3;
/// A reflection never starts lower than this many pixels above the canvas bottom.
pub const REFLECTION_BOTTOM_GUARD: u32 = 50;

/// Transparent margin added around a shadow so the blur can fall off past the subject's edges.
pub fn shadow_margin(preset: &ShadowPreset) -> u32 {
    BlurSpec::from_radius(preset.blur_radius).radius_px
}

/// Black, blurred silhouette of `subject` faded to `preset.opacity`.
///
/// The result is [`shadow_margin`] pixels larger than `subject` on every side. Blur radii below
/// the supported minimum are raised rather than rejected.
pub fn synthesize_shadow(subject: &Raster, preset: &ShadowPreset) -> ThumbResult<Raster> {
    let padded = subject.silhouette().pad(shadow_margin(preset))?;
    let blurred = gaussian_blur(&padded, preset.blur_radius)?;
    Ok(blurred.scale_alpha(preset.opacity))
}

/// Shadow layer for a subject placed at `bbox`, offset by the preset and kept on-canvas.
///
/// The offset silhouette origin is clamped to the canvas; the layer itself starts
/// [`shadow_margin`] pixels up and left of it so the soft fringe lines up.
pub fn shadow_layer(
    subject: &Raster,
    bbox: BoundingBox,
    preset: &ShadowPreset,
) -> ThumbResult<Layer> {
    let raster = synthesize_shadow(subject, preset)?;
    let margin = i64::from(shadow_margin(preset));
    let top = (i64::from(bbox.y) + i64::from(preset.offset_y)).max(0);
    let left = (i64::from(bbox.x) + i64::from(preset.offset_x)).max(0);
    Ok(Layer::new(raster, top - margin, left - margin))
}

/// Mirrored, darkened, softened and faded copy of `subject`.
pub fn synthesize_reflection(subject: &Raster) -> ThumbResult<Raster> {
    let mirrored = subject.flip_vertical().scale_rgb(REFLECTION_BRIGHTNESS);
    let blurred = gaussian_blur(&mirrored, REFLECTION_BLUR_RADIUS)?;
    Ok(blurred.scale_alpha(REFLECTION_OPACITY))
}

/// Reflection layer directly under the subject box.
pub fn reflection_layer(subject: &Raster, bbox: BoundingBox, canvas: Canvas) -> ThumbResult<Layer> {
    let raster = synthesize_reflection(subject)?;
    let top = bbox
        .bottom()
        .min(canvas.height.saturating_sub(REFLECTION_BOTTOM_GUARD));
    Ok(Layer::new(raster, i64::from(top), i64::from(bbox.x)))
}

/// Keep a cosmetic layer when it synthesized, otherwise log and drop it.
pub(crate) fn optional_layer(label: &'static str, layer: ThumbResult<Layer>) -> Option<Layer> {
    match layer {
        Ok(layer) => Some(layer),
        Err(err) => {
            tracing::warn!(layer = label, error = %err, "dropping optional layer");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/shadow.rs"]
mod tests;
