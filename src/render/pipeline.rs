use std::path::Path;

use anyhow::Context;

use crate::effects::blur::soften;
use crate::effects::composite::{Layer, SubjectLayers, composite};
use crate::effects::presets::{ProductCategory, classify_scene};
use crate::effects::shadow::{optional_layer, reflection_layer, shadow_layer};
use crate::effects::vignette::apply_vignette;
use crate::foundation::core::{BoundingBox, Canvas, Raster};
use crate::foundation::error::{ThumbError, ThumbResult};
use crate::layout::placement::{PlacementIntent, resolve_flat_placement, resolve_placement};
use crate::render::fit::{ResizeFilter, cover_fit, resize_exact};
use crate::scene::model::SceneDesign;

/// Subject width ratio used by the lifestyle pipeline.
pub const LIFESTYLE_WIDTH_RATIO: f64 = 0.35;

/// Options shared by every pipeline call.
///
/// Built once by the caller and passed by reference; pipelines never mutate it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositorOpts {
    /// Output frame size.
    pub canvas: Canvas,
    /// Filter for background cover-fit and cutout scaling.
    pub resize_filter: ResizeFilter,
    /// Worker threads for variation batches. `None` uses one per core.
    pub threads: Option<usize>,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas::STANDARD,
            resize_filter: ResizeFilter::default(),
            threads: None,
        }
    }
}

impl CompositorOpts {
    /// Parse options from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> ThumbResult<Self> {
        let opts: Self = serde_json::from_str(json)
            .map_err(|e| ThumbError::serde(format!("compositor options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Read and parse an options file.
    pub fn from_json_path(path: impl AsRef<Path>) -> ThumbResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read compositor options '{}'", path.display()))?;
        Self::from_json(&json)
    }

    /// Reject a zero-sized canvas or an empty worker pool.
    pub fn validate(&self) -> ThumbResult<()> {
        Canvas::new(self.canvas.width, self.canvas.height)?;
        if self.threads == Some(0) {
            return Err(ThumbError::validation(
                "compositor 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

/// Parameters of the lifestyle pipeline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LifestyleParams {
    /// Subject anchor; also centers the vignette.
    pub intent: PlacementIntent,
    /// Background blur radius, clamped to `[8, 15]`.
    pub blur_radius: f32,
    /// Vignette edge opacity, clamped to `[0.20, 0.30]`.
    pub vignette_opacity: f32,
}

impl Default for LifestyleParams {
    fn default() -> Self {
        Self {
            intent: PlacementIntent::Center,
            blur_radius: 10.0,
            vignette_opacity: 0.25,
        }
    }
}

/// Final frame plus where the subject landed.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeOutput {
    /// Opaque canvas-sized raster.
    pub image: Raster,
    /// Subject placement on the canvas.
    pub placement: BoundingBox,
    /// `true` when the subject was composited.
    pub composited: bool,
}

/// Which pipeline to run and with what parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recipe {
    /// Right-aligned subject with a category shadow.
    Flat {
        /// Shadow category.
        #[serde(default)]
        category: ProductCategory,
    },
    /// Scene-driven placement, shadow and reflection.
    Contextual {
        /// Scene description.
        #[serde(default)]
        scene: SceneDesign,
    },
    /// Softened, vignetted background with an unshadowed subject.
    Lifestyle(LifestyleParams),
}

/// Flat pipeline: cover-fit background, right-aligned subject, category shadow.
#[tracing::instrument(skip(background, cutout, opts))]
pub fn render_flat(
    background: &Raster,
    cutout: &Raster,
    category: ProductCategory,
    opts: &CompositorOpts,
) -> ThumbResult<CompositeOutput> {
    let base = cover_fit(background, opts.canvas, opts.resize_filter)?;
    let placement = resolve_flat_placement(base.size(), cutout.width(), cutout.height())?;
    let subject = resize_exact(cutout, placement.width, placement.height, opts.resize_filter)?;

    let preset = category.shadow_preset();
    tracing::debug!(?preset, "category shadow");
    let shadow = shadow_layer(&subject, placement, &preset)?;

    let layers = SubjectLayers {
        shadow: Some(shadow),
        reflection: None,
        subject: subject_layer(subject, placement),
    };
    finish(&base, layers, placement)
}

/// Contextual pipeline: placement, shadow and optional reflection all come from `scene`.
///
/// A reflection that fails to synthesize is dropped; every other failure is returned.
#[tracing::instrument(skip_all, fields(intent = %scene.placement_intent()))]
pub fn render_contextual(
    background: &Raster,
    cutout: &Raster,
    scene: &SceneDesign,
    opts: &CompositorOpts,
) -> ThumbResult<CompositeOutput> {
    let base = cover_fit(background, opts.canvas, opts.resize_filter)?;
    let canvas = base.size();
    let placement = resolve_placement(
        canvas,
        cutout.width(),
        cutout.height(),
        scene.placement_intent(),
        scene.product_space_ratio(),
    )?;
    let subject = resize_exact(cutout, placement.width, placement.height, opts.resize_filter)?;

    let scene_preset = classify_scene(scene);
    let preset = scene_preset.shadow_preset();
    tracing::debug!(?scene_preset, ?preset, "scene shadow");
    let shadow = shadow_layer(&subject, placement, &preset)?;

    let reflection = if scene.wants_reflection() {
        optional_layer("reflection", reflection_layer(&subject, placement, canvas))
    } else {
        None
    };

    let layers = SubjectLayers {
        shadow: Some(shadow),
        reflection,
        subject: subject_layer(subject, placement),
    };
    finish(&base, layers, placement)
}

/// Lifestyle pipeline: soften the background, vignette it, then place the subject at 35% width.
#[tracing::instrument(skip(background, cutout, opts))]
pub fn render_lifestyle(
    background: &Raster,
    cutout: &Raster,
    params: &LifestyleParams,
    opts: &CompositorOpts,
) -> ThumbResult<CompositeOutput> {
    let base = cover_fit(background, opts.canvas, opts.resize_filter)?;
    let base = soften(&base, params.blur_radius)?;
    let base = apply_vignette(&base, params.intent, params.vignette_opacity)?;

    let placement = resolve_placement(
        base.size(),
        cutout.width(),
        cutout.height(),
        params.intent,
        Some(LIFESTYLE_WIDTH_RATIO),
    )?;
    let subject = resize_exact(cutout, placement.width, placement.height, opts.resize_filter)?;

    let layers = SubjectLayers::subject(subject_layer(subject, placement));
    finish(&base, layers, placement)
}

/// Run whichever pipeline `recipe` names.
pub fn render(
    background: &Raster,
    cutout: &Raster,
    recipe: &Recipe,
    opts: &CompositorOpts,
) -> ThumbResult<CompositeOutput> {
    match recipe {
        Recipe::Flat { category } => render_flat(background, cutout, *category, opts),
        Recipe::Contextual { scene } => render_contextual(background, cutout, scene, opts),
        Recipe::Lifestyle(params) => render_lifestyle(background, cutout, params, opts),
    }
}

fn subject_layer(subject: Raster, placement: BoundingBox) -> Layer {
    Layer::new(subject, i64::from(placement.y), i64::from(placement.x))
}

fn finish(
    base: &Raster,
    layers: SubjectLayers,
    placement: BoundingBox,
) -> ThumbResult<CompositeOutput> {
    let image = composite(base, &layers.into_stack())?;
    Ok(CompositeOutput {
        image,
        placement,
        composited: true,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
