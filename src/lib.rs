//! Thumbforge composites product cutouts onto generated backgrounds.
//!
//! Every entry point is a pure, deterministic transform from (background, cutout, parameters) to a
//! canvas-sized opaque raster plus the subject's placement:
//!
//! - [`render_flat`]: right-aligned subject with a category-driven drop shadow
//! - [`render_contextual`]: placement, shadow and floor reflection driven by a [`SceneDesign`]
//! - [`render_lifestyle`]: softened, vignetted background with the subject on top
//!
//! [`render_variations`] fans one recipe out over many backgrounds on a rayon pool.
//!
//! Rasters are premultiplied RGBA8 end-to-end; [`decode_raster`] and [`encode_png`] convert at the
//! boundary.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod effects;
mod foundation;
mod layout;
mod render;
mod scene;

pub use crate::foundation::core::{BoundingBox, Canvas, Point, Raster};
pub use crate::foundation::error::{ThumbError, ThumbResult};

pub use crate::assets::decode::{
    decode_base64_raster, decode_raster, encode_png, encode_png_base64, encode_png_data_url,
};
pub use crate::effects::blur::{
    BlurSpec, MIN_BLUR_RADIUS, SOFTEN_MAX_RADIUS, SOFTEN_MIN_RADIUS, gaussian_blur, soften,
    soften_radius,
};
pub use crate::effects::composite::{
    BlendMode, Layer, LayerStack, PremulRgba8, SubjectLayers, composite, multiply, over, screen,
};
pub use crate::effects::presets::{
    ProductCategory, ScenePreset, ShadowPreset, classify_scene, is_dark_background,
    shadow_preset_for_category, shadow_preset_for_scene,
};
pub use crate::effects::shadow::{
    REFLECTION_BLUR_RADIUS, REFLECTION_BOTTOM_GUARD, REFLECTION_BRIGHTNESS, REFLECTION_OPACITY,
    reflection_layer, shadow_layer, synthesize_reflection, synthesize_shadow,
};
pub use crate::effects::vignette::{
    VIGNETTE_INNER_STOP, VIGNETTE_OPACITY_RANGE, VIGNETTE_RADIUS, apply_vignette,
    generate_vignette, vignette_alpha, vignette_opacity,
};
pub use crate::layout::placement::{
    DEFAULT_WIDTH_RATIO, EDGE_MARGIN, MIN_CANVAS_SIDE, MIN_SUBJECT_SIDE, PlacementIntent,
    WIDTH_RATIO_RANGE, resolve_flat_placement, resolve_placement, width_ratio,
};
pub use crate::render::batch::{VariationOutcome, render_variations};
pub use crate::render::fit::{ResizeFilter, cover_fit, resize_exact};
pub use crate::render::pipeline::{
    CompositeOutput, CompositorOpts, LIFESTYLE_WIDTH_RATIO, LifestyleParams, Recipe, render,
    render_contextual, render_flat, render_lifestyle,
};
pub use crate::scene::model::{
    ColorScheme, Environment, Lighting, LightingIntensity, LightingKind, Mood, Pedestal,
    SceneDesign,
};
