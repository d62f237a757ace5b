use std::str::FromStr;

use crate::foundation::error::ThumbError;
use crate::scene::model::{LightingIntensity, LightingKind, SceneDesign, normalize_label};

/// Numeric shadow parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowPreset {
    /// Blur radius in pixels.
    pub blur_radius: f32,
    /// Horizontal offset from the subject in pixels.
    pub offset_x: i32,
    /// Vertical offset from the subject in pixels.
    pub offset_y: i32,
    /// Shadow opacity in `[0, 1]`.
    pub opacity: f32,
}

impl ShadowPreset {
    const fn new(blur_radius: f32, offset_x: i32, offset_y: i32, opacity: f32) -> Self {
        Self {
            blur_radius,
            offset_x,
            offset_y,
            opacity,
        }
    }
}

const DEFAULT_PRESET: ShadowPreset = ShadowPreset::new(20.0, 10, 15, 0.30);

/// Product category driving the flat pipeline's shadow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductCategory {
    /// Gym and sports gear.
    Fitness,
    /// Vitamins and nutrition.
    Supplements,
    /// Gadgets.
    Tech,
    /// Consumer electronics.
    Electronics,
    /// Cosmetics and skincare.
    Beauty,
    /// Home goods.
    Home,
    /// Food and drink.
    Food,
    /// Outdoor gear.
    Outdoor,
    /// Baby products.
    Baby,
    /// Pet supplies.
    Pet,
    /// Apparel and accessories.
    Fashion,
    /// General lifestyle.
    Lifestyle,
    /// Anything unrecognized.
    #[default]
    Default,
}

impl ProductCategory {
    /// Lenient lookup: case-insensitive, trimmed, unknown or missing maps to `Default`.
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return ProductCategory::Default;
        };
        match normalize_label(label).as_str() {
            "fitness" => ProductCategory::Fitness,
            "supplements" => ProductCategory::Supplements,
            "tech" => ProductCategory::Tech,
            "electronics" => ProductCategory::Electronics,
            "beauty" => ProductCategory::Beauty,
            "home" => ProductCategory::Home,
            "food" => ProductCategory::Food,
            "outdoor" => ProductCategory::Outdoor,
            "baby" => ProductCategory::Baby,
            "pet" => ProductCategory::Pet,
            "fashion" => ProductCategory::Fashion,
            "lifestyle" => ProductCategory::Lifestyle,
            _ => ProductCategory::Default,
        }
    }

    /// Canonical lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            ProductCategory::Fitness => "fitness",
            ProductCategory::Supplements => "supplements",
            ProductCategory::Tech => "tech",
            ProductCategory::Electronics => "electronics",
            ProductCategory::Beauty => "beauty",
            ProductCategory::Home => "home",
            ProductCategory::Food => "food",
            ProductCategory::Outdoor => "outdoor",
            ProductCategory::Baby => "baby",
            ProductCategory::Pet => "pet",
            ProductCategory::Fashion => "fashion",
            ProductCategory::Lifestyle => "lifestyle",
            ProductCategory::Default => "default",
        }
    }

    /// Shadow parameters for this category.
    pub fn shadow_preset(self) -> ShadowPreset {
        match self {
            ProductCategory::Fitness => ShadowPreset::new(20.0, 15, 20, 0.40),
            ProductCategory::Supplements => ShadowPreset::new(18.0, 12, 18, 0.35),
            ProductCategory::Tech => ShadowPreset::new(15.0, 10, 15, 0.30),
            ProductCategory::Electronics => ShadowPreset::new(15.0, 10, 15, 0.30),
            ProductCategory::Beauty => ShadowPreset::new(25.0, 8, 12, 0.20),
            ProductCategory::Home => ShadowPreset::new(20.0, 10, 15, 0.25),
            ProductCategory::Food => ShadowPreset::new(18.0, 8, 12, 0.25),
            ProductCategory::Outdoor => ShadowPreset::new(22.0, 18, 22, 0.35),
            ProductCategory::Baby => ShadowPreset::new(25.0, 6, 10, 0.15),
            ProductCategory::Pet => ShadowPreset::new(20.0, 10, 15, 0.25),
            ProductCategory::Fashion => ShadowPreset::new(22.0, 12, 16, 0.25),
            ProductCategory::Lifestyle => ShadowPreset::new(20.0, 10, 15, 0.25),
            ProductCategory::Default => DEFAULT_PRESET,
        }
    }
}

impl FromStr for ProductCategory {
    type Err = ThumbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(Some(s)))
    }
}

impl From<String> for ProductCategory {
    fn from(value: String) -> Self {
        Self::from_label(Some(&value))
    }
}

impl From<ProductCategory> for String {
    fn from(value: ProductCategory) -> Self {
        value.as_str().to_string()
    }
}

/// Shadow parameters for an optional category label (flat pipeline).
pub fn shadow_preset_for_category(category: Option<&str>) -> ShadowPreset {
    ProductCategory::from_label(category).shadow_preset()
}

/// Shadow style picked from a scene's lighting and backdrop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenePreset {
    /// Dramatic or neon lighting.
    Dramatic,
    /// Soft or low-key lighting.
    Soft,
    /// Dark backdrop.
    Dark,
    /// Light backdrop.
    Light,
    /// Scene carries no lighting or color information.
    Default,
}

impl ScenePreset {
    /// Shadow parameters for this style.
    pub fn shadow_preset(self) -> ShadowPreset {
        match self {
            ScenePreset::Dramatic => ShadowPreset::new(30.0, 25, 30, 0.50),
            ScenePreset::Soft => ShadowPreset::new(25.0, 5, 8, 0.15),
            ScenePreset::Dark => ShadowPreset::new(20.0, 15, 20, 0.45),
            ScenePreset::Light => ShadowPreset::new(18.0, 10, 15, 0.25),
            ScenePreset::Default => DEFAULT_PRESET,
        }
    }
}

/// Pick exactly one shadow style for a scene.
///
/// Priority: dramatic/neon lighting, then soft or low-key lighting, then a dark backdrop
/// (bold/energetic mood or near-black background), then light. A scene with neither lighting
/// nor color-scheme information gets `Default`.
pub fn classify_scene(scene: &SceneDesign) -> ScenePreset {
    let lighting = scene.lighting();
    let kind = lighting.and_then(|l| l.kind);
    let intensity = lighting.and_then(|l| l.intensity);

    if matches!(kind, Some(LightingKind::Dramatic | LightingKind::Neon)) {
        return ScenePreset::Dramatic;
    }
    if kind == Some(LightingKind::Soft) || intensity == Some(LightingIntensity::Low) {
        return ScenePreset::Soft;
    }

    let colors = scene.color_scheme.as_ref();
    let dark_mood = colors.and_then(|c| c.mood).is_some_and(|m| m.is_dark());
    let dark_background = colors
        .and_then(|c| c.background.as_deref())
        .is_some_and(is_dark_background);
    if dark_mood || dark_background {
        return ScenePreset::Dark;
    }

    if lighting.is_none() && colors.is_none() {
        return ScenePreset::Default;
    }
    ScenePreset::Light
}

/// Shadow parameters for a scene (contextual pipeline).
pub fn shadow_preset_for_scene(scene: &SceneDesign) -> ShadowPreset {
    classify_scene(scene).shadow_preset()
}

const DARK_LUMINANCE: f64 = 0.2;
const DARK_WORDS: [&str; 5] = ["black", "dark", "charcoal", "midnight", "noir"];

/// Whether a background color (hex or description) reads as near-black.
pub fn is_dark_background(color: &str) -> bool {
    match parse_hex_rgb(color) {
        Some(rgb) => relative_luminance(rgb) < DARK_LUMINANCE,
        None => {
            let lower = color.to_ascii_lowercase();
            DARK_WORDS.iter().any(|w| lower.contains(w))
        }
    }
}

fn parse_hex_rgb(color: &str) -> Option<[u8; 3]> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = u8::from_str_radix(&c.to_string(), 16).ok()?;
                rgb[i] = v * 17;
            }
            Some(rgb)
        }
        6 => {
            let mut rgb = [0u8; 3];
            for (i, slot) in rgb.iter_mut().enumerate() {
                *slot = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
            }
            Some(rgb)
        }
        _ => None,
    }
}

fn relative_luminance(rgb: [u8; 3]) -> f64 {
    let [r, g, b] = rgb.map(|c| f64::from(c) / 255.0);
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

#[cfg(test)]
#[path = "../../tests/unit/effects/presets.rs"]
mod tests;
