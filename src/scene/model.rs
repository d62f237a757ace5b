use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{ThumbError, ThumbResult};
use crate::layout::placement::PlacementIntent;

/// Scene description produced by the upstream vision model.
///
/// Only pedestal placement, lighting and color-scheme fields drive compositing; the rest is
/// carried through untouched.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneDesign {
    /// Setting and lighting.
    pub environment: Option<Environment>,
    /// Palette and mood.
    pub color_scheme: Option<ColorScheme>,
    /// Surface the product rests on.
    pub pedestal: Option<Pedestal>,
    /// Headline layout hints (not used by the compositor).
    pub text_layout: Option<serde_json::Value>,
    /// Product description (not used by the compositor).
    pub product_characteristics: Option<serde_json::Value>,
}

/// Scene environment.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Environment {
    /// Setting description (not used by the compositor).
    pub setting: Option<serde_json::Value>,
    /// Lighting setup.
    pub lighting: Option<Lighting>,
}

/// Lighting setup.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lighting {
    /// Lighting style.
    #[serde(rename = "type")]
    pub kind: Option<LightingKind>,
    /// Overall intensity.
    pub intensity: Option<LightingIntensity>,
    /// Light direction (not used by the compositor).
    pub direction: Option<serde_json::Value>,
}

/// Palette and mood.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorScheme {
    /// Background color: a hex code or a description.
    pub background: Option<String>,
    /// Primary brand color (not used by the compositor).
    pub primary: Option<serde_json::Value>,
    /// Accent color (not used by the compositor).
    pub accent: Option<serde_json::Value>,
    /// Overall mood.
    pub mood: Option<Mood>,
}

/// Pedestal placement.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pedestal {
    /// Pedestal style (not used by the compositor).
    pub style: Option<serde_json::Value>,
    /// Where the product sits.
    pub position: Option<PlacementIntent>,
    /// Whether a floor reflection is wanted. `null` reads as `false`.
    #[serde(deserialize_with = "null_as_false")]
    pub has_reflection: bool,
    /// Subject width as a fraction of the canvas width.
    pub product_space_ratio: Option<f64>,
}

/// Lighting style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LightingKind {
    /// High-contrast lighting.
    Dramatic,
    /// Colored neon lighting.
    Neon,
    /// Diffuse lighting.
    Soft,
    /// Even studio lighting.
    Studio,
    /// Daylight.
    Natural,
    /// Warm ambient light.
    Warm,
    /// Anything else.
    Other,
}

impl LightingKind {
    fn as_str(self) -> &'static str {
        match self {
            LightingKind::Dramatic => "dramatic",
            LightingKind::Neon => "neon",
            LightingKind::Soft => "soft",
            LightingKind::Studio => "studio",
            LightingKind::Natural => "natural",
            LightingKind::Warm => "warm",
            LightingKind::Other => "other",
        }
    }
}

impl From<String> for LightingKind {
    fn from(value: String) -> Self {
        match normalize_label(&value).as_str() {
            "dramatic" | "moody" | "high-contrast" => LightingKind::Dramatic,
            "neon" => LightingKind::Neon,
            "soft" | "diffused" | "diffuse" => LightingKind::Soft,
            "studio" => LightingKind::Studio,
            "natural" | "daylight" => LightingKind::Natural,
            "warm" | "golden-hour" => LightingKind::Warm,
            _ => LightingKind::Other,
        }
    }
}

impl From<LightingKind> for String {
    fn from(value: LightingKind) -> Self {
        value.as_str().to_string()
    }
}

/// Lighting intensity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LightingIntensity {
    /// Low-key.
    Low,
    /// Medium.
    Medium,
    /// Bright.
    High,
    /// Anything else.
    Other,
}

impl LightingIntensity {
    fn as_str(self) -> &'static str {
        match self {
            LightingIntensity::Low => "low",
            LightingIntensity::Medium => "medium",
            LightingIntensity::High => "high",
            LightingIntensity::Other => "other",
        }
    }
}

impl From<String> for LightingIntensity {
    fn from(value: String) -> Self {
        match normalize_label(&value).as_str() {
            "low" | "low-key" | "dim" | "subtle" => LightingIntensity::Low,
            "medium" | "moderate" => LightingIntensity::Medium,
            "high" | "bright" | "high-key" => LightingIntensity::High,
            _ => LightingIntensity::Other,
        }
    }
}

impl From<LightingIntensity> for String {
    fn from(value: LightingIntensity) -> Self {
        value.as_str().to_string()
    }
}

/// Palette mood.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mood {
    /// Bold.
    Bold,
    /// Energetic.
    Energetic,
    /// Calm.
    Calm,
    /// Luxurious.
    Luxurious,
    /// Playful.
    Playful,
    /// Anything else.
    Other,
}

impl Mood {
    fn as_str(self) -> &'static str {
        match self {
            Mood::Bold => "bold",
            Mood::Energetic => "energetic",
            Mood::Calm => "calm",
            Mood::Luxurious => "luxurious",
            Mood::Playful => "playful",
            Mood::Other => "other",
        }
    }

    /// Moods that imply a dark backdrop.
    pub fn is_dark(self) -> bool {
        matches!(self, Mood::Bold | Mood::Energetic)
    }
}

impl From<String> for Mood {
    fn from(value: String) -> Self {
        match normalize_label(&value).as_str() {
            "bold" => Mood::Bold,
            "energetic" | "vibrant" => Mood::Energetic,
            "calm" | "serene" => Mood::Calm,
            "luxurious" | "luxury" | "premium" => Mood::Luxurious,
            "playful" | "fun" => Mood::Playful,
            _ => Mood::Other,
        }
    }
}

impl From<Mood> for String {
    fn from(value: Mood) -> Self {
        value.as_str().to_string()
    }
}

impl SceneDesign {
    /// Parse scene JSON (camelCase keys, every field optional).
    pub fn from_json(json: &str) -> ThumbResult<Self> {
        serde_json::from_str(json).map_err(|e| ThumbError::serde(format!("scene design: {e}")))
    }

    /// Read and parse a scene JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> ThumbResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read scene design '{}'", path.display()))?;
        Self::from_json(&json)
    }

    /// Pedestal position, defaulting to center.
    pub fn placement_intent(&self) -> PlacementIntent {
        self.pedestal
            .as_ref()
            .and_then(|p| p.position)
            .unwrap_or_default()
    }

    /// Scene-supplied product-space ratio, if any.
    pub fn product_space_ratio(&self) -> Option<f64> {
        self.pedestal.as_ref().and_then(|p| p.product_space_ratio)
    }

    /// A reflection is drawn only for a reflective pedestal with the product resting on it.
    pub fn wants_reflection(&self) -> bool {
        self.pedestal.as_ref().is_some_and(|p| p.has_reflection)
            && self.placement_intent() == PlacementIntent::CenterBottom
    }

    /// Lighting setup, if described.
    pub fn lighting(&self) -> Option<&Lighting> {
        self.environment.as_ref().and_then(|e| e.lighting.as_ref())
    }
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    <Option<bool> as serde::Deserialize>::deserialize(deserializer).map(Option::unwrap_or_default)
}

pub(crate) fn normalize_label(label: &str) -> String {
    label.trim().to_ascii_lowercase().replace(['_', ' '], "-")
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
