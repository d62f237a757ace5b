use std::str::FromStr;

use crate::foundation::core::{BoundingBox, Canvas, Point};
use crate::foundation::error::{ThumbError, ThumbResult};

/// Minimum distance between the placed subject and any canvas edge.
pub const EDGE_MARGIN: u32 = 20;
/// Floor applied to both subject dimensions.
pub const MIN_SUBJECT_SIDE: u32 = 200;
/// Smallest canvas side that can hold the subject floor plus both margins.
pub const MIN_CANVAS_SIDE: u32 = MIN_SUBJECT_SIDE + 2 * EDGE_MARGIN;
/// Subject width as a fraction of canvas width when the scene does not say otherwise.
pub const DEFAULT_WIDTH_RATIO: f64 = 0.40;
/// Accepted range for a scene-supplied product-space ratio.
pub const WIDTH_RATIO_RANGE: (f64, f64) = (0.2, 0.6);

const WIDE_MAX_HEIGHT_RATIO: f64 = 0.80;
const TALL_HEIGHT_RATIO: f64 = 0.85;
const PEDESTAL_SURFACE_Y: f64 = 0.65;

const FLAT_WIDTH_RATIO: f64 = 0.45;
const FLAT_RIGHT_MARGIN_RATIO: f64 = 0.05;
const FLAT_MAX_HEIGHT_RATIO: f64 = 0.90;

/// Where on the canvas the subject is anchored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlacementIntent {
    /// Centered in both axes.
    #[default]
    Center,
    /// Centered on the 33% width line.
    LeftThird,
    /// Centered on the 67% width line.
    RightThird,
    /// Horizontally centered, resting on a surface at 65% of the height.
    CenterBottom,
}

impl PlacementIntent {
    /// All intents, in declaration order.
    pub const ALL: [PlacementIntent; 4] = [
        PlacementIntent::Center,
        PlacementIntent::LeftThird,
        PlacementIntent::RightThird,
        PlacementIntent::CenterBottom,
    ];

    /// Canonical kebab-case label.
    pub fn as_str(self) -> &'static str {
        match self {
            PlacementIntent::Center => "center",
            PlacementIntent::LeftThird => "left-third",
            PlacementIntent::RightThird => "right-third",
            PlacementIntent::CenterBottom => "center-bottom",
        }
    }

    /// Lenient parse for scene data: unknown labels fall back to [`PlacementIntent::Center`].
    pub fn from_label(label: &str) -> Self {
        Self::parse(label).unwrap_or_default()
    }

    /// Fractional target point. `y` is the box center, except for
    /// [`PlacementIntent::CenterBottom`] where it is the box's bottom edge.
    pub fn anchor(self) -> Point {
        match self {
            PlacementIntent::Center => Point::new(0.5, 0.5),
            PlacementIntent::LeftThird => Point::new(0.33, 0.5),
            PlacementIntent::RightThird => Point::new(0.67, 0.5),
            PlacementIntent::CenterBottom => Point::new(0.5, PEDESTAL_SURFACE_Y),
        }
    }

    /// Fractional vignette center for this intent.
    pub fn vignette_center(self) -> Point {
        match self {
            PlacementIntent::Center => Point::new(0.5, 0.55),
            PlacementIntent::RightThird => Point::new(0.67, 0.55),
            PlacementIntent::LeftThird => Point::new(0.33, 0.55),
            PlacementIntent::CenterBottom => Point::new(0.5, 0.7),
        }
    }

    fn parse(label: &str) -> Option<Self> {
        let norm = label.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match norm.as_str() {
            "center" | "centre" | "middle" => Some(PlacementIntent::Center),
            "left-third" | "left" => Some(PlacementIntent::LeftThird),
            "right-third" | "right" => Some(PlacementIntent::RightThird),
            "center-bottom" | "bottom-center" | "bottom" => Some(PlacementIntent::CenterBottom),
            _ => None,
        }
    }

    fn origin(self, canvas: Canvas, w: f64, h: f64) -> (f64, f64) {
        let cw = f64::from(canvas.width);
        let ch = f64::from(canvas.height);
        let a = self.anchor();
        let x = a.x * cw - w / 2.0;
        let y = match self {
            PlacementIntent::CenterBottom => a.y * ch - h,
            _ => a.y * ch - h / 2.0,
        };
        (x, y)
    }
}

impl FromStr for PlacementIntent {
    type Err = ThumbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            ThumbError::validation(format!(
                "unknown placement intent '{s}' (expected center, left-third, right-third or center-bottom)"
            ))
        })
    }
}

impl From<String> for PlacementIntent {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<PlacementIntent> for String {
    fn from(value: PlacementIntent) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for PlacementIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective subject width ratio: the scene's value clamped to [`WIDTH_RATIO_RANGE`], or
/// [`DEFAULT_WIDTH_RATIO`].
pub fn width_ratio(product_space_ratio: Option<f64>) -> f64 {
    match product_space_ratio {
        Some(r) if r.is_finite() => r.clamp(WIDTH_RATIO_RANGE.0, WIDTH_RATIO_RANGE.1),
        _ => DEFAULT_WIDTH_RATIO,
    }
}

/// Size and position a cutout on the canvas for `intent`.
///
/// The box keeps the cutout's aspect ratio (up to the 200px floor), is derived from
/// canvas-relative ratios only, and always sits inside the canvas with [`EDGE_MARGIN`] to spare.
pub fn resolve_placement(
    canvas: Canvas,
    cutout_w: u32,
    cutout_h: u32,
    intent: PlacementIntent,
    product_space_ratio: Option<f64>,
) -> ThumbResult<BoundingBox> {
    validate(canvas, cutout_w, cutout_h)?;
    if canvas.width < MIN_CANVAS_SIDE || canvas.height < MIN_CANVAS_SIDE {
        return Err(ThumbError::geometry(format!(
            "canvas {}x{} is smaller than the {MIN_CANVAS_SIDE}px placement minimum",
            canvas.width, canvas.height
        )));
    }

    let cw = f64::from(canvas.width);
    let ch = f64::from(canvas.height);
    let target_w = cw * width_ratio(product_space_ratio);
    let aspect = f64::from(cutout_w) / f64::from(cutout_h);

    let (w, h) = if aspect > 1.0 {
        let h = target_w / aspect;
        let max_h = ch * WIDE_MAX_HEIGHT_RATIO;
        if h > max_h {
            (max_h * aspect, max_h)
        } else {
            (target_w, h)
        }
    } else {
        let h = ch * TALL_HEIGHT_RATIO;
        let w = h * aspect;
        if w > target_w {
            (target_w, target_w / aspect)
        } else {
            (w, h)
        }
    };

    let margins = f64::from(2 * EDGE_MARGIN);
    let floor = f64::from(MIN_SUBJECT_SIDE);
    let w = w.max(floor).min(cw - margins).round();
    let h = h.max(floor).min(ch - margins).round();

    let (x, y) = intent.origin(canvas, w, h);
    let margin = f64::from(EDGE_MARGIN);
    let x = x.round().clamp(margin, cw - w - margin);
    let y = y.round().clamp(margin, ch - h - margin);

    let bbox = BoundingBox {
        x: x as u32,
        y: y as u32,
        width: w as u32,
        height: h as u32,
    };
    tracing::debug!(?intent, ?bbox, "resolved placement");
    Ok(bbox)
}

/// Right-aligned placement used by the flat pipeline.
///
/// Width is 45% of the canvas (height capped at 90%), the right edge keeps a margin of 5% of the
/// canvas width, and the box is vertically centered. This rule is intentionally separate from
/// [`resolve_placement`].
pub fn resolve_flat_placement(
    canvas: Canvas,
    cutout_w: u32,
    cutout_h: u32,
) -> ThumbResult<BoundingBox> {
    validate(canvas, cutout_w, cutout_h)?;

    let cw = f64::from(canvas.width);
    let ch = f64::from(canvas.height);
    let aspect = f64::from(cutout_w) / f64::from(cutout_h);

    let mut w = cw * FLAT_WIDTH_RATIO;
    let mut h = w / aspect;
    let max_h = ch * FLAT_MAX_HEIGHT_RATIO;
    if h > max_h {
        h = max_h;
        w = h * aspect;
    }
    let w = w.round().clamp(1.0, cw);
    let h = h.round().clamp(1.0, ch);

    let x = (cw - w - cw * FLAT_RIGHT_MARGIN_RATIO).round().clamp(0.0, cw - w);
    let y = ((ch - h) / 2.0).round().clamp(0.0, ch - h);

    Ok(BoundingBox {
        x: x as u32,
        y: y as u32,
        width: w as u32,
        height: h as u32,
    })
}

fn validate(canvas: Canvas, cutout_w: u32, cutout_h: u32) -> ThumbResult<()> {
    if canvas.width == 0 || canvas.height == 0 {
        return Err(ThumbError::geometry("canvas dimensions must be > 0"));
    }
    if cutout_w == 0 || cutout_h == 0 {
        return Err(ThumbError::geometry("cutout dimensions must be > 0"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/layout/placement.rs"]
mod tests;
