use super::*;

fn small_opts() -> CompositorOpts {
    CompositorOpts {
        canvas: Canvas::new(320, 240).unwrap(),
        ..CompositorOpts::default()
    }
}

fn blue_bg() -> Raster {
    Raster::solid(160, 120, [0, 0, 255, 255]).unwrap()
}

fn red_cutout() -> Raster {
    Raster::solid(40, 60, [255, 0, 0, 255]).unwrap()
}

#[test]
fn opts_defaults_and_json() {
    let d = CompositorOpts::default();
    assert_eq!(d.canvas, Canvas::STANDARD);
    assert_eq!(d.resize_filter, ResizeFilter::CatmullRom);
    assert_eq!(d.threads, None);

    let o = CompositorOpts::from_json(r#"{ "resize_filter": "lanczos3", "threads": 2 }"#).unwrap();
    assert_eq!(o.canvas, Canvas::STANDARD);
    assert_eq!(o.resize_filter, ResizeFilter::Lanczos3);
    assert_eq!(o.threads, Some(2));

    assert!(matches!(
        CompositorOpts::from_json(r#"{ "threads": 0 }"#),
        Err(ThumbError::Validation(_))
    ));
    assert!(matches!(
        CompositorOpts::from_json(r#"{ "canvas": { "width": 0, "height": 10 } }"#),
        Err(ThumbError::Geometry(_))
    ));
    assert!(matches!(
        CompositorOpts::from_json("not json"),
        Err(ThumbError::Serde(_))
    ));
}

#[test]
fn lifestyle_params_defaults() {
    let p: LifestyleParams = serde_json::from_str(r#"{ "intent": "left-third" }"#).unwrap();
    assert_eq!(p.intent, PlacementIntent::LeftThird);
    assert_eq!(p.blur_radius, 10.0);
    assert_eq!(p.vignette_opacity, 0.25);
}

#[test]
fn recipe_json_shapes() {
    let r: Recipe = serde_json::from_str(r#"{ "kind": "flat", "category": "Baby" }"#).unwrap();
    assert_eq!(
        r,
        Recipe::Flat {
            category: ProductCategory::Baby
        }
    );
    let r: Recipe = serde_json::from_str(r#"{ "kind": "lifestyle", "blurRadius": 12 }"#).unwrap();
    assert!(matches!(r, Recipe::Lifestyle(p) if p.blur_radius == 12.0));
    let r: Recipe = serde_json::from_str(
        r#"{ "kind": "contextual", "scene": { "pedestal": { "position": "center-bottom" } } }"#,
    )
    .unwrap();
    assert!(
        matches!(r, Recipe::Contextual { ref scene } if scene.placement_intent() == PlacementIntent::CenterBottom)
    );
}

#[test]
fn flat_places_subject_right_with_shadow() {
    let out = render_flat(&blue_bg(), &red_cutout(), ProductCategory::Fitness, &small_opts()).unwrap();
    assert!(out.composited);
    assert_eq!(out.image.size(), small_opts().canvas);
    assert!(out.image.is_opaque());
    assert_eq!(
        out.placement,
        resolve_flat_placement(small_opts().canvas, 40, 60).unwrap()
    );
    let p = out.placement;
    assert!(p.x + p.width / 2 > 160);
    let center = out.image.pixel(p.x + p.width / 2, p.y + p.height / 2).unwrap();
    assert!(center[0] > 200 && center[2] < 50);
    // Untouched background far from the subject.
    assert_eq!(out.image.pixel(5, 5), Some([0, 0, 255, 255]));
}

#[test]
fn contextual_reflection_only_on_center_bottom_pedestal() {
    let opts = small_opts();
    let with = SceneDesign::from_json(
        r#"{ "pedestal": { "position": "center-bottom", "hasReflection": true } }"#,
    )
    .unwrap();
    let without = SceneDesign::from_json(
        r#"{ "pedestal": { "position": "center-bottom", "hasReflection": false } }"#,
    )
    .unwrap();

    let a = render_contextual(&blue_bg(), &red_cutout(), &with, &opts).unwrap();
    let b = render_contextual(&blue_bg(), &red_cutout(), &without, &opts).unwrap();
    assert_eq!(a.placement, b.placement);

    // Just below the subject the reflection tints the floor red.
    let p = a.placement;
    let probe = (p.x + p.width / 2, p.bottom() + 2);
    let with_px = a.image.pixel(probe.0, probe.1).unwrap();
    let without_px = b.image.pixel(probe.0, probe.1).unwrap();
    assert!(with_px[0] > without_px[0]);
}

#[test]
fn lifestyle_softens_and_vignettes_background() {
    let out = render_lifestyle(
        &blue_bg(),
        &red_cutout(),
        &LifestyleParams::default(),
        &small_opts(),
    )
    .unwrap();
    let corner = out.image.pixel(0, 0).unwrap();
    assert!(corner[2] < 255);
    let p = out.placement;
    let center = out.image.pixel(p.x + p.width / 2, p.y + p.height / 2).unwrap();
    assert!(center[0] > 200);
}

#[test]
fn render_dispatches_to_the_named_pipeline() {
    let opts = small_opts();
    let flat = render(
        &blue_bg(),
        &red_cutout(),
        &Recipe::Flat {
            category: ProductCategory::Tech,
        },
        &opts,
    )
    .unwrap();
    let direct = render_flat(&blue_bg(), &red_cutout(), ProductCategory::Tech, &opts).unwrap();
    assert_eq!(flat, direct);
}

#[test]
fn too_small_canvas_is_a_geometry_error() {
    let opts = CompositorOpts {
        canvas: Canvas::new(200, 200).unwrap(),
        ..CompositorOpts::default()
    };
    let err = render_lifestyle(&blue_bg(), &red_cutout(), &LifestyleParams::default(), &opts)
        .unwrap_err();
    assert!(matches!(err, ThumbError::Geometry(_)));
}
