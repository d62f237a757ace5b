use super::*;
use crate::foundation::core::Canvas;
use crate::render::pipeline::LifestyleParams;

fn backgrounds() -> Vec<Raster> {
    [[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]]
        .into_iter()
        .map(|c| Raster::solid(32, 24, c).unwrap())
        .collect()
}

fn cutout() -> Raster {
    Raster::solid(20, 30, [255, 255, 255, 255]).unwrap()
}

#[test]
fn outcomes_keep_input_order() {
    let opts = CompositorOpts {
        canvas: Canvas::new(320, 240).unwrap(),
        threads: Some(2),
        ..CompositorOpts::default()
    };
    let recipe = Recipe::Lifestyle(LifestyleParams::default());
    let out = render_variations(&backgrounds(), &cutout(), &recipe, &opts).unwrap();
    assert_eq!(out.len(), 3);
    assert!(out.iter().all(VariationOutcome::composited));

    // The corner keeps the hue of its own background.
    let corners: Vec<_> = out.iter().map(|o| o.image().pixel(0, 0).unwrap()).collect();
    assert!(corners[0][0] > corners[0][1] && corners[0][0] > corners[0][2]);
    assert!(corners[1][1] > corners[1][0] && corners[1][1] > corners[1][2]);
    assert!(corners[2][2] > corners[2][0] && corners[2][2] > corners[2][1]);
}

#[test]
fn failed_variations_fall_back_to_fitted_background() {
    let opts = CompositorOpts {
        canvas: Canvas::new(100, 100).unwrap(),
        threads: Some(1),
        ..CompositorOpts::default()
    };
    let recipe = Recipe::Flat {
        category: Default::default(),
    };
    let lifestyle = Recipe::Lifestyle(LifestyleParams::default());

    // Flat placement has no minimum canvas; the scene-driven pipelines do.
    let ok = render_variations(&backgrounds(), &cutout(), &recipe, &opts).unwrap();
    assert!(ok.iter().all(VariationOutcome::composited));

    let out = render_variations(&backgrounds(), &cutout(), &lifestyle, &opts).unwrap();
    assert_eq!(out.len(), 3);
    for (o, bg) in out.iter().zip(backgrounds()) {
        assert!(!o.composited());
        assert_eq!(o.placement(), None);
        assert_eq!(o.image().size(), opts.canvas);
        assert_eq!(o.image().pixel(50, 50), bg.pixel(0, 0));
        match o {
            VariationOutcome::Fallback { error, .. } => {
                assert!(matches!(error, ThumbError::Geometry(_)));
            }
            VariationOutcome::Composited(_) => unreachable!(),
        }
    }
}

#[test]
fn empty_batch_and_zero_threads() {
    let recipe = Recipe::Lifestyle(LifestyleParams::default());
    let none = render_variations(&[], &cutout(), &recipe, &CompositorOpts::default()).unwrap();
    assert!(none.is_empty());

    let opts = CompositorOpts {
        threads: Some(0),
        ..CompositorOpts::default()
    };
    let err = render_variations(&backgrounds(), &cutout(), &recipe, &opts).unwrap_err();
    assert!(matches!(err, ThumbError::Validation(_)));
}

#[test]
fn invalid_canvas_is_rejected_before_any_variation() {
    let opts = CompositorOpts {
        canvas: Canvas {
            width: 0,
            height: 0,
        },
        threads: Some(1),
        ..CompositorOpts::default()
    };
    let odd = [Raster::solid(37, 23, [9, 9, 9, 255]).unwrap()];
    let recipe = Recipe::Flat {
        category: Default::default(),
    };
    let err = render_variations(&odd, &cutout(), &recipe, &opts).unwrap_err();
    assert!(matches!(err, ThumbError::Geometry(_)), "{err}");
}
