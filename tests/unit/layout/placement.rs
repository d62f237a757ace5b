use super::*;

const CANVASES: [(u32, u32); 6] = [
    (1280, 720),
    (720, 1280),
    (1080, 1080),
    (240, 240),
    (400, 300),
    (3840, 2160),
];

const CUTOUTS: [(u32, u32); 7] = [
    (200, 300),
    (300, 200),
    (1, 1000),
    (1000, 1),
    (5000, 5000),
    (10, 10),
    (4000, 2500),
];

#[test]
fn placement_stays_inside_margins_with_floor() {
    for (cw, ch) in CANVASES {
        let canvas = Canvas::new(cw, ch).unwrap();
        for (w, h) in CUTOUTS {
            for intent in PlacementIntent::ALL {
                for ratio in [None, Some(0.05), Some(0.35), Some(0.9), Some(f64::NAN)] {
                    let b = resolve_placement(canvas, w, h, intent, ratio).unwrap();
                    assert!(
                        b.is_inside(canvas, EDGE_MARGIN),
                        "{b:?} escapes {canvas:?} for cutout {w}x{h} {intent}"
                    );
                    assert!(b.width >= MIN_SUBJECT_SIDE && b.height >= MIN_SUBJECT_SIDE);
                }
            }
        }
    }
}

#[test]
fn tall_cutout_fills_85_percent_height() {
    let b = resolve_placement(Canvas::STANDARD, 200, 300, PlacementIntent::Center, None).unwrap();
    assert_eq!(b.height, 612);
    assert_eq!(b.width, 408);
    assert_eq!(b.x, 436);
    assert_eq!(b.y, 54);
}

#[test]
fn tall_cutout_is_reclamped_to_target_width() {
    let b = resolve_placement(Canvas::STANDARD, 300, 310, PlacementIntent::Center, Some(0.2))
        .unwrap();
    assert_eq!(b.width, 256);
    assert_eq!(b.height, 265);
}

#[test]
fn wide_cutout_fits_target_width_then_caps_height() {
    let b = resolve_placement(Canvas::STANDARD, 400, 200, PlacementIntent::Center, None).unwrap();
    assert_eq!(b.width, 512);
    assert_eq!(b.height, 256);

    let canvas = Canvas::new(1280, 300).unwrap();
    let b = resolve_placement(canvas, 1100, 1000, PlacementIntent::Center, Some(0.6)).unwrap();
    assert_eq!(b.height, 240);
    assert_eq!(b.width, 264);
}

#[test]
fn thirds_are_horizontally_offset() {
    let right =
        resolve_placement(Canvas::STANDARD, 200, 300, PlacementIntent::RightThird, None).unwrap();
    let left =
        resolve_placement(Canvas::STANDARD, 200, 300, PlacementIntent::LeftThird, None).unwrap();
    assert!(right.x > 600);
    assert!(left.x < 500);
    assert_eq!(right.y, left.y);
}

#[test]
fn center_bottom_rests_on_surface_line() {
    let b = resolve_placement(
        Canvas::STANDARD,
        400,
        200,
        PlacementIntent::CenterBottom,
        None,
    )
    .unwrap();
    assert_eq!(b.bottom(), 468);
    assert_eq!(b.x, (1280 - b.width) / 2);
}

#[test]
fn product_space_ratio_is_clamped() {
    assert_eq!(width_ratio(Some(0.05)), 0.2);
    assert_eq!(width_ratio(Some(0.9)), 0.6);
    assert_eq!(width_ratio(Some(0.3)), 0.3);
    assert_eq!(width_ratio(None), DEFAULT_WIDTH_RATIO);
    assert_eq!(width_ratio(Some(f64::INFINITY)), DEFAULT_WIDTH_RATIO);
}

#[test]
fn degenerate_inputs_are_geometry_errors() {
    let err = resolve_placement(Canvas::STANDARD, 0, 10, PlacementIntent::Center, None)
        .unwrap_err();
    assert!(matches!(err, ThumbError::Geometry(_)));

    let small = Canvas::new(239, 720).unwrap();
    assert!(matches!(
        resolve_placement(small, 10, 10, PlacementIntent::Center, None),
        Err(ThumbError::Geometry(_))
    ));

    let zero = Canvas {
        width: 0,
        height: 10,
    };
    assert!(resolve_flat_placement(zero, 10, 10).is_err());
}

#[test]
fn flat_placement_is_right_aligned_and_centered() {
    let b = resolve_flat_placement(Canvas::STANDARD, 300, 200).unwrap();
    assert_eq!(b.width, 576);
    assert_eq!(b.height, 384);
    assert_eq!(b.right(), 1280 - 64);
    assert_eq!(b.y, 168);

    let tall = resolve_flat_placement(Canvas::STANDARD, 200, 300).unwrap();
    assert_eq!(tall.height, 648);
    assert_eq!(tall.width, 432);
    assert_eq!(tall.y, 36);
}

#[test]
fn flat_placement_stays_on_canvas() {
    for (cw, ch) in CANVASES {
        let canvas = Canvas::new(cw, ch).unwrap();
        for (w, h) in CUTOUTS {
            let b = resolve_flat_placement(canvas, w, h).unwrap();
            assert!(b.is_inside(canvas, 0), "{b:?} escapes {canvas:?}");
        }
    }
}

#[test]
fn intent_parsing_strict_and_lenient() {
    assert_eq!(
        "Right_Third".parse::<PlacementIntent>().unwrap(),
        PlacementIntent::RightThird
    );
    assert_eq!(
        " center-bottom ".parse::<PlacementIntent>().unwrap(),
        PlacementIntent::CenterBottom
    );
    assert!("diagonal".parse::<PlacementIntent>().is_err());
    assert_eq!(PlacementIntent::from_label("diagonal"), PlacementIntent::Center);

    let json = serde_json::to_string(&PlacementIntent::LeftThird).unwrap();
    assert_eq!(json, "\"left-third\"");
    let back: PlacementIntent = serde_json::from_str("\"LEFT-THIRD\"").unwrap();
    assert_eq!(back, PlacementIntent::LeftThird);
}

#[test]
fn vignette_centers_are_exact() {
    assert_eq!(PlacementIntent::Center.vignette_center(), Point::new(0.5, 0.55));
    assert_eq!(
        PlacementIntent::RightThird.vignette_center(),
        Point::new(0.67, 0.55)
    );
    assert_eq!(
        PlacementIntent::LeftThird.vignette_center(),
        Point::new(0.33, 0.55)
    );
    assert_eq!(
        PlacementIntent::CenterBottom.vignette_center(),
        Point::new(0.5, 0.7)
    );
}
