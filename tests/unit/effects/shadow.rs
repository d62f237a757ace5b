use super::*;
use crate::foundation::error::ThumbError;

fn cutout() -> Raster {
    // 20x20 transparent frame around an opaque 10x10 red square.
    let (w, h) = (20u32, 20u32);
    let mut data = vec![0u8; (w * h * 4) as usize];
    for y in 5..15 {
        for x in 5..15 {
            let i = ((y * w + x) * 4) as usize;
            data[i..i + 4].copy_from_slice(&[255, 0, 0, 255]);
        }
    }
    Raster::from_premul_rgba8(w, h, data).unwrap()
}

fn preset(blur_radius: f32, opacity: f32) -> ShadowPreset {
    ShadowPreset {
        blur_radius,
        offset_x: 10,
        offset_y: 15,
        opacity,
    }
}

#[test]
fn shadow_is_black_silhouette_scaled_by_opacity() {
    let p = preset(2.0, 0.4);
    let s = synthesize_shadow(&cutout(), &p).unwrap();
    let m = shadow_margin(&p);
    assert_eq!(m, 2);
    assert_eq!((s.width(), s.height()), (24, 24));
    let center = s.pixel(10 + m, 10 + m).unwrap();
    assert_eq!(&center[..3], &[0, 0, 0]);
    assert_eq!(center[3], 102);
    assert_eq!(s.pixel(0, 0), Some([0, 0, 0, 0]));
    assert!(s.data().chunks_exact(4).all(|px| px[..3] == [0, 0, 0]));
}

#[test]
fn shadow_blur_softens_edges() {
    let sharp_p = preset(0.0, 1.0);
    let soft_p = preset(4.0, 1.0);
    let sharp = synthesize_shadow(&cutout(), &sharp_p).unwrap();
    let soft = synthesize_shadow(&cutout(), &soft_p).unwrap();
    let (sm, fm) = (shadow_margin(&sharp_p), shadow_margin(&soft_p));
    assert_eq!(sharp.pixel(4 + sm, 10 + sm).unwrap()[3], 0);
    assert!(soft.pixel(4 + fm, 10 + fm).unwrap()[3] > 0);
    assert!(soft.pixel(5 + fm, 10 + fm).unwrap()[3] < 255);
}

#[test]
fn edge_to_edge_subject_casts_a_soft_fringe() {
    let block = Raster::solid(12, 12, [200, 30, 30, 255]).unwrap();
    let p = preset(4.0, 1.0);
    let s = synthesize_shadow(&block, &p).unwrap();
    let m = shadow_margin(&p);
    assert_eq!(m, 4);
    assert_eq!((s.width(), s.height()), (20, 20));

    // Coverage leaks past the subject's own bounds and fades toward the border.
    let outside = s.pixel(m - 1, 10).unwrap()[3];
    let edge = s.pixel(m, 10).unwrap()[3];
    let interior = s.pixel(10, 10).unwrap()[3];
    assert!(outside > 0, "outside {outside}");
    assert!(outside < edge && edge < interior, "{outside} {edge} {interior}");
    assert_eq!(s.pixel(0, 0).unwrap()[3], 0);
}

#[test]
fn tiny_blur_is_raised_not_rejected() {
    let p = preset(-3.0, 0.5);
    let s = synthesize_shadow(&cutout(), &p).unwrap();
    let m = shadow_margin(&p);
    assert_eq!(m, 1);
    assert_eq!(s.pixel(10 + m, 10 + m).unwrap()[3], 128);
}

#[test]
fn shadow_layer_is_offset_and_clamped() {
    let bbox = BoundingBox {
        x: 100,
        y: 50,
        width: 20,
        height: 20,
    };
    let layer = shadow_layer(&cutout(), bbox, &preset(2.0, 0.3)).unwrap();
    assert_eq!((layer.top, layer.left), (63, 108));

    let mut p = preset(2.0, 0.3);
    p.offset_x = -500;
    p.offset_y = -500;
    let layer = shadow_layer(&cutout(), bbox, &p).unwrap();
    assert_eq!((layer.top, layer.left), (-2, -2));
}

#[test]
fn reflection_is_flipped_dimmed_and_faded() {
    let mut data = vec![0u8; 4 * 2 * 4];
    for px in data[..16].chunks_exact_mut(4) {
        px.copy_from_slice(&[255, 255, 255, 255]);
    }
    let top_white = Raster::from_premul_rgba8(4, 2, data).unwrap();
    let r = synthesize_reflection(&top_white).unwrap();
    let bottom = r.pixel(1, 1).unwrap();
    let top = r.pixel(1, 0).unwrap();
    assert!(bottom[3] > top[3]);
    assert!(bottom[3] <= 77);
    assert!(bottom[0] <= bottom[3] / 2);
}

#[test]
fn reflection_sits_below_subject_but_above_bottom_guard() {
    let canvas = Canvas::STANDARD;
    let bbox = BoundingBox {
        x: 400,
        y: 100,
        width: 20,
        height: 20,
    };
    let layer = reflection_layer(&cutout(), bbox, canvas).unwrap();
    assert_eq!((layer.top, layer.left), (120, 400));

    let low = BoundingBox {
        y: 660,
        ..bbox
    };
    let layer = reflection_layer(&cutout(), low, canvas).unwrap();
    assert_eq!(layer.top, 670);
}

#[test]
fn optional_layer_drops_failures() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let ok = Layer::new(cutout(), 0, 0);
    assert!(optional_layer("reflection", Ok(ok)).is_some());
    assert!(optional_layer("reflection", Err(ThumbError::effect("boom"))).is_none());
}
