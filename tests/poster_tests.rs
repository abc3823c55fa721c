//! # Poster Tests
//!
//! Whole-poster builds against fixed-width faces, so every coordinate in the
//! draw log can be checked by hand.
//!
//! With the default spec on an 800×1200 canvas (margin 25):
//!
//! ```text
//! cover 400×300   → 750×562 at (25, 25), cursor 587
//! primary  28 px  → gap 30, line height 35, first baseline 652
//! secondary 28 px → gap 20, line height 35
//! QR 200×200      → (575, 975); labels 22 px at baselines 1119 and 1169
//! ```

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use placard::config::Color;
use placard::poster::{PosterBuilder, PosterRequest};
use placard::render::{DrawOp, ImageRole};
use placard::text::{BreakThreshold, Caption, FixedFontBook};
use placard::{PosterError, PosterSpec};
use pretty_assertions::assert_eq;

const ROAD: &str = "世上本没有路";
const HOPE: &str = "Hope can set you free.";

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn fonts(spec: &PosterSpec) -> FixedFontBook {
    FixedFontBook::new(&[spec.font_family.as_str()])
}

fn solid(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)))
}

fn request(primary: &str, secondary: Option<&str>) -> PosterRequest {
    PosterRequest {
        background: RgbImage::from_pixel(800, 1200, Rgb([255, 255, 255])),
        cover: solid(400, 300, [200, 30, 30, 255]),
        qr: solid(200, 200, [0, 0, 0, 255]),
        primary: Caption::cjk(primary),
        secondary: secondary.map(Caption::latin),
    }
}

fn text_ops(layout: &[DrawOp]) -> Vec<(i64, String)> {
    layout
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { y, text, .. } => Some((*y, text.clone())),
            DrawOp::Image { .. } => None,
        })
        .collect()
}

// ============================================================================
// LAYOUT
// ============================================================================

#[test]
fn test_default_poster_layout() {
    let spec = PosterSpec::default();
    let poster = PosterBuilder::new(&spec, &fonts(&spec))
        .build(request(ROAD, Some(HOPE)))
        .unwrap();

    let grey = Color::rgb(71, 71, 71);
    assert_eq!(
        poster.layout,
        vec![
            DrawOp::Image {
                role: ImageRole::Cover,
                x: 25,
                y: 25,
                width: 750,
                height: 562,
            },
            DrawOp::Text {
                x: 25,
                y: 652,
                text: ROAD.to_string(),
                color: grey,
            },
            DrawOp::Text {
                x: 25,
                y: 707,
                text: format!("{} ", HOPE),
                color: Color::rgb(157, 157, 157),
            },
            DrawOp::Image {
                role: ImageRole::QrCode,
                x: 575,
                y: 975,
                width: 200,
                height: 200,
            },
            DrawOp::Text {
                x: 25,
                y: 1119,
                text: "SuchJack".to_string(),
                color: grey,
            },
            DrawOp::Text {
                x: 25,
                y: 1169,
                text: "一个幽默的程序员".to_string(),
                color: grey,
            },
        ]
    );
}

#[test]
fn test_long_captions_push_cursor_down() {
    let spec = PosterSpec::default();
    let primary = "路".repeat(40);
    let secondary = "Fear can hold you prisoner. ".repeat(3);
    let poster = PosterBuilder::new(&spec, &fonts(&spec))
        .build(request(&primary, Some(&secondary)))
        .unwrap();

    // 28 px per character on 750 px: the 26th character reaches 722
    let texts = text_ops(&poster.layout);
    assert_eq!(texts[0], (652, "路".repeat(26)));
    assert_eq!(texts[1], (687, "路".repeat(14)));
    // Secondary starts one gap plus one line below the last primary line
    assert_eq!(texts[2].0, 742);
    // "prisoner." would end at 756 px
    assert_eq!(texts[2].1, "Fear can hold you ");
    // QR labels stay anchored to the bottom
    assert_eq!(texts[texts.len() - 2].0, 1119);
    assert_eq!(texts[texts.len() - 1].0, 1169);
}

#[test]
fn test_exact_fit_threshold_from_config() {
    let spec = PosterSpec::from_toml(r#"break_threshold = "exact_fit""#).unwrap();
    assert_eq!(spec.break_threshold, BreakThreshold::ExactFit);

    // 30 characters of 25 px fill 750 px exactly
    let mut spec = spec;
    spec.primary.size = 25.0;
    let primary = "路".repeat(40);
    let poster = PosterBuilder::new(&spec, &fonts(&spec))
        .build(request(&primary, None))
        .unwrap();

    let texts = text_ops(&poster.layout);
    assert_eq!(texts[0].1, "路".repeat(30));
    assert_eq!(texts[1].1, "路".repeat(10));
}

#[test]
fn test_missing_secondary_skips_its_gap() {
    let spec = PosterSpec::default();
    let with_empty = PosterBuilder::new(&spec, &fonts(&spec))
        .build(request(ROAD, Some("")))
        .unwrap();
    let without = PosterBuilder::new(&spec, &fonts(&spec))
        .build(request(ROAD, None))
        .unwrap();

    assert_eq!(with_empty.layout, without.layout);
    assert_eq!(without.layout.len(), 5);
}

#[test]
fn test_layout_json() {
    let spec = PosterSpec::default();
    let poster = PosterBuilder::new(&spec, &fonts(&spec))
        .build(request(ROAD, None))
        .unwrap();

    let json = serde_json::to_value(&poster.layout).unwrap();
    assert_eq!(
        json[0],
        serde_json::json!({
            "kind": "image",
            "role": "cover",
            "x": 25,
            "y": 25,
            "width": 750,
            "height": 562,
        })
    );
    assert_eq!(json[1]["kind"], "text");
    assert_eq!(json[1]["y"], 652);
    assert_eq!(json[1]["color"], "#474747");
    assert_eq!(json[2]["role"], "qr_code");
}

// ============================================================================
// PIXELS
// ============================================================================

#[test]
fn test_poster_pixels() {
    let spec = PosterSpec::default();
    let poster = PosterBuilder::new(&spec, &fonts(&spec))
        .build(request(ROAD, Some(HOPE)))
        .unwrap();
    let image = &poster.image;

    assert_eq!(image.dimensions(), (800, 1200));
    // Margins stay background
    assert_eq!(*image.get_pixel(5, 5), Rgb([255, 255, 255]));
    assert_eq!(*image.get_pixel(790, 600), Rgb([255, 255, 255]));
    // Cover
    assert_eq!(*image.get_pixel(400, 300), Rgb([200, 30, 30]));
    // First primary glyph box sits above its baseline
    assert_eq!(*image.get_pixel(30, 640), Rgb([71, 71, 71]));
    // First secondary glyph
    assert_eq!(*image.get_pixel(30, 695), Rgb([157, 157, 157]));
    // QR block
    assert_eq!(*image.get_pixel(675, 1075), Rgb([0, 0, 0]));
    assert_eq!(*image.get_pixel(570, 1075), Rgb([255, 255, 255]));
}

#[test]
fn test_builds_are_deterministic() {
    let spec = PosterSpec::default();
    let fonts = fonts(&spec);
    let first = PosterBuilder::new(&spec, &fonts)
        .build(request(ROAD, Some(HOPE)))
        .unwrap();
    let second = PosterBuilder::new(&spec, &fonts)
        .build(request(ROAD, Some(HOPE)))
        .unwrap();

    assert_eq!(first.layout, second.layout);
    assert_eq!(first.image, second.image);
}

// ============================================================================
// FAILURES
// ============================================================================

#[test]
fn test_unknown_family_fails_before_drawing() {
    let spec = PosterSpec::default();
    let fonts = FixedFontBook::new(&["Noto Sans CJK SC"]);
    let err = PosterBuilder::new(&spec, &fonts)
        .build(request(ROAD, Some(HOPE)))
        .unwrap_err();

    assert!(matches!(err, PosterError::FontUnavailable(ref family) if family == "Microsoft YaHei"));
}

#[test]
fn test_oversized_qr_is_rejected() {
    let spec = PosterSpec::default();
    let mut request = request(ROAD, None);
    request.qr = solid(780, 200, [0, 0, 0, 255]);
    let err = PosterBuilder::new(&spec, &fonts(&spec))
        .build(request)
        .unwrap_err();

    assert!(matches!(err, PosterError::InvalidImage(_)));
}

#[test]
fn test_zero_sized_cover_is_rejected() {
    let spec = PosterSpec::default();
    let mut request = request(ROAD, None);
    request.cover = DynamicImage::new_rgb8(0, 0);
    let err = PosterBuilder::new(&spec, &fonts(&spec))
        .build(request)
        .unwrap_err();

    assert!(matches!(err, PosterError::InvalidImage(_)));
}
