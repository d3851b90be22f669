use std::path::PathBuf;

use captiongen::{FontEngine, Origin, ParleyFontEngine, Rgba8, Surface};

fn system_font_bytes() -> Option<Vec<u8>> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|p| p.is_file())
    .and_then(|p| std::fs::read(p).ok())
}

fn dark_pixels(surface: &Surface, rows: std::ops::Range<u32>) -> usize {
    let mut n = 0;
    for y in rows {
        for x in 0..surface.width() {
            if surface.pixel(x, y).is_some_and(|px| px[0] < 128) {
                n += 1;
            }
        }
    }
    n
}

fn rightmost_dark_x(surface: &Surface) -> Option<u32> {
    (0..surface.width()).rev().find(|&x| {
        (0..surface.height()).any(|y| surface.pixel(x, y).is_some_and(|px| px[0] < 128))
    })
}

#[test]
fn draws_glyphs_above_the_baseline() {
    let Some(bytes) = system_font_bytes() else {
        eprintln!("no system font found; skipping");
        return;
    };

    let mut engine = ParleyFontEngine::new();
    let font = engine.parse(&bytes).unwrap();
    assert!(!font.family().trim().is_empty());

    let mut surface = Surface::new(200, 40).unwrap();
    surface.fill(Rgba8::WHITE);
    let advance = engine
        .draw(
            &mut surface,
            "HHHHHHHH",
            Origin::from_px(10, 30),
            &font,
            14.0,
            Rgba8::BLACK,
        )
        .unwrap();

    assert!(advance.width_px > 40.0, "advance {}", advance.width_px);
    assert!(advance.pen.x > Origin::from_px(10, 30).x);
    assert!(dark_pixels(&surface, 18..30) > 0);
    assert_eq!(dark_pixels(&surface, 31..40), 0);

    // Ink spans the whole run, not just the first glyph cell.
    let right = rightmost_dark_x(&surface).unwrap() as f32;
    assert!(right >= 10.0 + advance.width_px * 0.75, "ink ends at x={right}");
    assert!(right <= 10.0 + advance.width_px + 2.0, "ink ends at x={right}");
}

#[test]
fn newline_in_text_stays_on_the_baseline() {
    let Some(bytes) = system_font_bytes() else {
        return;
    };

    let mut engine = ParleyFontEngine::new();
    let font = engine.parse(&bytes).unwrap();
    let mut surface = Surface::new(120, 90).unwrap();
    surface.fill(Rgba8::WHITE);

    engine
        .draw(
            &mut surface,
            "HH\nHH",
            Origin::from_px(10, 30),
            &font,
            14.0,
            Rgba8::BLACK,
        )
        .unwrap();

    assert!(dark_pixels(&surface, 18..30) > 0);
    assert_eq!(dark_pixels(&surface, 31..90), 0);
}

#[test]
fn line_below_the_surface_draws_nothing_but_still_advances() {
    let Some(bytes) = system_font_bytes() else {
        return;
    };

    let mut engine = ParleyFontEngine::new();
    let font = engine.parse(&bytes).unwrap();
    let mut surface = Surface::new(60, 20).unwrap();
    surface.fill(Rgba8::WHITE);

    let advance = engine
        .draw(
            &mut surface,
            "HH",
            Origin::from_px(5, 500),
            &font,
            14.0,
            Rgba8::BLACK,
        )
        .unwrap();

    assert!(advance.width_px > 0.0);
    assert!(surface.data().iter().all(|&b| b == 255));
}

#[test]
fn consecutive_lines_do_not_disturb_rows_above() {
    let Some(bytes) = system_font_bytes() else {
        return;
    };

    let mut engine = ParleyFontEngine::new();
    let font = engine.parse(&bytes).unwrap();
    let mut surface = Surface::new(100, 80).unwrap();
    surface.fill(Rgba8::WHITE);

    engine
        .draw(&mut surface, "HH", Origin::from_px(10, 20), &font, 14.0, Rgba8::BLACK)
        .unwrap();
    let first = surface.data().to_vec();
    engine
        .draw(&mut surface, "HH", Origin::from_px(10, 60), &font, 14.0, Rgba8::BLACK)
        .unwrap();

    let row_bytes = 100 * 4;
    assert_eq!(&surface.data()[..21 * row_bytes], &first[..21 * row_bytes]);
    assert!(dark_pixels(&surface, 48..60) > 0);
}

#[test]
fn empty_string_is_a_no_op() {
    let Some(bytes) = system_font_bytes() else {
        return;
    };

    let mut engine = ParleyFontEngine::new();
    let font = engine.parse(&bytes).unwrap();
    let mut surface = Surface::new(8, 8).unwrap();
    surface.fill(Rgba8::WHITE);

    let origin = Origin::from_px(1, 6);
    let advance = engine
        .draw(&mut surface, "", origin, &font, 14.0, Rgba8::BLACK)
        .unwrap();
    assert_eq!(advance.pen, origin);
    assert!(surface.data().iter().all(|&b| b == 255));
}
