//! # Rendering Scenarios
//!
//! End-to-end checks on rendered cards: frame geometry, optional elements,
//! background image coverage, and agreement between painted text and the
//! hit regions the editor drags by.

use image::{Rgba, RgbaImage};
use pretty_assertions::assert_eq;
use quotecard::font::FontBook;
use quotecard::hit_test::Element;
use quotecard::layout::CardLayout;
use quotecard::render::{BackgroundImage, ImageTransform, Scene, render_card};
use quotecard::style::{Color, ContentStrings, ManualOffsets, StyleParameters};

fn at(image: &RgbaImage, x: u32, y: u32) -> Color {
    let [r, g, b, _] = image.get_pixel(x, y).0;
    Color::rgb(r, g, b)
}

fn two_quote_style() -> StyleParameters {
    StyleParameters {
        enable_quote2: true,
        ..Default::default()
    }
}

fn two_quote_content() -> ContentStrings {
    ContentStrings::new("Credința ne ține drepți când vântul bate din toate părțile")
        .with_quote2("Iar speranța aprinde lumina în casele noastre")
        .with_author("Ion Popescu")
}

/// Every interior pixel that differs from the card color and is not part of
/// a divider must fall inside the hit region of some text block.
fn assert_ink_is_hittable(style: &StyleParameters, content: &ContentStrings, offsets: &ManualOffsets) {
    let fonts = FontBook::new();
    let layout = CardLayout::compute(style, content, offsets, &fonts);
    let image = render_card(&Scene::new(style, content, offsets), &fonts);

    let interior = layout.frame.interior;
    let dividers = layout.divider_rects();
    let regions: Vec<_> = layout.blocks().filter_map(|b| b.hit_rect()).collect();
    let mut inked = 0;

    for y in interior.y as u32..interior.bottom() as u32 {
        for x in interior.x as u32..interior.right() as u32 {
            if at(&image, x, y) == style.card_color {
                continue;
            }
            let (cx, cy) = (x as f32 + 0.5, y as f32 + 0.5);
            if dividers.iter().any(|d| d.contains(cx, cy)) {
                continue;
            }
            inked += 1;
            assert!(
                regions.iter().any(|r| r.contains(cx, cy)),
                "ink at ({}, {}) outside every hit region",
                x,
                y
            );
        }
    }

    assert!(inked > 0, "expected some text to be painted");
}

#[test]
fn test_frame_bands_on_custom_size() {
    let style = StyleParameters {
        card_width: 600,
        card_height: 800,
        ..Default::default()
    };
    let image = render_card(
        &Scene::new(&style, &ContentStrings::default(), &ManualOffsets::default()),
        &FontBook::new(),
    );

    assert_eq!(image.dimensions(), (600, 800));
    for (x, y) in [(10, 10), (37, 400), (590, 790)] {
        assert_eq!(at(&image, x, y), style.bg_color, "margin at ({}, {})", x, y);
    }
    // Right edge bands mirror the left ones
    assert_eq!(at(&image, 600 - 40, 400), Color::rgb(0xFF, 0x00, 0x00));
    assert_eq!(at(&image, 600 - 45, 400), Color::rgb(0xFF, 0xE5, 0x00));
    assert_eq!(at(&image, 600 - 50, 400), Color::rgb(0x02, 0x87, 0xFF));
    assert_eq!(at(&image, 300, 800 - 54), style.card_color);
}

#[test]
fn test_without_borders_interior_starts_at_margin() {
    let style = StyleParameters {
        enable_colored_borders: false,
        ..Default::default()
    };
    let image = render_card(
        &Scene::new(&style, &ContentStrings::default(), &ManualOffsets::default()),
        &FontBook::new(),
    );
    assert_eq!(at(&image, 37, 500), style.bg_color);
    assert_eq!(at(&image, 38, 500), style.card_color);
}

#[test]
fn test_hidden_dividers_are_not_painted() {
    let style = StyleParameters {
        show_dividers: false,
        ..two_quote_style()
    };
    let content = two_quote_content();
    let fonts = FontBook::new();
    let layout = CardLayout::compute(&style, &content, &ManualOffsets::default(), &fonts);
    let image = render_card(&Scene::new(&style, &content, &ManualOffsets::default()), &fonts);

    assert!(layout.divider_rects().is_empty());
    // Still grabbable even though it is not drawn
    let divider_y = layout.divider1_y.unwrap();
    assert_eq!(layout.hit_test(layout.frame.center_x(), divider_y), Some(Element::Divider1));
    // Divider edge pixels sit outside any text column
    let (left, _) = layout.frame.divider_span();
    assert_ne!(at(&image, left as u32 + 1, divider_y as u32), style.divider_color);
}

#[test]
fn test_second_quote_only_when_enabled() {
    let content = two_quote_content();
    let fonts = FontBook::new();

    let single = CardLayout::compute(&StyleParameters::default(), &content, &ManualOffsets::default(), &fonts);
    assert!(single.quote2.is_none());
    assert!(single.divider1_y.is_none());

    let double = CardLayout::compute(&two_quote_style(), &content, &ManualOffsets::default(), &fonts);
    let quote2 = double.quote2.as_ref().unwrap();
    assert!(double.quote1.start_y < double.divider1_y.unwrap());
    assert!(double.divider1_y.unwrap() < quote2.start_y);

    // Blank second quote is treated as absent
    let blank = ContentStrings::new("Doar unul").with_quote2("   ");
    let layout = CardLayout::compute(&two_quote_style(), &blank, &ManualOffsets::default(), &fonts);
    assert!(layout.quote2.is_none());
}

#[test]
fn test_ink_matches_hit_regions() {
    assert_ink_is_hittable(&two_quote_style(), &two_quote_content(), &ManualOffsets::default());
}

#[test]
fn test_ink_matches_hit_regions_after_dragging() {
    let offsets = ManualOffsets {
        quote1_offset: -120.0,
        quote2_offset: 75.0,
        author_offset: -30.0,
        divider1_offset: 12.0,
    };
    assert_ink_is_hittable(&two_quote_style(), &two_quote_content(), &offsets);
}

#[test]
fn test_ink_matches_hit_regions_for_overflowing_word() {
    let style = StyleParameters {
        card_width: 400,
        quote1_size: 90,
        ..Default::default()
    };
    let content = ContentStrings::new("Neînfricații");
    assert_ink_is_hittable(&style, &content, &ManualOffsets::default());
}

#[test]
fn test_background_covers_interior_whatever_the_pan() {
    let red = BackgroundImage::from_rgba(RgbaImage::from_pixel(40, 20, Rgba([255, 0, 0, 255]))).unwrap();
    let style = StyleParameters::default();
    let content = ContentStrings::default();
    let offsets = ManualOffsets::default();
    let fonts = FontBook::new();
    let interior = CardLayout::compute(&style, &content, &offsets, &fonts).frame.interior;

    for (pan_x, pan_y) in [(0.0, 0.0), (10_000.0, 0.0), (-10_000.0, 10_000.0), (0.0, -500.0)] {
        let transform = ImageTransform {
            pan_x,
            pan_y,
            opacity: 1.0,
            ..Default::default()
        };
        let image = render_card(
            &Scene::new(&style, &content, &offsets).with_background(&red, &transform),
            &fonts,
        );

        let (x0, y0) = (interior.x as u32 + 2, interior.y as u32 + 2);
        let (x1, y1) = (interior.right() as u32 - 3, interior.bottom() as u32 - 3);
        for (x, y) in [(x0, y0), (x1, y0), (x0, y1), (x1, y1), (485, 537)] {
            assert_eq!(
                at(&image, x, y),
                Color::rgb(255, 0, 0),
                "pan ({}, {}) left ({}, {}) uncovered",
                pan_x,
                pan_y,
                x,
                y
            );
        }
        // Outside the interior the image never shows
        assert_eq!(at(&image, 5, 5), style.bg_color);
    }
}

#[test]
fn test_background_opacity_blends_over_card() {
    let black = BackgroundImage::from_rgba(RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]))).unwrap();
    let style = StyleParameters {
        card_color: Color::WHITE,
        ..Default::default()
    };
    let transform = ImageTransform::default();
    let image = render_card(
        &Scene::new(&style, &ContentStrings::default(), &ManualOffsets::default())
            .with_background(&black, &transform),
        &FontBook::new(),
    );

    // Default opacity 0.3 over white
    let Color { r, .. } = at(&image, 100, 100);
    assert!((177..=180).contains(&r), "got {}", r);
}

#[test]
fn test_generated_image_sizes_cover_awkward_cards() {
    // Card sizes where the cover-fit side rounds a hair short of the interior
    let cards = [(582, 939, true), (890, 1478, true), (1072, 1819, false)];
    let fonts = FontBook::new();
    let content = ContentStrings::new("Lumina");
    let offsets = ManualOffsets::default();
    let transform = ImageTransform {
        opacity: 1.0,
        ..Default::default()
    };

    for (image_w, image_h) in [(1024, 1792), (1792, 1024), (1024, 1024)] {
        let bitmap = RgbaImage::from_pixel(image_w, image_h, Rgba([0, 255, 0, 255]));
        let green = BackgroundImage::from_rgba(bitmap).unwrap();
        for (card_width, card_height, borders) in cards {
            let style = StyleParameters {
                card_width,
                card_height,
                enable_colored_borders: borders,
                ..Default::default()
            };
            let interior = CardLayout::compute(&style, &content, &offsets, &fonts).frame.interior;
            let image = render_card(
                &Scene::new(&style, &content, &offsets).with_background(&green, &transform),
                &fonts,
            );

            let (x0, y0) = (interior.x as u32, interior.y as u32);
            let (x1, y1) = (interior.right() as u32 - 1, interior.bottom() as u32 - 1);
            for (x, y) in [(x0, y0), (x1, y0), (x0, y1), (x1, y1)] {
                assert_eq!(
                    at(&image, x, y),
                    Color::rgb(0, 255, 0),
                    "{}x{} image on {}x{} card left ({}, {}) uncovered",
                    image_w,
                    image_h,
                    card_width,
                    card_height,
                    x,
                    y
                );
            }
        }
    }
}
