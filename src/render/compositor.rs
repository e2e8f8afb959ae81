//! Card compositor: paints a [`CardLayout`] into an RGBA bitmap.
//!
//! Paint order:
//!
//! 1. Background color over the whole canvas
//! 2. Colored border bands (red, yellow, blue; outermost first)
//! 3. Card interior in the card color
//! 4. Background image, clipped to the interior
//! 5. Dividers
//! 6. Quote 1, quote 2 and author lines, centered
//!
//! Text is clipped to each block's hit region, so every painted glyph
//! pixel can be picked up by the hit tester.

use image::RgbaImage;

use super::background::{BackgroundImage, ImageTransform};
use super::canvas::Canvas;
use crate::font::FontBook;
use crate::layout::CardLayout;
use crate::layout::card::BORDER_WIDTH;
use crate::style::{ContentStrings, ManualOffsets, StyleParameters};

/// Everything a render depends on, borrowed.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub style: &'a StyleParameters,
    pub content: &'a ContentStrings,
    pub offsets: &'a ManualOffsets,
    pub background: Option<(&'a BackgroundImage, &'a ImageTransform)>,
}

impl<'a> Scene<'a> {
    pub fn new(
        style: &'a StyleParameters,
        content: &'a ContentStrings,
        offsets: &'a ManualOffsets,
    ) -> Self {
        Self {
            style,
            content,
            offsets,
            background: None,
        }
    }

    pub fn with_background(mut self, image: &'a BackgroundImage, transform: &'a ImageTransform) -> Self {
        self.background = Some((image, transform));
        self
    }

    pub fn layout(&self, fonts: &FontBook) -> CardLayout {
        CardLayout::compute(self.style, self.content, self.offsets, fonts)
    }
}

/// Render a scene to a fresh bitmap.
pub fn render_card(scene: &Scene<'_>, fonts: &FontBook) -> RgbaImage {
    let layout = scene.layout(fonts);
    paint_layout(&layout, scene, fonts).into_image()
}

/// Paint an already computed layout.
pub fn paint_layout(layout: &CardLayout, scene: &Scene<'_>, fonts: &FontBook) -> Canvas {
    let style = scene.style;
    let frame = &layout.frame;

    let mut canvas = Canvas::new(style.card_width, style.card_height, style.bg_color);

    for (outer, color) in frame.border_bands() {
        canvas.fill_band(outer, BORDER_WIDTH, color);
    }

    canvas.fill_rect(frame.interior, style.card_color);

    if let Some((image, transform)) = scene.background {
        image.paint(&mut canvas, frame.interior, transform);
    }

    for rect in layout.divider_rects() {
        canvas.fill_rect(rect, layout.divider_color);
    }

    let face = fonts.resolve(&style.font_family);
    for block in layout.blocks() {
        let Some(clip) = block.hit_rect() else {
            continue;
        };
        for (line, x, baseline) in block.placed_lines() {
            canvas.draw_text(
                face,
                &line.text,
                block.font_size,
                block.bold,
                x,
                baseline,
                block.color,
                clip,
            );
        }
    }

    log::debug!(
        "Rendered {}x{} card ({} text blocks, image: {})",
        style.card_width,
        style.card_height,
        layout.blocks().count(),
        scene.background.is_some()
    );

    canvas
}
