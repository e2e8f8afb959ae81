//! RGBA drawing surface with the handful of primitives the card needs.
//!
//! Rectangles cover the pixels whose centers fall inside them, so a
//! fractional rectangle never paints outside its own bounds.

use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

use super::transform::blend_channel;
use crate::error::QuoteCardError;
use crate::font::Typeface;
use crate::layout::Rect;
use crate::style::Color;

pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Opaque canvas filled with `fill`.
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, fill.to_rgba()),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let [r, g, b, _] = self.image.get_pixel(x, y).0;
        Color::rgb(r, g, b)
    }

    /// Blend `color` into one pixel at coverage `alpha`; out-of-bounds is a no-op.
    pub fn blend(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width() as i32 || y >= self.height() as i32 || alpha <= 0.0 {
            return;
        }
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        let [r, g, b, _] = pixel.0;
        pixel.0 = [
            blend_channel(r, color.r, alpha),
            blend_channel(g, color.g, alpha),
            blend_channel(b, color.b, alpha),
            255,
        ];
    }

    /// Integer pixel range `[start, end)` whose centers lie in `[lo, hi)`,
    /// clamped to `0..limit`.
    fn span(lo: f32, hi: f32, limit: u32) -> (u32, u32) {
        let start = (lo - 0.5).ceil().max(0.0);
        let end = (hi - 0.5).ceil().max(0.0);
        (
            (start as u32).min(limit),
            (end as u32).min(limit),
        )
    }

    /// Pixel bounds covered by `rect`: `(x0, y0, x1, y1)`, exclusive ends.
    pub fn pixel_bounds(&self, rect: Rect) -> (u32, u32, u32, u32) {
        let (x0, x1) = Self::span(rect.x, rect.right(), self.width());
        let (y0, y1) = Self::span(rect.y, rect.bottom(), self.height());
        (x0, y0, x1, y1)
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let (x0, y0, x1, y1) = self.pixel_bounds(rect);
        let rgba = color.to_rgba();
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.put_pixel(x, y, rgba);
            }
        }
    }

    /// Paint the ring between `outer` and `outer` shrunk by `thickness`.
    pub fn fill_band(&mut self, outer: Rect, thickness: f32, color: Color) {
        let inner = outer.inset(thickness);
        self.fill_rect(Rect::from_edges(outer.x, outer.y, outer.right(), inner.y), color);
        self.fill_rect(
            Rect::from_edges(outer.x, inner.bottom(), outer.right(), outer.bottom()),
            color,
        );
        self.fill_rect(Rect::from_edges(outer.x, inner.y, inner.x, inner.bottom()), color);
        self.fill_rect(
            Rect::from_edges(inner.right(), inner.y, outer.right(), inner.bottom()),
            color,
        );
    }

    /// Draw one line of text, discarding coverage whose pixel center is outside `clip`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text(
        &mut self,
        face: &dyn Typeface,
        text: &str,
        size: f32,
        bold: bool,
        x: f32,
        baseline: f32,
        color: Color,
        clip: Rect,
    ) {
        face.draw(text, size, bold, x, baseline, &mut |px, py, coverage| {
            let (cx, cy) = (px as f32 + 0.5, py as f32 + 0.5);
            if clip.contains(cx, cy) {
                self.blend(px, py, color, coverage);
            }
        });
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, QuoteCardError> {
        encode_png(&self.image)
    }
}

/// Encode an RGBA bitmap as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, QuoteCardError> {
    let mut png_bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| QuoteCardError::Image(format!("PNG encoding failed: {}", e)))?;
    Ok(png_bytes)
}
