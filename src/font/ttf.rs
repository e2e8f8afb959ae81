//! TrueType/OpenType faces loaded from disk.
//!
//! Renders anti-aliased coverage with ab_glyph. The pixel scale is chosen
//! so the font's ascender lands at [`ASCENT_RATIO`] of the requested size
//! and its descender stays within [`DESCENT_RATIO`], keeping every face
//! inside the same vertical band as the built-in one.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use std::path::Path;

use super::{ASCENT_RATIO, DESCENT_RATIO, Typeface};
use crate::error::QuoteCardError;

pub struct TtfFace {
    name: String,
    regular: FontArc,
    bold: Option<FontArc>,
}

impl TtfFace {
    /// Build a face from in-memory font data.
    pub fn from_bytes(
        name: impl Into<String>,
        regular: Vec<u8>,
        bold: Option<Vec<u8>>,
    ) -> Result<Self, QuoteCardError> {
        let name = name.into();
        let regular = FontArc::try_from_vec(regular)
            .map_err(|e| QuoteCardError::Font(format!("{}: {}", name, e)))?;
        let bold = bold
            .map(|data| {
                FontArc::try_from_vec(data)
                    .map_err(|e| QuoteCardError::Font(format!("{} (bold): {}", name, e)))
            })
            .transpose()?;

        Ok(Self {
            name,
            regular,
            bold,
        })
    }

    /// Load a face from a regular file and an optional bold companion.
    pub fn from_files(regular: &Path, bold: Option<&Path>) -> Result<Self, QuoteCardError> {
        let read = |path: &Path| {
            std::fs::read(path)
                .map_err(|e| QuoteCardError::Font(format!("{}: {}", path.display(), e)))
        };

        let name = regular
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| regular.display().to_string());

        Self::from_bytes(name, read(regular)?, bold.map(read).transpose()?)
    }

    /// Font to use and whether bold must be synthesized.
    fn pick(&self, bold: bool) -> (&FontArc, bool) {
        match (&self.bold, bold) {
            (Some(face), true) => (face, false),
            (None, true) => (&self.regular, true),
            (_, false) => (&self.regular, false),
        }
    }
}

/// Pixel scale keeping the ascender and descender inside the text band.
fn px_scale(font: &FontArc, size: f32) -> PxScale {
    let ascent = font.ascent_unscaled().max(1.0);
    let descent = (-font.descent_unscaled()).max(0.0);
    let extent = ascent + descent;

    let by_ascent = ASCENT_RATIO * extent / ascent;
    let by_descent = if descent > 0.0 {
        DESCENT_RATIO * extent / descent
    } else {
        f32::INFINITY
    };

    PxScale::from(size * by_ascent.min(by_descent).min(1.0))
}

fn smear_px(size: f32) -> f32 {
    (size / 36.0).max(1.0)
}

/// Pen positions for each glyph, plus the total advance.
fn layout(font: &FontArc, scale: PxScale, text: &str) -> (Vec<(ab_glyph::GlyphId, f32)>, f32) {
    let scaled = font.as_scaled(scale);
    let mut glyphs = Vec::with_capacity(text.len());
    let mut caret = 0.0f32;
    let mut previous = None;

    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        glyphs.push((id, caret));
        caret += scaled.h_advance(id);
        previous = Some(id);
    }

    (glyphs, caret)
}

impl Typeface for TtfFace {
    fn name(&self) -> &str {
        &self.name
    }

    fn measure(&self, text: &str, size: f32, bold: bool) -> f32 {
        let (font, synthetic) = self.pick(bold);
        let (_, width) = layout(font, px_scale(font, size), text);
        if synthetic && width > 0.0 {
            width + smear_px(size)
        } else {
            width
        }
    }

    fn draw(
        &self,
        text: &str,
        size: f32,
        bold: bool,
        x: f32,
        baseline: f32,
        plot: &mut dyn FnMut(i32, i32, f32),
    ) {
        let (font, synthetic) = self.pick(bold);
        let scale = px_scale(font, size);
        let (glyphs, _) = layout(font, scale, text);
        let passes: &[f32] = if synthetic { &[0.0, smear_px(size)] } else { &[0.0] };

        for &shift in passes {
            for &(id, glyph_x) in &glyphs {
                let glyph =
                    id.with_scale_and_position(scale, ab_glyph::point(x + glyph_x + shift, baseline));

                if let Some(outlined) = font.outline_glyph(glyph) {
                    let bounds = outlined.px_bounds();
                    outlined.draw(|px, py, coverage| {
                        plot(
                            px as i32 + bounds.min.x as i32,
                            py as i32 + bounds.min.y as i32,
                            coverage,
                        );
                    });
                }
            }
        }
    }
}
