//! Built-in monospace face backed by the Spleen 12×24 bitmap font.
//!
//! Glyphs are scaled with nearest-neighbor sampling so that the 24-row
//! cell spans exactly one font size: 18 rows above the baseline and 6
//! below, which matches [`ASCENT_RATIO`](super::ASCENT_RATIO). Bold is
//! synthesized by smearing each glyph horizontally.

use spleen_font::{FONT_12X24, PSF2Font};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{ASCENT_RATIO, Typeface};

const GLYPH_WIDTH: usize = 12;
const GLYPH_HEIGHT: usize = 24;

/// Advance per character as a fraction of the font size (12/24).
pub const ADVANCE_RATIO: f32 = GLYPH_WIDTH as f32 / GLYPH_HEIGHT as f32;

type Bitmap = Arc<[bool]>;

/// The always-available fallback face.
pub struct BuiltinFace {
    cache: Mutex<HashMap<char, Bitmap>>,
}

impl Default for BuiltinFace {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinFace {
    pub const NAME: &'static str = "spleen-12x24";

    pub fn new() -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn glyph(&self, ch: char) -> Bitmap {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        cache
            .entry(ch)
            .or_insert_with(|| {
                decode_glyph(ch)
                    .or_else(|| fold_diacritic(ch).and_then(decode_glyph))
                    .unwrap_or_else(box_glyph)
                    .into()
            })
            .clone()
    }
}

/// Extra pixels smeared to the right for synthetic bold.
fn embolden_px(size: f32) -> i32 {
    (size / 24.0).round().max(1.0) as i32
}

impl Typeface for BuiltinFace {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn measure(&self, text: &str, size: f32, bold: bool) -> f32 {
        let count = text.chars().count();
        if count == 0 {
            return 0.0;
        }
        let width = count as f32 * size * ADVANCE_RATIO;
        if bold { width + embolden_px(size) as f32 } else { width }
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
        let advance = size * ADVANCE_RATIO;
        let cell_w = advance.round().max(1.0) as usize;
        let cell_h = size.round().max(1.0) as usize;
        let top = (baseline - ASCENT_RATIO * size).round() as i32;
        let smear = if bold { embolden_px(size) } else { 0 };

        for (i, ch) in text.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            let left = (x + i as f32 * advance).round() as i32;
            let bitmap = self.glyph(ch);

            // Nearest-neighbor scale from 12×24 to the target cell
            for dy in 0..cell_h {
                let sy = dy * GLYPH_HEIGHT / cell_h;
                for dx in 0..cell_w {
                    let sx = dx * GLYPH_WIDTH / cell_w;
                    if bitmap[sy * GLYPH_WIDTH + sx] {
                        for k in 0..=smear {
                            plot(left + dx as i32 + k, top + dy as i32, 1.0);
                        }
                    }
                }
            }
        }
    }
}

fn decode_glyph(ch: char) -> Option<Vec<bool>> {
    let mut spleen = PSF2Font::new(FONT_12X24).ok()?;
    let utf8 = ch.to_string();
    let rows = spleen.glyph_for_utf8(utf8.as_bytes())?;

    let mut bitmap = vec![false; GLYPH_WIDTH * GLYPH_HEIGHT];
    for (row_y, row) in rows.enumerate() {
        for (col_x, on) in row.enumerate() {
            if row_y < GLYPH_HEIGHT && col_x < GLYPH_WIDTH {
                bitmap[row_y * GLYPH_WIDTH + col_x] = on;
            }
        }
    }
    Some(bitmap)
}

/// Base letter for Romanian and common Latin diacritics missing from Spleen.
fn fold_diacritic(ch: char) -> Option<char> {
    let base = match ch {
        'ă' | 'â' | 'á' | 'à' | 'ä' | 'ã' => 'a',
        'Ă' | 'Â' | 'Á' | 'À' | 'Ä' | 'Ã' => 'A',
        'î' | 'í' | 'ì' | 'ï' => 'i',
        'Î' | 'Í' | 'Ì' | 'Ï' => 'I',
        'ș' | 'ş' | 'š' => 's',
        'Ș' | 'Ş' | 'Š' => 'S',
        'ț' | 'ţ' => 't',
        'Ț' | 'Ţ' => 'T',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        '„' | '”' | '“' => '"',
        '’' | '‘' => '\'',
        '–' | '—' => '-',
        _ => return None,
    };
    Some(base)
}

/// Outline box for characters with no glyph at all.
fn box_glyph() -> Vec<bool> {
    let mut glyph = vec![false; GLYPH_WIDTH * GLYPH_HEIGHT];
    // Keep the box inside the ascent so it never paints below the descent line
    let (top, bottom) = (4, 18);
    for x in 1..GLYPH_WIDTH - 1 {
        glyph[top * GLYPH_WIDTH + x] = true;
        glyph[bottom * GLYPH_WIDTH + x] = true;
    }
    for y in top..=bottom {
        glyph[y * GLYPH_WIDTH + 1] = true;
        glyph[y * GLYPH_WIDTH + GLYPH_WIDTH - 2] = true;
    }
    glyph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::DESCENT_RATIO;

    fn painted(face: &BuiltinFace, text: &str, size: f32, bold: bool) -> Vec<(i32, i32)> {
        let mut points = Vec::new();
        face.draw(text, size, bold, 100.0, 200.0, &mut |x, y, _| points.push((x, y)));
        points
    }

    #[test]
    fn test_measure_is_monospace() {
        let face = BuiltinFace::new();
        assert_eq!(face.measure("", 70.0, true), 0.0);
        assert_eq!(face.measure("abcd", 24.0, false), 48.0);
        assert_eq!(face.measure("Hello world", 70.0, false), 11.0 * 35.0);
        assert!(face.measure("abcd", 24.0, true) > face.measure("abcd", 24.0, false));
    }

    #[test]
    fn test_draw_stays_in_vertical_band() {
        let face = BuiltinFace::new();
        for size in [12.0, 36.0, 70.0, 133.0] {
            let points = painted(&face, "Ag|jy_É", size, true);
            assert!(!points.is_empty());
            let top = 200.0 - ASCENT_RATIO * size - 1.0;
            let bottom = 200.0 + DESCENT_RATIO * size + 1.0;
            for (_, y) in points {
                let center = y as f32 + 0.5;
                assert!(center >= top && center <= bottom, "row {} outside band at {}", y, size);
            }
        }
    }

    #[test]
    fn test_draw_stays_within_measured_width() {
        let face = BuiltinFace::new();
        let size = 48.0;
        let width = face.measure("WMW", size, true);
        for (x, _) in painted(&face, "WMW", size, true) {
            assert!(x >= 100 && (x as f32) < 100.0 + width + 1.0);
        }
    }

    #[test]
    fn test_romanian_letters_render() {
        let face = BuiltinFace::new();
        for ch in ['ă', 'â', 'î', 'ș', 'ț', 'Ș', 'Ț'] {
            assert!(!painted(&face, &ch.to_string(), 24.0, false).is_empty());
        }
    }

    #[test]
    fn test_spaces_paint_nothing() {
        let face = BuiltinFace::new();
        assert!(painted(&face, "   ", 40.0, false).is_empty());
    }
}
