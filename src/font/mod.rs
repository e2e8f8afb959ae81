//! # Fonts
//!
//! Text measurement and glyph coverage behind one [`Typeface`] trait.
//!
//! Two faces are available:
//!
//! - [`BuiltinFace`]: the Spleen 12×24 bitmap font, always present
//! - [`TtfFace`]: any TrueType/OpenType file loaded at runtime via ab_glyph
//!
//! A [`FontBook`] maps family names to faces and resolves a CSS-style
//! family list (`"'American Typewriter', 'Courier Prime', monospace"`) to
//! the first registered face, falling back to the built-in one.
//!
//! ## Vertical metrics
//!
//! Every face paints a line inside the band
//! `[baseline - ASCENT_RATIO * size, baseline + DESCENT_RATIO * size]`.
//! The hit tester relies on this band.

mod spleen;
mod ttf;

pub use spleen::BuiltinFace;
pub use ttf::TtfFace;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::QuoteCardError;

/// Fraction of the font size painted above the baseline.
pub const ASCENT_RATIO: f32 = 0.75;
/// Fraction of the font size painted below the baseline.
pub const DESCENT_RATIO: f32 = 0.25;

/// A face that can measure and rasterize a single line of text.
pub trait Typeface: Send + Sync {
    /// Human-readable face name (for logs).
    fn name(&self) -> &str;

    /// Advance width of `text` at `size` pixels.
    fn measure(&self, text: &str, size: f32, bold: bool) -> f32;

    /// Rasterize `text` with its left edge at `x` and baseline at `baseline`.
    ///
    /// `plot` receives integer pixel coordinates and a coverage in `0.0..=1.0`.
    fn draw(
        &self,
        text: &str,
        size: f32,
        bold: bool,
        x: f32,
        baseline: f32,
        plot: &mut dyn FnMut(i32, i32, f32),
    );
}

/// Registry of faces keyed by lowercase family name.
#[derive(Clone)]
pub struct FontBook {
    faces: HashMap<String, Arc<dyn Typeface>>,
    fallback: Arc<dyn Typeface>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut families: Vec<&String> = self.faces.keys().collect();
        families.sort();
        f.debug_struct("FontBook")
            .field("families", &families)
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl FontBook {
    /// A book containing only the built-in face.
    pub fn new() -> Self {
        Self {
            faces: HashMap::new(),
            fallback: Arc::new(BuiltinFace::new()),
        }
    }

    /// Register `face` under `family` (case-insensitive).
    pub fn register(&mut self, family: &str, face: Arc<dyn Typeface>) {
        log::debug!("Registered font family '{}' -> {}", family, face.name());
        self.faces.insert(normalize_family(family), face);
    }

    /// Load a TTF/OTF file (and optional bold companion) under `family`.
    pub fn load_ttf(
        &mut self,
        family: &str,
        regular: &Path,
        bold: Option<&Path>,
    ) -> Result<(), QuoteCardError> {
        let face = TtfFace::from_files(regular, bold)?;
        self.register(family, Arc::new(face));
        Ok(())
    }

    /// First registered face named in the CSS family list, else the built-in.
    pub fn resolve(&self, family_list: &str) -> &dyn Typeface {
        parse_family_list(family_list)
            .iter()
            .find_map(|family| self.faces.get(family))
            .map(|face| face.as_ref())
            .unwrap_or(self.fallback.as_ref())
    }

    pub fn families(&self) -> Vec<String> {
        let mut families: Vec<String> = self.faces.keys().cloned().collect();
        families.sort();
        families
    }
}

/// Split a CSS `font-family` value into normalized family names.
///
/// ```
/// use quotecard::font::parse_family_list;
///
/// let families = parse_family_list("'American Typewriter', \"Courier Prime\", monospace");
/// assert_eq!(families, vec!["american typewriter", "courier prime", "monospace"]);
/// ```
pub fn parse_family_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(normalize_family)
        .filter(|family| !family.is_empty())
        .collect()
}

fn normalize_family(family: &str) -> String {
    family
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Face with a fixed per-char advance, for resolution tests.
    struct FixedFace(&'static str, f32);

    impl Typeface for FixedFace {
        fn name(&self) -> &str {
            self.0
        }

        fn measure(&self, text: &str, size: f32, _bold: bool) -> f32 {
            text.chars().count() as f32 * size * self.1
        }

        fn draw(&self, _: &str, _: f32, _: bool, _: f32, _: f32, _: &mut dyn FnMut(i32, i32, f32)) {}
    }

    #[test]
    fn test_parse_family_list_strips_quotes() {
        assert_eq!(parse_family_list("  Georgia , 'Times New Roman',serif "), vec![
            "georgia",
            "times new roman",
            "serif"
        ]);
        assert!(parse_family_list(" , ").is_empty());
    }

    #[test]
    fn test_resolve_picks_first_registered() {
        let mut book = FontBook::new();
        book.register("Courier Prime", Arc::new(FixedFace("courier", 0.6)));
        book.register("Georgia", Arc::new(FixedFace("georgia", 0.5)));

        let face = book.resolve("'Missing Font', \"courier prime\", Georgia");
        assert_eq!(face.name(), "courier");
        assert_eq!(book.families(), vec!["courier prime", "georgia"]);
    }

    #[test]
    fn test_resolve_falls_back_to_builtin() {
        let book = FontBook::new();
        let face = book.resolve("'American Typewriter', monospace");
        assert_eq!(face.name(), BuiltinFace::NAME);
        assert!(face.measure("abc", 20.0, false) > 0.0);
    }
}
